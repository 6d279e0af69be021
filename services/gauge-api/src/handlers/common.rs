//! Shared handler utilities.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gauge_common::GaugeError;
use serde_json::{json, Value};

/// A `GaugeError` rendered as a JSON error body with its mapped status.
#[derive(Debug)]
pub struct ApiError(pub GaugeError);

impl From<GaugeError> for ApiError {
    fn from(err: GaugeError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = json!({
            "error": self.0.code(),
            "message": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

/// Read a post count leniently: non-negative integers, numeric strings and
/// whole floats count; anything else is 0.
pub fn lenient_count(value: Option<&Value>) -> usize {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(v) if v.is_finite() && v > 0.0 => v.floor() as usize,
        _ => 0,
    }
}
