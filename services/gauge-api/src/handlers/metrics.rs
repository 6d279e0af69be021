//! Health checks, metrics and configuration endpoints.

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use gauge_common::RenderConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::instrument;

use crate::metrics::MetricsSnapshot;
use crate::state::AppState;

/// GET /health - Basic health check
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET /metrics - Prometheus metrics endpoint
pub async fn metrics_handler(Extension(handle): Extension<PrometheusHandle>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
}

/// GET /api/metrics - JSON metrics
#[instrument(skip(state))]
pub async fn api_metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot().await)
}

/// GET /api/config - Effective render configuration for browser clients
pub async fn config_handler(Extension(state): Extension<Arc<AppState>>) -> Json<RenderConfig> {
    Json(*state.renderer.config())
}
