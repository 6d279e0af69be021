//! Error types for the sentiment gauge crates.

use thiserror::Error;

/// Result type alias using GaugeError.
pub type GaugeResult<T> = Result<T, GaugeError>;

/// Primary error type for scoring and rendering operations.
///
/// Malformed tallies, missing assets and bad configuration values are
/// recovered where they occur and never show up here.
#[derive(Debug, Error)]
pub enum GaugeError {
    // === Request Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("No score available: tallies are empty and no posts were submitted")]
    ScoreUnavailable,

    // === Asset Errors ===
    #[error("Failed to load asset '{asset}': {message}")]
    AssetError { asset: String, message: String },

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Image encoding failed: {0}")]
    EncodeError(String),

    #[error("Surface does not support {0}")]
    UnsupportedCapability(&'static str),

    // === Infrastructure Errors ===
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GaugeError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            GaugeError::MissingParameter(_) | GaugeError::InvalidParameter { .. } => 400,
            GaugeError::ScoreUnavailable => 422,
            _ => 500,
        }
    }

    /// Short machine-readable code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            GaugeError::MissingParameter(_) => "missing_parameter",
            GaugeError::InvalidParameter { .. } => "invalid_parameter",
            GaugeError::ScoreUnavailable => "unavailable",
            GaugeError::AssetError { .. } => "asset_error",
            GaugeError::RenderError(_) | GaugeError::UnsupportedCapability(_) => "render_error",
            GaugeError::EncodeError(_) => "encode_error",
            GaugeError::InternalError(_) => "internal_error",
        }
    }
}

impl From<std::io::Error> for GaugeError {
    fn from(err: std::io::Error) -> Self {
        GaugeError::InternalError(err.to_string())
    }
}

impl From<serde_json::Error> for GaugeError {
    fn from(err: serde_json::Error) -> Self {
        GaugeError::InternalError(format!("JSON error: {}", err))
    }
}
