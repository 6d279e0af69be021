//! HTTP request handlers.
//!
//! - `gauge`: scoring and rendering endpoints
//! - `metrics`: health, Prometheus and JSON metrics, config
//! - `common`: error responses and request parsing helpers

pub mod common;
pub mod gauge;
pub mod metrics;

pub use common::ApiError;
pub use gauge::{gauge_canvas_handler, gauge_png_handler, score_handler, GaugeRequest, ScoreRequest};
pub use metrics::{api_metrics_handler, config_handler, health_handler, metrics_handler};
