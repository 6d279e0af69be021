//! Sentiment gauge API service library.
//!
//! Exposes the router and its building blocks so tests can drive the service
//! in-process.

pub mod assets;
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod state;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router with every route and layer installed.
pub fn router(state: Arc<AppState>, prometheus_handle: PrometheusHandle) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_handler))
        // Metrics
        .route("/metrics", get(handlers::metrics_handler))
        .route("/api/metrics", get(handlers::api_metrics_handler))
        // Configuration for browser clients
        .route("/api/config", get(handlers::config_handler))
        // Scoring and rendering
        .route("/api/score", post(handlers::score_handler))
        .route("/api/gauge.png", post(handlers::gauge_png_handler))
        .route("/api/gauge/canvas", post(handlers::gauge_canvas_handler))
        .layer(Extension(state))
        .layer(Extension(prometheus_handle))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
