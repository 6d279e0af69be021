//! Application state and shared resources.

use anyhow::{Context, Result};
use rusttype::Font;
use std::sync::Arc;
use tracing::{info, warn};

use gauge_renderer::GaugeRenderer;

use crate::assets::AssetLoader;
use crate::config::ServiceConfig;
use crate::metrics::MetricsCollector;

/// Shared application state.
pub struct AppState {
    pub config: ServiceConfig,
    pub renderer: GaugeRenderer,
    pub assets: AssetLoader,
    pub font: Option<Font<'static>>,
    pub metrics: Arc<MetricsCollector>,
}

impl AppState {
    pub fn new(config: ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .context("failed to build HTTP client")?;

        let metrics = Arc::new(MetricsCollector::new());
        let assets = AssetLoader::new(
            config.asset_dir.clone(),
            config.asset_base_url.clone(),
            client,
            config.fetch_timeout,
            metrics.clone(),
        );
        let renderer = GaugeRenderer::new(config.render).with_segments(config.segment_slices);
        let font = load_font(&config);

        Ok(Self {
            config,
            renderer,
            assets,
            font,
            metrics,
        })
    }
}

fn load_font(config: &ServiceConfig) -> Option<Font<'static>> {
    let path = config.font_path.as_ref()?;
    let font = std::fs::read(path)
        .ok()
        .and_then(Font::try_from_vec);
    match &font {
        Some(_) => info!(path = %path.display(), "Loaded handle font"),
        None => warn!(path = %path.display(), "Could not load handle font, text will be skipped"),
    }
    font
}
