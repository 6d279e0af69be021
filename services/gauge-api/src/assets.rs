//! Background art and avatar loading.
//!
//! Both images are optional layers: a failed or slow load is logged, counted
//! and the layer is left out. Nothing here ever fails a request.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use gauge_common::{GaugeError, GaugeResult, SentimentState};
use gauge_renderer::Asset;
use tracing::{debug, warn};

use crate::metrics::{AssetKind, MetricsCollector};

/// Decoded image layers for one raster render.
#[derive(Debug, Default)]
pub struct LoadedAssets {
    pub background: Option<Asset>,
    pub avatar: Option<Asset>,
}

pub struct AssetLoader {
    dir: PathBuf,
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
    metrics: Arc<MetricsCollector>,
}

impl AssetLoader {
    pub fn new(
        dir: PathBuf,
        base_url: String,
        client: reqwest::Client,
        timeout: Duration,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            dir,
            base_url,
            client,
            timeout,
            metrics,
        }
    }

    /// URL a browser uses to load the background for `state`.
    pub fn background_url(&self, state: SentimentState) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            state.background_asset()
        )
    }

    /// Load the background and avatar concurrently.
    pub async fn load(&self, state: SentimentState, avatar_url: Option<&str>) -> LoadedAssets {
        let (background, avatar) = tokio::join!(
            self.load_background(state),
            self.load_avatar(avatar_url)
        );
        LoadedAssets { background, avatar }
    }

    pub async fn load_background(&self, state: SentimentState) -> Option<Asset> {
        let path = self.dir.join(state.background_asset());
        let source = path.display().to_string();
        let result = self
            .bounded(&source, async {
                let bytes = tokio::fs::read(&path).await.map_err(|e| GaugeError::AssetError {
                    asset: source.clone(),
                    message: e.to_string(),
                })?;
                Asset::decode(source.clone(), &bytes)
            })
            .await;
        self.settle(AssetKind::Background, result)
    }

    /// Fetch an avatar. Only absolute http(s) URLs are fetched; anything else
    /// is treated as no avatar.
    pub async fn load_avatar(&self, url: Option<&str>) -> Option<Asset> {
        let url = url.map(str::trim).filter(|u| !u.is_empty())?;
        if !is_fetchable(url) {
            debug!(url, "Avatar URL is not absolute http(s), skipping");
            return None;
        }

        let result = self
            .bounded(url, async {
                let to_asset_error = |e: reqwest::Error| GaugeError::AssetError {
                    asset: url.to_string(),
                    message: e.to_string(),
                };
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(to_asset_error)?;
                let bytes = response.bytes().await.map_err(to_asset_error)?;
                Asset::decode(url, &bytes)
            })
            .await;
        self.settle(AssetKind::Avatar, result)
    }

    async fn bounded<F>(&self, source: &str, load: F) -> GaugeResult<Asset>
    where
        F: Future<Output = GaugeResult<Asset>>,
    {
        tokio::time::timeout(self.timeout, load)
            .await
            .unwrap_or_else(|_| {
                Err(GaugeError::AssetError {
                    asset: source.to_string(),
                    message: format!("timed out after {} ms", self.timeout.as_millis()),
                })
            })
    }

    fn settle(&self, kind: AssetKind, result: GaugeResult<Asset>) -> Option<Asset> {
        match result {
            Ok(asset) => Some(asset),
            Err(e) => {
                warn!(asset = kind.as_str(), error = %e, "Asset unavailable, rendering without it");
                self.metrics.record_asset_failure(kind);
                None
            }
        }
    }
}

fn is_fetchable(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
