//! Service configuration.
//!
//! The environment is read here and nowhere else. Every value is parsed
//! leniently and clamped; a bad variable falls back to its default.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use gauge_common::config::lenient_int;
use gauge_common::{RawRenderConfig, RenderConfig};
use gauge_renderer::gauge::{DEFAULT_SEGMENTS, MIN_SEGMENTS};

const MAX_IMAGE_DIMENSION: i64 = 4096;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub image_width: u32,
    pub image_height: u32,
    /// Directory holding one background image per sentiment state.
    pub asset_dir: PathBuf,
    /// URL prefix under which browsers can load the same background images.
    pub asset_base_url: String,
    /// TrueType font for the handle text. Without it the raster backend skips text.
    pub font_path: Option<PathBuf>,
    pub fetch_timeout: Duration,
    pub segment_slices: usize,
    pub render: RenderConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let int = |key: &str, default: i64| lenient_int(lookup(key).as_deref(), default);
        let dimension = |key: &str, default: i64| int(key, default).clamp(1, MAX_IMAGE_DIMENSION) as u32;

        let render = RawRenderConfig::from_lookup(&lookup).build();

        Self {
            image_width: dimension("GAUGE_IMAGE_WIDTH", 1200),
            image_height: dimension("GAUGE_IMAGE_HEIGHT", 630),
            asset_dir: lookup("GAUGE_ASSET_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./assets")),
            asset_base_url: lookup("GAUGE_ASSET_BASE_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "/assets".to_string()),
            font_path: lookup("GAUGE_FONT_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            fetch_timeout: Duration::from_millis(int("GAUGE_FETCH_TIMEOUT_MS", 5000).max(1) as u64),
            segment_slices: int("GAUGE_SEGMENT_SLICES", DEFAULT_SEGMENTS as i64)
                .max(MIN_SEGMENTS as i64) as usize,
            render,
        }
    }
}
