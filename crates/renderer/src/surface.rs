//! Drawing surface abstraction shared by the raster and canvas backends.

use gauge_common::{AvatarOverlay, Color, GaugeError, GaugeResult, HandleOverlay};
use image::RgbaImage;
use serde::Serialize;

use crate::geometry::Point;
use crate::gradient::ConicGradient;

/// What a surface can draw natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub native_conic_gradient: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    Butt,
    Round,
}

/// Circular arc stroke, angles in radians, clockwise in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcStroke {
    pub center: Point,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
    pub width: f64,
    pub cap: LineCap,
}

/// An image layer: where it lives, plus its decoded pixels when available.
///
/// The canvas backend only needs `source`; the raster backend only `image`.
#[derive(Debug, Clone)]
pub struct Asset {
    pub source: String,
    pub image: Option<RgbaImage>,
}

impl Asset {
    /// An asset known only by location.
    pub fn reference(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            image: None,
        }
    }

    /// Decode PNG/JPEG/etc. bytes into an asset.
    pub fn decode(source: impl Into<String>, bytes: &[u8]) -> GaugeResult<Self> {
        let source = source.into();
        let image = image::load_from_memory(bytes)
            .map_err(|e| GaugeError::AssetError {
                asset: source.clone(),
                message: e.to_string(),
            })?
            .to_rgba8();
        Ok(Self {
            source,
            image: Some(image),
        })
    }

    pub fn from_image(source: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            source: source.into(),
            image: Some(image),
        }
    }
}

/// A surface the gauge is painted onto, one layer at a time.
///
/// Each render owns its surface; nothing here is shared across renders.
pub trait GaugeSurface {
    fn size(&self) -> (u32, u32);

    fn capabilities(&self) -> Capabilities;

    /// Fill the frame with `fallback`, then cover it with `art` scaled to the frame.
    fn draw_background(&mut self, art: Option<&Asset>, fallback: Color);

    /// Draw `avatar` as a `size` x `size` square; aspect ratio is not preserved.
    fn draw_avatar(&mut self, avatar: &Asset, overlay: &AvatarOverlay);

    /// Draw `text` with its top edge at `overlay.y`.
    fn draw_text(&mut self, text: &str, overlay: &HandleOverlay);

    fn stroke_arc(&mut self, arc: &ArcStroke, color: Color);

    /// Stroke an arc with a sweep gradient. Only called when
    /// `capabilities().native_conic_gradient` is set.
    fn stroke_arc_conic(&mut self, _arc: &ArcStroke, _gradient: &ConicGradient) -> GaugeResult<()> {
        Err(GaugeError::UnsupportedCapability("conic gradients"))
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color);
}
