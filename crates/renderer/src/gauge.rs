//! Composite gauge rendering: layer order, the value arc and the needle.

use gauge_common::{classify, Color, GaugeResult, NormalizedScore, RenderConfig, SentimentState};
use rusttype::Font;

use crate::canvas::{CanvasDrawing, CanvasSurface};
use crate::geometry::GaugeGeometry;
use crate::gradient::{ramp_color, ConicGradient};
use crate::raster::RasterSurface;
use crate::surface::{ArcStroke, Asset, Capabilities, GaugeSurface, LineCap};

/// Fill shown when no background art could be loaded.
pub const NEUTRAL_FILL: Color = Color::rgb(0x2d, 0x2d, 0x30);
pub const TRACK_COLOR: Color = Color::rgb(0x3a, 0x3a, 0x3c);
pub const NEEDLE_COLOR: Color = Color::rgb(0xf5, 0xf5, 0xf5);

pub const DEFAULT_SEGMENTS: usize = 48;
pub const MIN_SEGMENTS: usize = 20;

/// Everything that varies per request besides the config and image size.
#[derive(Debug, Clone, Copy)]
pub struct GaugeScene<'a> {
    pub score: NormalizedScore,
    pub username: &'a str,
    pub background: Option<&'a Asset>,
    pub avatar: Option<&'a Asset>,
}

/// How the gradient part of the value arc is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueArcStrategy {
    NativeConic,
    Segmented { slices: usize },
}

impl ValueArcStrategy {
    pub fn for_capabilities(capabilities: Capabilities, slices: usize) -> Self {
        if capabilities.native_conic_gradient {
            ValueArcStrategy::NativeConic
        } else {
            ValueArcStrategy::Segmented {
                slices: slices.max(MIN_SEGMENTS),
            }
        }
    }
}

/// One flat-colored piece of a segmented value arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSlice {
    pub start: f64,
    pub end: f64,
    /// Ramp position the color was sampled at.
    pub t: f64,
    pub color: Color,
}

/// Split `[gradient_start, value_angle]` into flat-colored slices.
///
/// Sample points sit at `t = i / (slices - 1)` along the full ramp span and
/// each slice is centered on its sample point. Interior slices are equal in
/// width; the first and last are half-width. The half-width ends are what
/// let the first slice carry exactly the `t = 0` stop color and a full arc's
/// last slice exactly the `t = 1` stop color, matching the conic gradient at
/// both ends. Slices past the value angle are dropped and the last one kept
/// is clipped to it.
pub fn segment_value_arc(geometry: &GaugeGeometry, slices: usize) -> Vec<ArcSlice> {
    let slices = slices.max(MIN_SEGMENTS);
    let g0 = geometry.gradient_start();
    let end = geometry.end_angle;
    let theta_end = geometry.value_angle.min(end);
    if theta_end <= g0 {
        return Vec::new();
    }

    let step = (end - g0) / (slices - 1) as f64;
    let mut out = Vec::with_capacity(slices);
    for i in 0..slices {
        let start = (g0 + (i as f64 - 0.5) * step).max(g0);
        if start >= theta_end {
            break;
        }
        let stop = (g0 + (i as f64 + 0.5) * step).min(end).min(theta_end);
        let t = i as f64 / (slices - 1) as f64;
        out.push(ArcSlice {
            start,
            end: stop,
            t,
            color: ramp_color(t),
        });
    }
    out
}

/// Paints a gauge onto any [`GaugeSurface`].
#[derive(Debug, Clone)]
pub struct GaugeRenderer {
    config: RenderConfig,
    segments: usize,
}

impl GaugeRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            segments: DEFAULT_SEGMENTS,
        }
    }

    /// Slice count for surfaces without conic gradients (at least 20).
    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments.max(MIN_SEGMENTS);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn state_for(&self, score: NormalizedScore) -> SentimentState {
        classify(score, &self.config.thresholds)
    }

    /// Draw every layer in order: background, avatar, handle, track, value arc, needle.
    pub fn render<S: GaugeSurface + ?Sized>(
        &self,
        surface: &mut S,
        scene: &GaugeScene<'_>,
    ) -> GaugeResult<GaugeGeometry> {
        let (width, height) = surface.size();
        let geometry = GaugeGeometry::compute(width, height, &self.config, scene.score);

        surface.draw_background(scene.background, NEUTRAL_FILL);

        if let Some(avatar) = scene.avatar {
            surface.draw_avatar(avatar, &self.config.avatar);
        }

        let handle = scene.username.trim().trim_start_matches('@');
        if !handle.is_empty() {
            surface.draw_text(&format!("@{}", handle), &self.config.handle);
        }

        surface.stroke_arc(
            &ArcStroke {
                center: geometry.center,
                radius: geometry.radius,
                start: geometry.start_angle,
                end: geometry.end_angle,
                width: geometry.track_width,
                cap: LineCap::Round,
            },
            TRACK_COLOR,
        );

        let strategy = ValueArcStrategy::for_capabilities(surface.capabilities(), self.segments);
        paint_value_arc(surface, &geometry, strategy)?;

        let needle = &geometry.needle;
        surface.stroke_line(needle.from, needle.to, needle.width, NEEDLE_COLOR);

        tracing::debug!(
            score = scene.score.value(),
            radius = geometry.radius,
            ?strategy,
            "Gauge rendered"
        );
        Ok(geometry)
    }

    /// Render on the raster backend and encode as PNG.
    pub fn render_png(
        &self,
        scene: &GaugeScene<'_>,
        width: u32,
        height: u32,
        font: Option<&Font<'static>>,
    ) -> GaugeResult<Vec<u8>> {
        let mut surface = RasterSurface::new(width, height)?;
        if let Some(font) = font {
            surface = surface.with_font(font);
        }
        self.render(&mut surface, scene)?;
        surface.encode_png()
    }

    /// Render on the canvas backend and return the draw list.
    pub fn render_canvas(
        &self,
        scene: &GaugeScene<'_>,
        width: u32,
        height: u32,
    ) -> GaugeResult<CanvasDrawing> {
        let mut surface = CanvasSurface::new(width, height);
        self.render(&mut surface, scene)?;
        Ok(surface.into_drawing())
    }
}

fn paint_value_arc<S: GaugeSurface + ?Sized>(
    surface: &mut S,
    geometry: &GaugeGeometry,
    strategy: ValueArcStrategy,
) -> GaugeResult<()> {
    let start = geometry.start_angle;
    let theta_end = geometry.value_angle;
    // Score 0: no value arc at all, not even a cap-sized dot, on any backend.
    if theta_end <= start {
        return Ok(());
    }

    let arc = |from: f64, to: f64, cap: LineCap| ArcStroke {
        center: geometry.center,
        radius: geometry.radius,
        start: from,
        end: to,
        width: geometry.value_width,
        cap,
    };
    let first = ramp_color(0.0);
    let cap_end = geometry.gradient_start();

    // Too short to show any gradient: one flat stroke.
    if theta_end <= cap_end {
        surface.stroke_arc(&arc(start, theta_end, LineCap::Round), first);
        return Ok(());
    }

    // Flat round-capped lead-in so the ramp starts right where the cap ends.
    surface.stroke_arc(&arc(start, cap_end, LineCap::Round), first);

    match strategy {
        ValueArcStrategy::NativeConic => {
            // A round start cap on the conic stroke would reach back before the
            // gradient start, where the sweep wraps to its last stop. Stroke it
            // butt-capped and close the far end with a short flat round cap.
            surface.stroke_arc_conic(
                &arc(cap_end, theta_end, LineCap::Butt),
                &ConicGradient::for_value_arc(geometry),
            )?;
            let tail = (theta_end - 0.5 / geometry.radius).max(cap_end);
            surface.stroke_arc(
                &arc(tail, theta_end, LineCap::Round),
                ramp_color(geometry.ramp_position(theta_end)),
            );
            Ok(())
        }
        ValueArcStrategy::Segmented { slices } => {
            let pieces = segment_value_arc(geometry, slices);
            let last = pieces.len().saturating_sub(1);
            // Butt-capped neighbours overlap by half a pixel to hide AA seams.
            let overlap = 0.5 / geometry.radius;
            for (i, piece) in pieces.iter().enumerate() {
                let (end, cap) = if i == last {
                    (piece.end, LineCap::Round)
                } else {
                    ((piece.end + overlap).min(theta_end), LineCap::Butt)
                };
                surface.stroke_arc(&arc(piece.start, end, cap), piece.color);
            }
            Ok(())
        }
    }
}
