//! Interactive canvas backend.
//!
//! Records draw calls as serializable commands that a browser replays onto a
//! 2D canvas context. Browsers provide `createConicGradient`, so the value arc
//! is sent as a single gradient stroke. Images are referenced by URL and
//! loaded client-side; a failed load leaves the fill beneath it visible.

use gauge_common::{AvatarOverlay, Color, GaugeResult, HandleOverlay};
use serde::Serialize;

use crate::geometry::Point;
use crate::gradient::ConicGradient;
use crate::surface::{ArcStroke, Asset, Capabilities, GaugeSurface, LineCap};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    DrawImage {
        source: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        font_px: u32,
        color: Color,
        baseline: &'static str,
    },
    StrokeArc {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
        width: f64,
        cap: LineCap,
        color: Color,
    },
    StrokeArcConic {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
        width: f64,
        cap: LineCap,
        gradient: ConicGradient,
    },
    StrokeLine {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        cap: LineCap,
        color: Color,
    },
}

/// Replayable drawing, as returned to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasDrawing {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

pub struct CanvasSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl CanvasSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_drawing(self) -> CanvasDrawing {
        CanvasDrawing {
            width: self.width,
            height: self.height,
            commands: self.commands,
        }
    }
}

impl GaugeSurface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            native_conic_gradient: true,
        }
    }

    fn draw_background(&mut self, art: Option<&Asset>, fallback: Color) {
        let (width, height) = (f64::from(self.width), f64::from(self.height));
        self.commands.push(DrawCommand::FillRect {
            x: 0.0,
            y: 0.0,
            width,
            height,
            color: fallback,
        });
        if let Some(art) = art {
            self.commands.push(DrawCommand::DrawImage {
                source: art.source.clone(),
                x: 0.0,
                y: 0.0,
                width,
                height,
            });
        }
    }

    fn draw_avatar(&mut self, avatar: &Asset, overlay: &AvatarOverlay) {
        let size = f64::from(overlay.size);
        self.commands.push(DrawCommand::DrawImage {
            source: avatar.source.clone(),
            x: f64::from(overlay.x),
            y: f64::from(overlay.y),
            width: size,
            height: size,
        });
    }

    fn draw_text(&mut self, text: &str, overlay: &HandleOverlay) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x: f64::from(overlay.x),
            y: f64::from(overlay.y),
            font_px: overlay.font_px,
            color: overlay.color,
            baseline: "top",
        });
    }

    fn stroke_arc(&mut self, arc: &ArcStroke, color: Color) {
        self.commands.push(DrawCommand::StrokeArc {
            cx: arc.center.x,
            cy: arc.center.y,
            radius: arc.radius,
            start: arc.start,
            end: arc.end,
            width: arc.width,
            cap: arc.cap,
            color,
        });
    }

    fn stroke_arc_conic(&mut self, arc: &ArcStroke, gradient: &ConicGradient) -> GaugeResult<()> {
        self.commands.push(DrawCommand::StrokeArcConic {
            cx: arc.center.x,
            cy: arc.center.y,
            radius: arc.radius,
            start: arc.start,
            end: arc.end,
            width: arc.width,
            cap: arc.cap,
            gradient: gradient.clone(),
        });
        Ok(())
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        self.commands.push(DrawCommand::StrokeLine {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
            width,
            cap: LineCap::Round,
            color,
        });
    }
}
