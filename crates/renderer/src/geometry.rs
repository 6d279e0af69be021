//! Gauge layout: every coordinate the backends draw, derived from the image
//! size, the inset box and the score. Pure; recomputed for each render.

use std::f64::consts::PI;

use gauge_common::{InsetBox, NormalizedScore, RenderConfig};

/// 9 o'clock.
pub const START_ANGLE: f64 = PI;
/// 3 o'clock, sweeping over the top of the center.
pub const END_ANGLE: f64 = 2.0 * PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Image bounds minus the configured insets, clamped to non-negative values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawableBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DrawableBox {
    pub fn from_insets(image_width: u32, image_height: u32, inset: &InsetBox) -> Self {
        let (left, right) = (f64::from(inset.left), f64::from(inset.right));
        let (top, bottom) = (f64::from(inset.top), f64::from(inset.bottom));
        Self {
            x: left.max(0.0),
            y: top.max(0.0),
            width: (f64::from(image_width) - left - right).max(0.0),
            height: (f64::from(image_height) - top - bottom).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Needle {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub angle: f64,
    pub from: Point,
    pub to: Point,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeGeometry {
    pub bounds: DrawableBox,
    pub center: Point,
    pub radius: f64,
    pub track_width: f64,
    pub value_width: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Where the value arc ends and the needle points.
    pub value_angle: f64,
    pub needle: Needle,
}

impl GaugeGeometry {
    pub fn compute(
        image_width: u32,
        image_height: u32,
        config: &RenderConfig,
        score: NormalizedScore,
    ) -> Self {
        let bounds = DrawableBox::from_insets(image_width, image_height, &config.inset);

        // The half circle sits on the bottom edge of the box and bulges upward,
        // so the radius is bounded by half the width and the full height.
        let center = Point::new(bounds.x + bounds.width / 2.0, bounds.y + bounds.height);
        let radius = (bounds.width / 2.0).min(bounds.height).max(1.0);

        let track_width = (radius * 0.11).round().max(6.0);
        let value_width = (radius * 0.08).round().max(4.0);

        let value_angle = START_ANGLE + score.fraction() * (END_ANGLE - START_ANGLE);

        let (inner_radius, outer_radius) = needle_radii(radius, config.needle.length_scale);
        let needle = Needle {
            inner_radius,
            outer_radius,
            angle: value_angle,
            from: polar(center, inner_radius, value_angle),
            to: polar(center, outer_radius, value_angle),
            width: (radius * config.needle.width_fraction).round().max(2.0),
        };

        Self {
            bounds,
            center,
            radius,
            track_width,
            value_width,
            start_angle: START_ANGLE,
            end_angle: END_ANGLE,
            value_angle,
            needle,
        }
    }

    /// Angular width taken up by one round cap of the value arc.
    pub fn cap_angle(&self) -> f64 {
        (self.value_width / 2.0) / self.radius
    }

    /// Angle at which the color ramp begins (just past the start cap).
    pub fn gradient_start(&self) -> f64 {
        self.start_angle + self.cap_angle()
    }

    /// Position of `angle` along the ramp span `[gradient_start, end_angle]`, clamped to [0, 1].
    pub fn ramp_position(&self, angle: f64) -> f64 {
        let span = self.end_angle - self.gradient_start();
        if span <= 0.0 {
            return 0.0;
        }
        ((angle - self.gradient_start()) / span).clamp(0.0, 1.0)
    }

    pub fn point_at(&self, angle: f64, radius: f64) -> Point {
        polar(self.center, radius, angle)
    }
}

/// Needle inner/outer radii, rescaled around their midpoint by `length_scale`.
pub fn needle_radii(radius: f64, length_scale: f64) -> (f64, f64) {
    let r1 = radius - (radius * 0.30).round().max(10.0);
    let r2 = radius + (radius * 0.05).round().max(8.0);

    let mid = (r1 + r2) / 2.0;
    let half = (r2 - r1) / 2.0 * length_scale;
    (mid - half, mid + half)
}

fn polar(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + angle.cos() * radius,
        center.y + angle.sin() * radius,
    )
}
