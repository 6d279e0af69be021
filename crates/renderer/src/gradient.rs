//! Value-arc color ramp: red through orange to green.
//!
//! Both backends sample the same three stops. The canvas backend hands them
//! to a native conic gradient; the raster backend picks flat per-slice colors
//! from [`ramp_color`].

use std::f64::consts::TAU;

use gauge_common::Color;
use serde::Serialize;

use crate::geometry::{GaugeGeometry, Point};

/// Ramp stops as (position, color).
pub const RAMP_STOPS: [(f64, Color); 3] = [
    (0.0, Color::rgb(217, 83, 79)),
    (0.5, Color::rgb(240, 173, 78)),
    (1.0, Color::rgb(92, 184, 92)),
];

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f64) -> Color {
    let [r, g, b, a] = interpolate_components(color1, color2, t);
    Color::new(
        r.round() as u8,
        g.round() as u8,
        b.round() as u8,
        a.round() as u8,
    )
}

fn interpolate_components(color1: Color, color2: Color, t: f64) -> [f64; 4] {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |c1: u8, c2: u8| f64::from(c1) * t_inv + f64::from(c2) * t;
    [
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    ]
}

/// Unrounded RGB of the ramp at `t` in [0, 1].
///
/// `[0, 0.5]` blends stop 0 into stop 1, `(0.5, 1]` blends stop 1 into stop 2.
pub fn ramp_components(t: f64) -> [f64; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let (lo, hi) = if t <= RAMP_STOPS[1].0 {
        (RAMP_STOPS[0], RAMP_STOPS[1])
    } else {
        (RAMP_STOPS[1], RAMP_STOPS[2])
    };
    let local = (t - lo.0) / (hi.0 - lo.0);
    let [r, g, b, _] = interpolate_components(lo.1, hi.1, local);
    [r, g, b]
}

/// Ramp color at `t` in [0, 1], rounded to 8-bit channels.
pub fn ramp_color(t: f64) -> Color {
    let [r, g, b] = ramp_components(t);
    Color::rgb(r.round() as u8, g.round() as u8, b.round() as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradientStop {
    /// Fraction of a full turn measured from the gradient's start angle.
    pub offset: f64,
    pub color: Color,
}

/// Sweep gradient in the form a browser canvas `createConicGradient` takes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConicGradient {
    pub cx: f64,
    pub cy: f64,
    pub start_angle: f64,
    pub stops: Vec<GradientStop>,
}

impl ConicGradient {
    /// Gradient for the value arc: the ramp is laid over `[gradient_start, end_angle]`
    /// regardless of how much of the arc is actually drawn.
    pub fn for_value_arc(geometry: &GaugeGeometry) -> Self {
        let Point { x: cx, y: cy } = geometry.center;
        let start_angle = geometry.gradient_start();
        let span_turns = ((geometry.end_angle - start_angle) / TAU).max(0.0);

        let stops = RAMP_STOPS
            .iter()
            .map(|&(position, color)| GradientStop {
                offset: position * span_turns,
                color,
            })
            .collect();

        Self {
            cx,
            cy,
            start_angle,
            stops,
        }
    }

    /// Color a browser assigns to `(x, y)` under this gradient.
    ///
    /// The angle past `start_angle`, wrapped into one turn, is the offset.
    /// Offsets before the first stop take its color and offsets after the
    /// last stop take the last color, so points just *before* `start_angle`
    /// resolve to the far end of the ramp.
    pub fn color_at(&self, x: f64, y: f64) -> Color {
        let angle = (y - self.cy).atan2(x - self.cx);
        let offset = (angle - self.start_angle).rem_euclid(TAU) / TAU;

        let Some(first) = self.stops.first() else {
            return Color::new(0, 0, 0, 0);
        };
        if offset <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if offset <= hi.offset {
                let span = hi.offset - lo.offset;
                let t = if span > 0.0 { (offset - lo.offset) / span } else { 1.0 };
                return interpolate_color(lo.color, hi.color, t);
            }
        }
        self.stops.last().map_or(first.color, |stop| stop.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_endpoints_exact() {
        let a = Color::rgb(10, 20, 30);
        let b = Color::rgb(200, 100, 0);
        assert_eq!(interpolate_color(a, b, 0.0), a);
        assert_eq!(interpolate_color(a, b, 1.0), b);
        assert_eq!(interpolate_color(a, b, 5.0), b);
    }

    #[test]
    fn test_ramp_midpoint_is_orange() {
        assert_eq!(ramp_color(0.5), Color::rgb(240, 173, 78));
    }

    #[test]
    fn test_conic_color_wraps_before_start() {
        let gradient = ConicGradient {
            cx: 0.0,
            cy: 0.0,
            start_angle: 0.0,
            stops: vec![
                GradientStop { offset: 0.0, color: Color::rgb(255, 0, 0) },
                GradientStop { offset: 0.25, color: Color::rgb(0, 0, 255) },
            ],
        };
        // Just past the start: first stop.
        assert_eq!(gradient.color_at(10.0, 0.01), Color::rgb(255, 0, 0));
        // Offset 0.2 is 80% of the way to the second stop.
        let a = 0.2 * TAU;
        assert_eq!(gradient.color_at(a.cos(), a.sin()), Color::rgb(51, 0, 204));
        // Just before the start wraps to the end of the turn: last stop.
        assert_eq!(gradient.color_at(10.0, -0.01), Color::rgb(0, 0, 255));
    }

    #[test]
    fn test_ramp_quarter() {
        // halfway between red and orange
        assert_eq!(ramp_color(0.25), Color::rgb(229, 128, 79));
    }
}
