//! Render configuration: raw string inputs and the validated, clamped form.
//!
//! Raw values arrive as strings from the environment (or any other key/value
//! source). Numbers are read leniently: the first embedded number wins and
//! anything unparseable falls back to the field default. Every field is then
//! clamped, so building a `RenderConfig` never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::color::Color;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").expect("integer pattern"));
static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-?(?:\d+(?:\.\d*)?|\.\d+)").expect("decimal pattern"));

const MAX_AVATAR_SIZE: i64 = 4096;
const MAX_FONT_PX: i64 = 512;

/// First embedded integer in `raw`, else `default` (`"150x"` -> 150, `"abc"` -> default).
pub fn lenient_int(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| INTEGER.find(s))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(default)
}

/// First embedded decimal in `raw`, else `default`.
pub fn lenient_float(raw: Option<&str>, default: f64) -> f64 {
    raw.and_then(|s| DECIMAL.find(s))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Pixel insets from the image edges; the drawable box is what remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InsetBox {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Default for InsetBox {
    fn default() -> Self {
        Self {
            left: 300,
            right: 300,
            top: 170,
            bottom: 130,
        }
    }
}

/// Lower bounds of the Bearish, Neutral, Bullish and StronglyBullish bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub strongly_bearish: u8,
    pub bearish: u8,
    pub neutral: u8,
    pub bullish: u8,
}

impl Thresholds {
    /// Clamp each value to [0, 100] and to be no lower than the one before it.
    pub fn new(strongly_bearish: i64, bearish: i64, neutral: i64, bullish: i64) -> Self {
        let t1 = strongly_bearish.clamp(0, 100);
        let t2 = bearish.clamp(t1, 100);
        let t3 = neutral.clamp(t2, 100);
        let t4 = bullish.clamp(t3, 100);
        Self {
            strongly_bearish: t1 as u8,
            bearish: t2 as u8,
            neutral: t3 as u8,
            bullish: t4 as u8,
        }
    }

    pub fn as_array(&self) -> [u8; 4] {
        [self.strongly_bearish, self.bearish, self.neutral, self.bullish]
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(20, 40, 60, 80)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeedleConfig {
    /// Needle length multiplier around its own midpoint (>= 0.1).
    pub length_scale: f64,
    /// Stroke width as a fraction of the gauge radius (>= 0.003).
    pub width_fraction: f64,
}

impl NeedleConfig {
    pub fn new(length_scale: f64, width_fraction: f64) -> Self {
        Self {
            length_scale: length_scale.max(0.1),
            width_fraction: width_fraction.max(0.003),
        }
    }
}

impl Default for NeedleConfig {
    fn default() -> Self {
        Self::new(1.0, 0.02)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvatarOverlay {
    pub x: i32,
    pub y: i32,
    pub size: u32,
}

impl Default for AvatarOverlay {
    fn default() -> Self {
        Self {
            x: 40,
            y: 40,
            size: 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HandleOverlay {
    pub x: i32,
    pub y: i32,
    pub font_px: u32,
    pub color: Color,
}

impl Default for HandleOverlay {
    fn default() -> Self {
        Self {
            x: 180,
            y: 70,
            font_px: 40,
            color: Color::WHITE,
        }
    }
}

/// Immutable, fully clamped layout and tuning parameters for one render.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RenderConfig {
    pub inset: InsetBox,
    pub thresholds: Thresholds,
    pub needle: NeedleConfig,
    pub avatar: AvatarOverlay,
    pub handle: HandleOverlay,
}

/// Unvalidated configuration strings, one per `RenderConfig` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRenderConfig {
    pub box_left: Option<String>,
    pub box_right: Option<String>,
    pub box_top: Option<String>,
    pub box_bottom: Option<String>,
    pub threshold_strongly_bearish: Option<String>,
    pub threshold_bearish: Option<String>,
    pub threshold_neutral: Option<String>,
    pub threshold_bullish: Option<String>,
    pub needle_length_scale: Option<String>,
    pub needle_width_fraction: Option<String>,
    pub avatar_x: Option<String>,
    pub avatar_y: Option<String>,
    pub avatar_size: Option<String>,
    pub handle_x: Option<String>,
    pub handle_y: Option<String>,
    pub handle_font_px: Option<String>,
    pub handle_color: Option<String>,
}

impl RawRenderConfig {
    /// Collect raw values through `lookup`, keyed by `GAUGE_*` variable names.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            box_left: lookup("GAUGE_BOX_LEFT"),
            box_right: lookup("GAUGE_BOX_RIGHT"),
            box_top: lookup("GAUGE_BOX_TOP"),
            box_bottom: lookup("GAUGE_BOX_BOTTOM"),
            threshold_strongly_bearish: lookup("GAUGE_THRESHOLD_STRONGLY_BEARISH"),
            threshold_bearish: lookup("GAUGE_THRESHOLD_BEARISH"),
            threshold_neutral: lookup("GAUGE_THRESHOLD_NEUTRAL"),
            threshold_bullish: lookup("GAUGE_THRESHOLD_BULLISH"),
            needle_length_scale: lookup("GAUGE_NEEDLE_LENGTH_SCALE"),
            needle_width_fraction: lookup("GAUGE_NEEDLE_WIDTH_FRACTION"),
            avatar_x: lookup("GAUGE_AVATAR_X"),
            avatar_y: lookup("GAUGE_AVATAR_Y"),
            avatar_size: lookup("GAUGE_AVATAR_SIZE"),
            handle_x: lookup("GAUGE_HANDLE_X"),
            handle_y: lookup("GAUGE_HANDLE_Y"),
            handle_font_px: lookup("GAUGE_HANDLE_FONT_PX"),
            handle_color: lookup("GAUGE_HANDLE_COLOR"),
        }
    }

    /// Parse and clamp every field. Never fails.
    pub fn build(&self) -> RenderConfig {
        let int = |raw: &Option<String>, default: i64| lenient_int(raw.as_deref(), default);
        let float = |raw: &Option<String>, default: f64| lenient_float(raw.as_deref(), default);

        let inset_defaults = InsetBox::default();
        let inset = InsetBox {
            left: clamp_i32(int(&self.box_left, inset_defaults.left.into())),
            right: clamp_i32(int(&self.box_right, inset_defaults.right.into())),
            top: clamp_i32(int(&self.box_top, inset_defaults.top.into())),
            bottom: clamp_i32(int(&self.box_bottom, inset_defaults.bottom.into())),
        };

        let t = Thresholds::default();
        let thresholds = Thresholds::new(
            int(&self.threshold_strongly_bearish, t.strongly_bearish.into()),
            int(&self.threshold_bearish, t.bearish.into()),
            int(&self.threshold_neutral, t.neutral.into()),
            int(&self.threshold_bullish, t.bullish.into()),
        );

        let n = NeedleConfig::default();
        let needle = NeedleConfig::new(
            float(&self.needle_length_scale, n.length_scale),
            float(&self.needle_width_fraction, n.width_fraction),
        );

        let a = AvatarOverlay::default();
        let avatar = AvatarOverlay {
            x: clamp_i32(int(&self.avatar_x, a.x.into())),
            y: clamp_i32(int(&self.avatar_y, a.y.into())),
            size: int(&self.avatar_size, a.size.into()).clamp(1, MAX_AVATAR_SIZE) as u32,
        };

        let h = HandleOverlay::default();
        let color = match self.handle_color.as_deref() {
            Some(raw) => Color::from_hex(raw).unwrap_or_else(|| {
                tracing::warn!(value = raw, "Invalid handle color, using default");
                h.color
            }),
            None => h.color,
        };
        let handle = HandleOverlay {
            x: clamp_i32(int(&self.handle_x, h.x.into())),
            y: clamp_i32(int(&self.handle_y, h.y.into())),
            font_px: int(&self.handle_font_px, h.font_px.into()).clamp(8, MAX_FONT_PX) as u32,
            color,
        };

        RenderConfig {
            inset,
            thresholds,
            needle,
            avatar,
            handle,
        }
    }
}
