//! Common types shared by the sentiment gauge renderer and service.
//!
//! Covers the pure, I/O-free half of the pipeline:
//! - Tally aggregation into a normalized 0-100 score
//! - Classification of a score into one of five sentiment states
//! - Lenient render configuration parsing and clamping

pub mod color;
pub mod config;
pub mod error;
pub mod sentiment;
pub mod tally;

pub use color::Color;
pub use config::{
    AvatarOverlay, HandleOverlay, InsetBox, NeedleConfig, RawRenderConfig, RenderConfig,
    Thresholds,
};
pub use error::{GaugeError, GaugeResult};
pub use sentiment::{classify, SentimentState};
pub use tally::{aggregate, NormalizedScore, ScoreBasis, ScoreOutcome, SentimentTally, TallyPayload};
