//! Sentiment states and score classification.

use serde::Serialize;

use crate::config::Thresholds;
use crate::tally::NormalizedScore;

/// Five ordered sentiment bands, each backed by one background image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentState {
    StronglyBearish,
    Bearish,
    Neutral,
    Bullish,
    StronglyBullish,
}

impl SentimentState {
    pub const ALL: [SentimentState; 5] = [
        SentimentState::StronglyBearish,
        SentimentState::Bearish,
        SentimentState::Neutral,
        SentimentState::Bullish,
        SentimentState::StronglyBullish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentState::StronglyBearish => "strongly_bearish",
            SentimentState::Bearish => "bearish",
            SentimentState::Neutral => "neutral",
            SentimentState::Bullish => "bullish",
            SentimentState::StronglyBullish => "strongly_bullish",
        }
    }

    /// File name of the background art for this state.
    pub fn background_asset(&self) -> &'static str {
        match self {
            SentimentState::StronglyBearish => "strongly-bearish.png",
            SentimentState::Bearish => "bearish.png",
            SentimentState::Neutral => "neutral.png",
            SentimentState::Bullish => "bullish.png",
            SentimentState::StronglyBullish => "strongly-bullish.png",
        }
    }
}

impl std::fmt::Display for SentimentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a score onto the half-open bands `[0,t1) [t1,t2) [t2,t3) [t3,t4) [t4,100]`.
///
/// Collapsed thresholds produce zero-width bands which are simply never hit.
pub fn classify(score: NormalizedScore, thresholds: &Thresholds) -> SentimentState {
    let score = score.value();
    let bounds = thresholds.as_array();

    SentimentState::ALL
        .iter()
        .zip(bounds.iter())
        .find(|(_, upper)| score < **upper)
        .map(|(state, _)| *state)
        .unwrap_or(SentimentState::StronglyBullish)
}
