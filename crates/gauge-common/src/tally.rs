//! Sentiment tallies and their reduction to a normalized 0-100 score.
//!
//! The scoring collaborator answers with either one tally object or an
//! array with one tally per scored post. Both shapes are accepted, and any
//! field that is missing, non-numeric or negative counts as zero.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GaugeError, GaugeResult};

/// Positive/neutral/negative counts for one scored item (or a whole batch).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentTally {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentTally {
    pub fn new(positive: f64, neutral: f64, negative: f64) -> Self {
        Self {
            positive,
            neutral,
            negative,
        }
    }

    /// Read a tally out of an arbitrary JSON value.
    ///
    /// Numbers and numeric strings are accepted; everything else contributes 0.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| lenient_count(value.get(name));
        Self {
            positive: field("positive"),
            neutral: field("neutral"),
            negative: field("negative"),
        }
    }

    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }

    /// Field-wise sum of two tallies.
    pub fn merge(self, other: SentimentTally) -> SentimentTally {
        SentimentTally {
            positive: self.positive + other.positive,
            neutral: self.neutral + other.neutral,
            negative: self.negative + other.negative,
        }
    }
}

fn lenient_count(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Scorer payload: a single tally or an ordered sequence of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum TallyPayload {
    Single(SentimentTally),
    Batch(Vec<SentimentTally>),
}

impl Default for TallyPayload {
    fn default() -> Self {
        TallyPayload::Batch(Vec::new())
    }
}

impl From<Value> for TallyPayload {
    fn from(value: Value) -> Self {
        match &value {
            Value::Array(items) => {
                TallyPayload::Batch(items.iter().map(SentimentTally::from_value).collect())
            }
            Value::Object(_) => TallyPayload::Single(SentimentTally::from_value(&value)),
            // Scalars and null carry no counts at all.
            _ => TallyPayload::default(),
        }
    }
}

impl TallyPayload {
    /// The tallies as a slice; a single object is a sequence of length 1.
    pub fn tallies(&self) -> &[SentimentTally] {
        match self {
            TallyPayload::Single(tally) => std::slice::from_ref(tally),
            TallyPayload::Batch(tallies) => tallies,
        }
    }

    pub fn merged(&self) -> SentimentTally {
        self.tallies()
            .iter()
            .fold(SentimentTally::default(), |acc, t| acc.merge(*t))
    }
}

/// Integer polarity index in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedScore(u8);

impl NormalizedScore {
    pub const MIN: NormalizedScore = NormalizedScore(0);
    pub const MAX: NormalizedScore = NormalizedScore(100);

    /// Clamp an integer into [0, 100].
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Round half up, then clamp. NaN maps to 0.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Position along the gauge, 0.0 to 1.0.
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

/// Where a computed score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    /// At least one tally count was non-zero.
    Tallies,
    /// All counts were zero; the submitted post count stood in as the total.
    SubmittedFallback,
}

/// Result of aggregating a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOutcome {
    Scored {
        score: NormalizedScore,
        basis: ScoreBasis,
    },
    /// No counts and nothing submitted. Distinct from a score of 0.
    Unavailable,
}

impl ScoreOutcome {
    pub fn score(&self) -> Option<NormalizedScore> {
        match self {
            ScoreOutcome::Scored { score, .. } => Some(*score),
            ScoreOutcome::Unavailable => None,
        }
    }

    pub fn into_result(self) -> GaugeResult<NormalizedScore> {
        self.score().ok_or(GaugeError::ScoreUnavailable)
    }
}

/// Reduce a tally payload to a normalized score.
///
/// `submitted` is the number of posts sent to the scorer; it is only used
/// when every count in the payload is zero.
pub fn aggregate(payload: &TallyPayload, submitted: usize) -> ScoreOutcome {
    let merged = payload.merged();
    let total = merged.total();

    if total > 0.0 {
        return ScoreOutcome::Scored {
            score: polarity_score(merged.positive, merged.negative, total),
            basis: ScoreBasis::Tallies,
        };
    }

    if submitted > 0 {
        tracing::debug!(submitted, "Empty tallies, falling back to submitted count");
        return ScoreOutcome::Scored {
            score: polarity_score(0.0, 0.0, submitted as f64),
            basis: ScoreBasis::SubmittedFallback,
        };
    }

    ScoreOutcome::Unavailable
}

/// `((P - Neg + T) / 2T) * 100`: all negative -> 0, all neutral -> 50, all positive -> 100.
fn polarity_score(positive: f64, negative: f64, total: f64) -> NormalizedScore {
    NormalizedScore::from_f64((positive - negative + total) / (2.0 * total) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn score_of(value: Value, submitted: usize) -> Option<u8> {
        aggregate(&TallyPayload::from(value), submitted)
            .score()
            .map(NormalizedScore::value)
    }

    #[test]
    fn test_pure_polarity_anchors() {
        assert_eq!(score_of(json!({"positive": 7, "neutral": 0, "negative": 0}), 0), Some(100));
        assert_eq!(score_of(json!({"positive": 0, "neutral": 0, "negative": 7}), 0), Some(0));
        assert_eq!(score_of(json!({"positive": 0, "neutral": 7, "negative": 0}), 0), Some(50));
    }

    #[test]
    fn test_mixed_tally() {
        // (3 - 1 + 6) / 12 * 100 = 66.67
        assert_eq!(score_of(json!({"positive": 3, "neutral": 2, "negative": 1}), 0), Some(67));
    }

    #[test]
    fn test_rounds_half_up() {
        // (1 - 0 + 8) / 16 * 100 = 56.25
        assert_eq!(score_of(json!({"positive": 1, "neutral": 7, "negative": 0}), 0), Some(56));
        // (1 - 0 + 4) / 8 * 100 = 62.5
        assert_eq!(score_of(json!({"positive": 1, "neutral": 3, "negative": 0}), 0), Some(63));
    }

    #[test]
    fn test_batch_equals_merged_single() {
        let a = json!({"positive": 2, "neutral": 5, "negative": 1});
        let b = json!({"positive": 0, "neutral": 1, "negative": 4});
        let batch = score_of(json!([a, b]), 0);
        let merged = score_of(json!({"positive": 2, "neutral": 6, "negative": 5}), 0);
        assert_eq!(batch, merged);
    }

    #[test]
    fn test_malformed_fields_count_as_zero() {
        let payload = TallyPayload::from(json!([
            {"positive": "3", "neutral": null, "negative": "lots"},
            {"positive": -4, "neutral": true},
            "not a tally",
            {"negative": 1.5}
        ]));
        let merged = payload.merged();
        assert_eq!(merged, SentimentTally::new(3.0, 0.0, 1.5));
        assert_eq!(payload.tallies().len(), 4);
    }

    #[test]
    fn test_zero_tallies_with_submitted_fallback() {
        let outcome = aggregate(&TallyPayload::from(json!({"positive": 0, "neutral": 0, "negative": 0})), 12);
        assert_eq!(
            outcome,
            ScoreOutcome::Scored {
                score: NormalizedScore::new(50),
                basis: ScoreBasis::SubmittedFallback
            }
        );
    }

    #[test]
    fn test_zero_tallies_nothing_submitted_is_unavailable() {
        let outcome = aggregate(&TallyPayload::from(json!({"positive": 0, "neutral": 0, "negative": 0})), 0);
        assert_eq!(outcome, ScoreOutcome::Unavailable);
        assert!(matches!(outcome.into_result(), Err(GaugeError::ScoreUnavailable)));
    }

    #[test]
    fn test_scalar_payload_is_empty() {
        assert_eq!(TallyPayload::from(json!(42)).tallies().len(), 0);
        assert_eq!(score_of(Value::Null, 0), None);
    }

    #[test]
    fn test_deserialize_through_serde() {
        let payload: TallyPayload =
            serde_json::from_str(r#"{"positive": 1, "neutral": 1, "negative": 1}"#).unwrap();
        assert!(matches!(payload, TallyPayload::Single(_)));
        let payload: TallyPayload = serde_json::from_str(r#"[{"positive": 1}]"#).unwrap();
        assert!(matches!(payload, TallyPayload::Batch(ref v) if v.len() == 1));
    }

    #[test]
    fn test_normalized_score_clamps() {
        assert_eq!(NormalizedScore::new(-5).value(), 0);
        assert_eq!(NormalizedScore::new(250).value(), 100);
        assert_eq!(NormalizedScore::from_f64(f64::NAN).value(), 0);
        assert_eq!(NormalizedScore::from_f64(99.5).value(), 100);
        assert!((NormalizedScore::new(25).fraction() - 0.25).abs() < 1e-12);
    }
}
