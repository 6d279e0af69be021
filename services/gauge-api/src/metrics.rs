//! Application metrics collection and reporting.

use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::RwLock;

use gauge_common::{ScoreBasis, ScoreOutcome};

/// Which surface a gauge was rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderBackend {
    Raster,
    Canvas,
}

impl RenderBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderBackend::Raster => "raster",
            RenderBackend::Canvas => "canvas",
        }
    }
}

/// Image layers that are loaded before a raster render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Background,
    Avatar,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Background => "background",
            AssetKind::Avatar => "avatar",
        }
    }
}

/// Metrics collector for the gauge API.
#[derive(Debug)]
pub struct MetricsCollector {
    /// Score outcomes
    pub scores_from_tallies: AtomicU64,
    pub scores_from_fallback: AtomicU64,
    pub scores_unavailable: AtomicU64,

    /// Render stats
    pub raster_renders: AtomicU64,
    pub canvas_renders: AtomicU64,
    pub render_errors: AtomicU64,

    /// Degraded asset loads
    pub background_failures: AtomicU64,
    pub avatar_failures: AtomicU64,

    raster_times: RwLock<TimingStats>,
    canvas_times: RwLock<TimingStats>,

    start_time: Instant,
}

#[derive(Debug, Default)]
struct TimingStats {
    count: u64,
    total_us: u64,
    min_us: u64,
    max_us: u64,
    last_us: u64,
}

impl TimingStats {
    fn record(&mut self, duration_us: u64) {
        self.count += 1;
        self.total_us += duration_us;
        self.last_us = duration_us;
        if self.min_us == 0 || duration_us < self.min_us {
            self.min_us = duration_us;
        }
        if duration_us > self.max_us {
            self.max_us = duration_us;
        }
    }

    fn to_snapshot(&self) -> TimingSnapshot {
        let avg_ms = if self.count == 0 {
            0.0
        } else {
            (self.total_us as f64 / self.count as f64) / 1000.0
        };
        TimingSnapshot {
            count: self.count,
            avg_ms,
            min_ms: self.min_us as f64 / 1000.0,
            max_ms: self.max_us as f64 / 1000.0,
            last_ms: self.last_us as f64 / 1000.0,
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            scores_from_tallies: AtomicU64::new(0),
            scores_from_fallback: AtomicU64::new(0),
            scores_unavailable: AtomicU64::new(0),
            raster_renders: AtomicU64::new(0),
            canvas_renders: AtomicU64::new(0),
            render_errors: AtomicU64::new(0),
            background_failures: AtomicU64::new(0),
            avatar_failures: AtomicU64::new(0),
            raster_times: RwLock::new(TimingStats::default()),
            canvas_times: RwLock::new(TimingStats::default()),
            start_time: Instant::now(),
        }
    }

    /// Record the outcome of aggregating a tally payload
    pub fn record_score(&self, outcome: &ScoreOutcome) {
        let (slot, label) = match outcome {
            ScoreOutcome::Scored {
                basis: ScoreBasis::Tallies,
                ..
            } => (&self.scores_from_tallies, "tallies"),
            ScoreOutcome::Scored {
                basis: ScoreBasis::SubmittedFallback,
                ..
            } => (&self.scores_from_fallback, "submitted_fallback"),
            ScoreOutcome::Unavailable => (&self.scores_unavailable, "unavailable"),
        };
        slot.fetch_add(1, Ordering::Relaxed);
        counter!("gauge_scores_total", "outcome" => label).increment(1);
    }

    /// Record a render operation
    pub async fn record_render(&self, backend: RenderBackend, duration_us: u64, success: bool) {
        let label = backend.as_str();
        if !success {
            self.render_errors.fetch_add(1, Ordering::Relaxed);
            counter!("gauge_render_errors_total", "backend" => label).increment(1);
            return;
        }

        let (total, times) = match backend {
            RenderBackend::Raster => (&self.raster_renders, &self.raster_times),
            RenderBackend::Canvas => (&self.canvas_renders, &self.canvas_times),
        };
        total.fetch_add(1, Ordering::Relaxed);
        counter!("gauge_renders_total", "backend" => label).increment(1);
        histogram!("gauge_render_duration_ms", "backend" => label)
            .record(duration_us as f64 / 1000.0);

        times.write().await.record(duration_us);
    }

    /// Record an asset that could not be loaded and was left out of the render
    pub fn record_asset_failure(&self, asset: AssetKind) {
        let slot = match asset {
            AssetKind::Background => &self.background_failures,
            AssetKind::Avatar => &self.avatar_failures,
        };
        slot.fetch_add(1, Ordering::Relaxed);
        counter!("gauge_asset_failures_total", "asset" => asset.as_str()).increment(1);
    }

    /// Get current metrics snapshot
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let raster = self.raster_times.read().await.to_snapshot();
        let canvas = self.canvas_times.read().await.to_snapshot();

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            scores: ScoreCounts {
                tallies: self.scores_from_tallies.load(Ordering::Relaxed),
                submitted_fallback: self.scores_from_fallback.load(Ordering::Relaxed),
                unavailable: self.scores_unavailable.load(Ordering::Relaxed),
            },
            renders: RenderCounts {
                raster: self.raster_renders.load(Ordering::Relaxed),
                canvas: self.canvas_renders.load(Ordering::Relaxed),
                errors: self.render_errors.load(Ordering::Relaxed),
            },
            asset_failures: AssetFailureCounts {
                background: self.background_failures.load(Ordering::Relaxed),
                avatar: self.avatar_failures.load(Ordering::Relaxed),
            },
            raster_render: raster,
            canvas_render: canvas,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub scores: ScoreCounts,
    pub renders: RenderCounts,
    pub asset_failures: AssetFailureCounts,
    pub raster_render: TimingSnapshot,
    pub canvas_render: TimingSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreCounts {
    pub tallies: u64,
    pub submitted_fallback: u64,
    pub unavailable: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderCounts {
    pub raster: u64,
    pub canvas: u64,
    pub errors: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetFailureCounts {
    pub background: u64,
    pub avatar: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimingSnapshot {
    pub count: u64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub last_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauge_common::NormalizedScore;

    #[tokio::test]
    async fn test_render_timing() {
        let m = MetricsCollector::new();
        m.record_render(RenderBackend::Raster, 2000, true).await;
        m.record_render(RenderBackend::Raster, 4000, true).await;
        m.record_render(RenderBackend::Canvas, 500, false).await;

        let s = m.snapshot().await;
        assert_eq!(s.renders.raster, 2);
        assert_eq!(s.renders.canvas, 0);
        assert_eq!(s.renders.errors, 1);
        assert_eq!(s.raster_render.count, 2);
        assert_eq!(s.raster_render.avg_ms, 3.0);
        assert_eq!(s.raster_render.min_ms, 2.0);
        assert_eq!(s.raster_render.max_ms, 4.0);
        assert_eq!(s.raster_render.last_ms, 4.0);
        assert_eq!(s.canvas_render.count, 0);
    }

    #[tokio::test]
    async fn test_score_and_asset_counts() {
        let m = MetricsCollector::new();
        m.record_score(&ScoreOutcome::Unavailable);
        m.record_score(&ScoreOutcome::Scored {
            score: NormalizedScore::new(50),
            basis: ScoreBasis::SubmittedFallback,
        });
        m.record_asset_failure(AssetKind::Avatar);

        let s = m.snapshot().await;
        assert_eq!(s.scores.unavailable, 1);
        assert_eq!(s.scores.submitted_fallback, 1);
        assert_eq!(s.scores.tallies, 0);
        assert_eq!(s.asset_failures.avatar, 1);
        assert_eq!(s.asset_failures.background, 0);
    }
}
