//! Tests for the value-arc color ramp and its segmented approximation.

use gauge_common::{Color, NormalizedScore, RenderConfig};
use gauge_renderer::gauge::{segment_value_arc, ArcSlice, MIN_SEGMENTS};
use gauge_renderer::geometry::GaugeGeometry;
use gauge_renderer::gradient::{ramp_color, ramp_components, ConicGradient, RAMP_STOPS};

fn geometry(score: i64) -> GaugeGeometry {
    GaugeGeometry::compute(1200, 630, &RenderConfig::default(), NormalizedScore::new(score))
}

fn slice_at(slices: &[ArcSlice], angle: f64) -> Option<&ArcSlice> {
    slices.iter().find(|s| s.start <= angle && angle < s.end)
}

/// Largest per-channel difference between the slices and the exact ramp,
/// sampled densely across the arc.
fn max_channel_error(g: &GaugeGeometry, slices: &[ArcSlice]) -> f64 {
    let samples = 4000;
    let g0 = g.gradient_start();
    let span = g.end_angle - g0;
    let mut worst: f64 = 0.0;
    for k in 0..samples {
        let angle = g0 + span * (k as f64 + 0.5) / samples as f64;
        let Some(slice) = slice_at(slices, angle) else {
            continue;
        };
        let exact = ramp_components(g.ramp_position(angle));
        let got = [slice.color.r, slice.color.g, slice.color.b];
        for c in 0..3 {
            worst = worst.max((f64::from(got[c]) - exact[c]).abs());
        }
    }
    worst
}

// ============================================================================
// Ramp
// ============================================================================

#[test]
fn test_ramp_hits_stops_exactly() {
    for (t, color) in RAMP_STOPS {
        assert_eq!(ramp_color(t), color);
    }
}

#[test]
fn test_ramp_clamps_out_of_range() {
    assert_eq!(ramp_color(-1.0), RAMP_STOPS[0].1);
    assert_eq!(ramp_color(7.0), RAMP_STOPS[2].1);
    assert_eq!(ramp_color(f64::NAN), RAMP_STOPS[0].1);
}

#[test]
fn test_ramp_second_half_blends_orange_to_green() {
    // (240 + 92) / 2, (173 + 184) / 2, (78 + 92) / 2
    assert_eq!(ramp_color(0.75), Color::rgb(166, 179, 85));
}

// ============================================================================
// Conic gradient (native backend)
// ============================================================================

#[test]
fn test_conic_gradient_spans_ramp_over_track() {
    let g = geometry(40);
    let gradient = ConicGradient::for_value_arc(&g);
    assert_eq!(gradient.start_angle, g.gradient_start());
    assert_eq!((gradient.cx, gradient.cy), (g.center.x, g.center.y));
    assert_eq!(gradient.stops.len(), 3);
    assert_eq!(gradient.stops[0].offset, 0.0);
    assert_eq!(gradient.stops[0].color, RAMP_STOPS[0].1);

    let span_turns = (g.end_angle - g.gradient_start()) / std::f64::consts::TAU;
    assert!((gradient.stops[2].offset - span_turns).abs() < 1e-12);
    assert_eq!(gradient.stops[2].color, RAMP_STOPS[2].1);
}

#[test]
fn test_conic_gradient_independent_of_score() {
    assert_eq!(
        ConicGradient::for_value_arc(&geometry(10)),
        ConicGradient::for_value_arc(&geometry(90))
    );
}

// ============================================================================
// Segmented approximation (raster backend)
// ============================================================================

#[test]
fn test_segment_endpoints_match_gradient_stops() {
    let g = geometry(100);
    let slices = segment_value_arc(&g, 48);
    let first = slices.first().unwrap();
    let last = slices.last().unwrap();

    assert_eq!(slices.len(), 48);
    assert_eq!(first.start, g.gradient_start());
    assert_eq!(first.color, RAMP_STOPS[0].1);
    assert_eq!(last.end, g.end_angle);
    assert_eq!(last.color, RAMP_STOPS[2].1);
}

#[test]
fn test_interior_slices_equal_and_ends_half_width() {
    let g = geometry(100);
    let slices = segment_value_arc(&g, 40);
    let step = (g.end_angle - g.gradient_start()) / 39.0;
    let width = |s: &ArcSlice| s.end - s.start;

    for s in &slices[1..slices.len() - 1] {
        assert!((width(s) - step).abs() < 1e-9);
    }
    assert!((width(&slices[0]) - step / 2.0).abs() < 1e-9);
    assert!((width(&slices[slices.len() - 1]) - step / 2.0).abs() < 1e-9);
}

#[test]
fn test_segments_are_contiguous() {
    let g = geometry(100);
    let slices = segment_value_arc(&g, 30);
    for pair in slices.windows(2) {
        assert!((pair[0].end - pair[1].start).abs() < 1e-12);
        assert!(pair[0].start < pair[0].end);
    }
}

#[test]
fn test_partial_fill_uses_full_track_colors() {
    let full = segment_value_arc(&geometry(100), 40);
    let partial_geometry = geometry(30);
    let partial = segment_value_arc(&partial_geometry, 40);

    assert!(partial.len() < full.len());
    for (p, f) in partial.iter().zip(full.iter()) {
        assert_eq!(p.color, f.color);
        assert_eq!(p.start, f.start);
    }
    let last = partial.last().unwrap();
    assert!((last.end - partial_geometry.value_angle).abs() < 1e-12);
    assert!(partial.iter().all(|s| s.end <= partial_geometry.value_angle));
}

#[test]
fn test_slice_count_floor() {
    let slices = segment_value_arc(&geometry(100), 3);
    assert_eq!(slices.len(), MIN_SEGMENTS);
}

#[test]
fn test_no_segments_inside_cap() {
    // One point of score is narrower than the round cap at this radius.
    assert!(segment_value_arc(&geometry(1), 48).is_empty());
    assert!(segment_value_arc(&geometry(0), 48).is_empty());
}

#[test]
fn test_more_slices_converge_to_gradient() {
    let g = geometry(100);
    let errors: Vec<f64> = [20usize, 40, 80]
        .iter()
        .map(|&n| max_channel_error(&g, &segment_value_arc(&g, n)))
        .collect();

    assert!(errors[0] > errors[1], "errors: {:?}", errors);
    assert!(errors[1] > errors[2], "errors: {:?}", errors);
    assert!(errors[2] < 3.0, "errors: {:?}", errors);
}
