//! Benchmarks for gauge rendering on both backends.
//!
//! Run with: cargo bench --package gauge-renderer --bench render_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gauge_common::{NormalizedScore, RenderConfig};
use gauge_renderer::gauge::segment_value_arc;
use gauge_renderer::{png, Asset, GaugeGeometry, GaugeRenderer, GaugeScene};
use image::{Rgba, RgbaImage};

/// Vertical two-tone stand-in for background art.
fn synthetic_background(width: u32, height: u32) -> Asset {
    let image = RgbaImage::from_fn(width, height, |_, y| {
        let v = (y * 255 / height.max(1)) as u8;
        Rgba([v / 3, v / 2, v, 255])
    });
    Asset::from_image("bench-background.png", image)
}

fn bench_raster_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster_render");
    let background = synthetic_background(600, 315);
    let renderer = GaugeRenderer::new(RenderConfig::default());

    for score in [0i64, 37, 100] {
        let scene = GaugeScene {
            score: NormalizedScore::new(score),
            username: "bench",
            background: Some(&background),
            avatar: None,
        };
        group.bench_with_input(BenchmarkId::new("png_1200x630", score), &scene, |b, scene| {
            b.iter(|| renderer.render_png(black_box(scene), 1200, 630, None))
        });
    }

    group.finish();
}

fn bench_segment_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmented_arc");
    let config = RenderConfig::default();
    let geometry = GaugeGeometry::compute(1200, 630, &config, NormalizedScore::MAX);

    for slices in [20usize, 48, 96, 192] {
        group.bench_with_input(BenchmarkId::from_parameter(slices), &slices, |b, &n| {
            b.iter(|| segment_value_arc(black_box(&geometry), n))
        });
    }

    group.finish();
}

fn bench_canvas_render(c: &mut Criterion) {
    let renderer = GaugeRenderer::new(RenderConfig::default());
    let background = Asset::reference("/assets/neutral.png");
    let scene = GaugeScene {
        score: NormalizedScore::new(55),
        username: "bench",
        background: Some(&background),
        avatar: None,
    };
    c.bench_function("canvas_draw_list", |b| {
        b.iter(|| renderer.render_canvas(black_box(&scene), 1200, 630))
    });
}

fn bench_png_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("png_encoding");
    for (width, height) in [(600usize, 315usize), (1200, 630)] {
        let pixels: Vec<u8> = (0..width * height)
            .flat_map(|i| [(i % 251) as u8, (i % 127) as u8, (i % 61) as u8, 255])
            .collect();
        group.throughput(Throughput::Bytes(pixels.len() as u64));
        group.bench_function(format!("rgba_{}x{}", width, height), |b| {
            b.iter(|| png::create_png(black_box(&pixels), width, height))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_raster_render,
    bench_segment_counts,
    bench_canvas_render,
    bench_png_encoding,
);
criterion_main!(benches);
