use criterion::{Criterion, criterion_group, criterion_main};
use marsh_charts::api::{BarChart, BarConfig, ChartController, DonutChart, DonutConfig};
use marsh_charts::core::{BandPadding, BandScale, Item, Viewport, reconcile};
use marsh_charts::interaction::ReactiveCell;
use marsh_charts::render::{Color, NullRenderer};
use std::hint::black_box;

fn items(count: u32, offset: u32) -> Vec<Item<u32>> {
    (0..count)
        .map(|i| {
            Item::new(i + offset, f64::from(i % 97 + 1), Color::rgb(0.2, 0.4, 0.8))
                .with_label(format!("c{}", (i + offset) % 64))
        })
        .collect()
}

fn bench_reconcile_10k(c: &mut Criterion) {
    let previous: Vec<u32> = (0..10_000).collect();
    let next: Vec<u32> = (2_500..12_500).collect();

    c.bench_function("reconcile_10k_shifted", |b| {
        b.iter(|| {
            let reconciliation = reconcile(previous.iter(), next.iter()).expect("unique keys");
            black_box(reconciliation.entering.len());
        })
    });
}

fn bench_band_scale(c: &mut Criterion) {
    let categories: Vec<String> = (0..512).map(|i| format!("category-{i}")).collect();

    c.bench_function("band_scale_512_categories", |b| {
        b.iter(|| {
            let scale = BandScale::new(
                categories.iter().map(String::as_str),
                (0.0, 1800.0),
                BandPadding::new(0.5, 0.3),
            )
            .expect("valid band scale");
            black_box(scale.position("category-511"));
        })
    });
}

fn bench_bar_pass_and_frames(c: &mut Criterion) {
    let viewport = ReactiveCell::new(Some(Viewport::new(1800.0, 400.0)));
    let first = items(1_000, 0);
    let second = items(1_000, 300);

    c.bench_function("bar_pass_1k_with_animation", |b| {
        b.iter(|| {
            let mut chart = BarChart::new(NullRenderer::default(), BarConfig::default());
            chart.attach_viewport_source(&viewport);
            chart.set_data(first.clone()).expect("set data");
            chart.tick(1_000.0);
            chart.set_data(second.clone()).expect("set data");
            for step in 1..=10 {
                chart.tick(1_000.0 + f64::from(step) * 50.0);
            }
            black_box(chart.renderer().frames_rendered);
        })
    });
}

fn bench_donut_hit_test(c: &mut Criterion) {
    let mut chart = DonutChart::new(NullRenderer::default(), DonutConfig::default());
    chart.attach_viewport_source(&ReactiveCell::new(Some(Viewport::new(300.0, 300.0))));
    chart.set_data(items(200, 0)).expect("set data");
    chart.tick(0.0);
    chart.tick(2_000.0);

    c.bench_function("donut_hit_test_200_slices", |b| {
        b.iter(|| black_box(chart.hit_test(black_box(210.0), black_box(110.0))))
    });
}

criterion_group!(
    benches,
    bench_reconcile_10k,
    bench_band_scale,
    bench_bar_pass_and_frames,
    bench_donut_hit_test
);
criterion_main!(benches);
