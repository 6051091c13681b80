#![cfg(feature = "cairo-backend")]

use cairo::{Context, Format, ImageSurface};
use marsh_charts::api::{BarChart, BarConfig, ChartController, DonutChart, DonutConfig};
use marsh_charts::core::{Item, Viewport};
use marsh_charts::interaction::ReactiveCell;
use marsh_charts::render::{CairoContextRenderer, CairoRenderer, Color};
use marsh_charts::ChartError;

fn items() -> Vec<Item<&'static str>> {
    vec![
        Item::new("a", 30.0, Color::rgb(0.1, 0.6, 0.6)).with_label("A"),
        Item::new("b", 70.0, Color::rgb(0.9, 0.5, 0.1)).with_label("B"),
    ]
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, ChartError::InvalidData(_)));
}

#[test]
fn cairo_renderer_draws_bar_chart() {
    let renderer = CairoRenderer::new(1000, 400).expect("renderer");
    let config = BarConfig {
        width: 1000.0,
        margin_left: 0.0,
        ..BarConfig::default()
    };
    let mut chart = BarChart::new(renderer, config);
    chart.attach_viewport_source(&ReactiveCell::new(Some(Viewport::new(1000.0, 400.0))));
    chart.set_data(items()).expect("set data");
    chart.tick(0.0);
    chart.tick(1000.0);

    let stats = chart.into_renderer().last_stats();
    assert_eq!(stats.rects_drawn, 2);
    assert_eq!(stats.lines_drawn, 2);
    assert_eq!(stats.texts_drawn, 12);
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let renderer = CairoRenderer::new(300, 300).expect("renderer");
    let mut chart = DonutChart::new(renderer, DonutConfig::default());
    chart.attach_viewport_source(&ReactiveCell::new(Some(Viewport::new(300.0, 300.0))));
    chart.set_data(items()).expect("set data");
    chart.tick(0.0);
    chart.tick(2000.0);

    let frame = chart.build_frame().expect("frame");
    let surface = ImageSurface::create(Format::ARgb32, 300, 300).expect("surface");
    let context = Context::new(&surface).expect("context");
    let mut renderer = chart.into_renderer();
    renderer
        .render_on_cairo_context(&context, &frame)
        .expect("render on context");

    assert_eq!(renderer.last_stats().arcs_drawn, 2);
}
