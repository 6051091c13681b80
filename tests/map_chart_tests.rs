use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use marsh_charts::api::{ChartController, MapChart, MapConfig};
use marsh_charts::core::{Item, MapCountry, Viewport};
use marsh_charts::interaction::{ChartEvent, InteractionMode, PointerPosition, ReactiveCell};
use marsh_charts::render::{Color, NullRenderer};

const BLUE: Color = Color::rgb(0.3, 0.5, 0.9);

fn country(id: &'static str, latitude: f64, longitude: f64, value: f64) -> MapCountry<&'static str> {
    MapCountry::new(Item::new(id, value, BLUE).with_label(id), latitude, longitude)
}

fn countries() -> Vec<MapCountry<&'static str>> {
    vec![country("fr", 46.0, 2.0, 100.0), country("us", 38.0, -97.0, 400.0)]
}

fn measured_chart(width: f64) -> MapChart<&'static str, NullRenderer> {
    let mut chart = MapChart::new(NullRenderer::default(), MapConfig::default());
    chart.attach_viewport_source(&ReactiveCell::new(Some(Viewport::new(width, 600.0))));
    chart
}

fn settled_chart() -> MapChart<&'static str, NullRenderer> {
    let mut chart = measured_chart(900.0);
    chart.set_data(countries()).expect("set data");
    chart.tick(0.0);
    chart.tick(1000.0);
    chart
}

#[test]
fn bubble_radius_follows_sqrt_of_value() {
    let chart = settled_chart();
    let fr = chart.bubbles().get(&"fr").expect("fr").committed();
    let us = chart.bubbles().get(&"us").expect("us").committed();

    assert_relative_eq!(fr.radius, 8.0, epsilon = 1e-9);
    assert_relative_eq!(us.radius, 18.0, epsilon = 1e-9);
    assert!(us.center_x < fr.center_x);
    assert!(us.center_y > fr.center_y);

    let label = chart.labels().get(&"fr").expect("label").committed();
    assert_relative_eq!(label.y, fr.center_y + 5.0, epsilon = 1e-9);
    assert_eq!(label.text(), "100");
}

#[test]
fn projection_centre_lands_mid_map() {
    let chart = measured_chart(900.0);
    let (x, y) = chart.projection().project(0.0, 40.0);
    assert_relative_eq!(x, 450.0, epsilon = 1e-9);
    assert_relative_eq!(y, 300.0, epsilon = 1e-9);
}

#[test]
fn bubbles_grow_from_their_centre() {
    let mut chart = measured_chart(900.0);
    chart.set_data(countries()).expect("set data");
    chart.tick(0.0);

    let state = chart.bubbles().get(&"us").expect("us");
    let transition = state.transition().expect("entering");
    assert_eq!(transition.from().radius, 0.0);
    assert_eq!(transition.from().center_x, transition.to().center_x);
    assert_eq!(transition.spec().duration_ms, 750.0);
}

#[test]
fn single_country_takes_middle_radius() {
    let mut chart = measured_chart(900.0);
    chart
        .set_data(vec![country("fr", 46.0, 2.0, 100.0)])
        .expect("set data");
    chart.tick(0.0);
    chart.tick(1000.0);

    let fr = chart.bubbles().get(&"fr").expect("fr").committed();
    assert_relative_eq!(fr.radius, 13.0, epsilon = 1e-9);
}

#[test]
fn hit_test_and_tooltip_share_of_total() {
    let mut chart = settled_chart();
    let fr = chart.bubbles().get(&"fr").expect("fr").committed();

    assert_eq!(chart.pointer_at(fr.center_x, fr.center_y + 3.0), Some("fr"));
    let payload = chart.hovered().expect("hovered");
    assert_eq!(payload.percentage, 20.0);
    assert_eq!(payload.total, 500.0);

    assert_eq!(chart.pointer_at(5.0, 5.0), None);
    assert!(chart.hovered().is_none());
}

#[test]
fn zoom_in_scales_bubbles_and_home_resets() {
    let mut chart = settled_chart();
    let fr = chart.bubbles().get(&"fr").expect("fr").committed();

    chart.zoom_in();
    assert_relative_eq!(chart.view_box().scale(), 1.25, epsilon = 1e-9);
    chart.tick(1100.0);

    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert_relative_eq!(frame.circles[0].radius, 10.0, epsilon = 1e-9);
    assert_relative_eq!(frame.circles[0].center_x, fr.center_x * 1.25, epsilon = 1e-9);

    chart.home();
    chart.tick(1200.0);
    assert_eq!(chart.view_box().scale(), 1.0);
    assert_eq!(chart.view_box().visible().width, 900.0);
    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert_relative_eq!(frame.circles[0].radius, 8.0, epsilon = 1e-9);
}

#[test]
fn zoom_out_stops_at_minimum() {
    let mut chart = settled_chart();
    chart.zoom_out();
    assert_eq!(chart.view_box().scale(), 1.0);
    assert!(!chart.needs_frame());
}

#[test]
fn wheel_zooms_towards_pointer() {
    let mut chart = settled_chart();
    chart.wheel(1.0, PointerPosition::new(900.0, 600.0));

    let visible = chart.view_box().visible();
    assert!(chart.view_box().scale() > 1.0);
    assert_relative_eq!(visible.width, 855.0, epsilon = 1e-9);
    assert_relative_eq!(visible.x, 45.0, epsilon = 1e-9);
    assert!(chart.needs_frame());
}

#[test]
fn drag_previews_and_commits_on_release() {
    let mut chart = settled_chart();
    chart.pan_start(PointerPosition::new(100.0, 100.0));
    assert_eq!(chart.runtime().interaction().mode(), InteractionMode::Panning);

    chart.pan_move(PointerPosition::new(50.0, 80.0));
    assert_eq!(chart.view_box().visible().x, 50.0);
    assert_eq!(chart.view_box().visible().y, 20.0);

    chart.pan_end(PointerPosition::new(40.0, 100.0));
    assert_eq!(chart.runtime().interaction().mode(), InteractionMode::Idle);
    assert_eq!(chart.view_box().visible().x, 60.0);
    assert_eq!(chart.view_box().visible().y, 0.0);

    chart.pan_start(PointerPosition::new(0.0, 0.0));
    chart.pan_move(PointerPosition::new(-100.0, 0.0));
    chart.pan_cancel();
    assert_eq!(chart.view_box().visible().x, 60.0);
    assert_eq!(chart.runtime().interaction().mode(), InteractionMode::Idle);
}

#[test]
fn narrow_container_fits_whole_map() {
    let mut chart = measured_chart(450.0);
    chart.set_data(countries()).expect("set data");
    chart.tick(0.0);
    chart.tick(1000.0);

    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert_eq!(frame.viewport, Viewport::new(450.0, 600.0));
    assert_relative_eq!(frame.circles[0].radius, 4.0, epsilon = 1e-9);

    let fr = chart.bubbles().get(&"fr").expect("fr").committed();
    let x = fr.center_x * 0.5;
    let y = fr.center_y * 0.5 + 150.0;
    assert_eq!(chart.hit_test(x, y), Some("fr"));
}

#[test]
fn removed_country_shrinks_then_reports_exit() {
    let mut chart = settled_chart();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let _events = chart.subscribe_events(move |event| sink.borrow_mut().push(event.clone()));

    chart
        .set_data(vec![country("fr", 46.0, 2.0, 100.0)])
        .expect("set data");
    chart.tick(1000.0);
    let exiting = &chart.bubbles().exiting()[0];
    assert_eq!(exiting.target().radius, 0.0);

    chart.tick(1200.0);
    assert!(events.borrow().is_empty());
    chart.tick(1400.0);
    assert_eq!(*events.borrow(), vec![ChartEvent::ExitCompleted("us")]);
    assert_eq!(chart.renderer().last_frame.as_ref().expect("frame").circles.len(), 1);
}

#[test]
fn selection_drops_default_stroke() {
    let mut chart = measured_chart(900.0);
    chart
        .set_data(vec![
            country("fr", 46.0, 2.0, 100.0),
            MapCountry::new(
                Item::new("us", 400.0, BLUE).with_label("us").with_selected(true),
                38.0,
                -97.0,
            ),
        ])
        .expect("set data");
    chart.tick(1000.0);

    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert_eq!(frame.circles[0].style.border, None);
    assert_eq!(frame.circles[0].style.opacity, 0.3);
    assert!(frame.circles[1].style.border.is_some());
}

#[test]
fn value_labels_keep_fractional_values_at_rest() {
    let mut chart = measured_chart(900.0);
    chart
        .set_data(vec![country("fr", 46.0, 2.0, 12.5), country("us", 38.0, -97.0, 400.0)])
        .expect("set data");
    chart.tick(0.0);
    chart.tick(1000.0);

    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert!(frame.texts.iter().any(|text| text.text == "12.5"));
}
