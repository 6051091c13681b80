use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use approx::assert_relative_eq;
use marsh_charts::animation::ArcGeometry;
use marsh_charts::api::{ChartController, DonutChart, DonutConfig};
use marsh_charts::core::{Item, Viewport};
use marsh_charts::interaction::ReactiveCell;
use marsh_charts::render::{Color, NullRenderer};

fn item(id: &'static str, value: f64) -> Item<&'static str> {
    Item::new(id, value, Color::rgb(0.2, 0.4, 0.8)).with_label(id)
}

fn quarters() -> Vec<Item<&'static str>> {
    vec![item("a", 1.0), item("b", 1.0), item("c", 1.0), item("d", 1.0)]
}

fn measured_chart() -> DonutChart<&'static str, NullRenderer> {
    let mut chart = DonutChart::new(NullRenderer::default(), DonutConfig::default());
    chart.attach_viewport_source(&ReactiveCell::new(Some(Viewport::new(300.0, 300.0))));
    chart
}

fn settled_chart() -> DonutChart<&'static str, NullRenderer> {
    let mut chart = measured_chart();
    chart.set_data(quarters()).expect("set data");
    chart.tick(0.0);
    chart.tick(2000.0);
    chart
}

fn assert_arc(actual: ArcGeometry, start: f64, end: f64) {
    assert_relative_eq!(actual.start_angle, start, epsilon = 1e-9);
    assert_relative_eq!(actual.end_angle, end, epsilon = 1e-9);
}

#[test]
fn first_render_sweeps_every_slice_from_twelve_oclock() {
    let mut chart = measured_chart();
    chart.set_data(quarters()).expect("set data");
    chart.tick(0.0);

    for state in chart.slices().live() {
        let transition = state.transition().expect("entering");
        assert_eq!(transition.from(), ArcGeometry::collapsed(0.0));
        assert_eq!(transition.spec().duration_ms, 1000.0);
    }

    chart.tick(2000.0);
    assert_arc(chart.slices().get(&"b").expect("b").committed(), FRAC_PI_2, PI);
    assert!(!chart.needs_frame());
}

#[test]
fn removed_slice_collapses_into_next_survivor() {
    let mut chart = settled_chart();
    chart
        .set_data(vec![item("a", 1.0), item("c", 1.0), item("d", 1.0)])
        .expect("set data");
    chart.tick(2000.0);

    let exiting = &chart.slices().exiting()[0];
    assert_eq!(*exiting.key(), "b");
    assert_eq!(exiting.target(), ArcGeometry::collapsed(PI));

    chart.tick(2500.0);
    assert_eq!(chart.renderer().last_frame.as_ref().expect("frame").arcs.len(), 4);

    chart.tick(3000.0);
    assert!(chart.slices().exiting().is_empty());
    assert_arc(chart.slices().get(&"c").expect("c").committed(), TAU / 3.0, 2.0 * TAU / 3.0);
}

#[test]
fn last_slice_without_successor_collapses_to_its_end() {
    let mut chart = settled_chart();
    chart
        .set_data(vec![item("a", 1.0), item("b", 1.0), item("c", 1.0)])
        .expect("set data");
    chart.tick(2000.0);

    let exiting = &chart.slices().exiting()[0];
    assert_eq!(*exiting.key(), "d");
    assert_arc(exiting.target(), TAU, TAU);
}

#[test]
fn entering_slice_opens_at_next_slice_on_screen() {
    let mut chart = measured_chart();
    chart
        .set_data(vec![item("a", 1.0), item("c", 1.0)])
        .expect("set data");
    chart.tick(0.0);
    chart.tick(2000.0);

    chart
        .set_data(vec![item("a", 1.0), item("b", 1.0), item("c", 1.0)])
        .expect("set data");
    chart.tick(2000.0);
    let b = chart.slices().get(&"b").expect("b");
    assert_arc(b.transition().expect("entering").from(), PI, PI);
    assert_eq!(b.transition().expect("entering").spec().duration_ms, 1000.0);
}

#[test]
fn appended_slice_opens_at_its_own_end() {
    let mut chart = settled_chart();
    let mut items = quarters();
    items.push(item("e", 1.0));
    chart.set_data(items).expect("set data");
    chart.tick(2000.0);

    let e = chart.slices().get(&"e").expect("e");
    assert_arc(e.transition().expect("entering").from(), TAU, TAU);
}

#[test]
fn identical_data_leaves_geometry_untouched() {
    let mut chart = settled_chart();
    let before: Vec<ArcGeometry> = chart.slices().live().map(|state| state.committed()).collect();

    chart.set_data(quarters()).expect("set data");
    chart.tick(2000.0);
    assert!(
        chart
            .slices()
            .live()
            .all(|state| state.transition().is_none_or(|t| t.is_noop()))
    );

    chart.tick(2500.0);
    let after: Vec<ArcGeometry> = chart.slices().live().map(|state| state.committed()).collect();
    assert_eq!(before, after);
}

#[test]
fn total_tweens_towards_new_sum() {
    let mut chart = settled_chart();
    assert_eq!(chart.displayed_total(), Some(4.0));

    chart
        .set_data(vec![item("a", 2.0), item("b", 2.0), item("c", 2.0), item("d", 2.0)])
        .expect("set data");
    chart.tick(2000.0);
    chart.tick(2500.0);
    let midway = chart.displayed_total().expect("total");
    assert!(midway > 4.0 && midway < 8.0);

    chart.tick(3000.0);
    assert_eq!(chart.displayed_total(), Some(8.0));
    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert!(frame.texts.iter().any(|text| text.text == "Total:"));
    assert!(frame.texts.iter().any(|text| text.text == "8"));
}

#[test]
fn selection_switches_to_pie_and_hides_total() {
    let mut chart = settled_chart();
    chart
        .set_data(vec![
            item("a", 1.0),
            item("b", 1.0).with_selected(true),
            item("c", 1.0),
            item("d", 1.0),
        ])
        .expect("set data");
    chart.tick(3500.0);

    let scales = chart.scales().expect("scales");
    assert!(scales.pie_mode);
    assert_eq!(scales.radii(0.0), (0.0, 0.65 * 150.0));
    assert_eq!(chart.displayed_total(), None);

    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert!(!frame.texts.iter().any(|text| text.text == "Total:"));
    assert_eq!(frame.arcs[0].inner_radius, 0.0);
    assert!(frame.arcs[1].style.border.is_some());
}

#[test]
fn hover_enlarges_slice_and_relaxes_on_leave() {
    let mut chart = settled_chart();
    chart.pointer_enter(&"a");
    assert_eq!(chart.emphasis(&"a"), 0.0);
    assert!(chart.needs_frame());
    chart.tick(2100.0);
    chart.tick(2400.0);

    assert_eq!(chart.emphasis(&"a"), 1.0);
    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    assert_relative_eq!(frame.arcs[0].outer_radius, 0.66 * 150.0, epsilon = 1e-9);
    assert_relative_eq!(frame.arcs[1].outer_radius, 0.65 * 150.0, epsilon = 1e-9);

    chart.pointer_leave();
    chart.tick(2500.0);
    chart.tick(2800.0);
    assert_eq!(chart.emphasis(&"a"), 0.0);
    assert!(!chart.needs_frame());
}

#[test]
fn hover_does_not_enlarge_while_selected() {
    let mut chart = measured_chart();
    chart
        .set_data(vec![item("a", 1.0), item("b", 1.0).with_selected(true)])
        .expect("set data");
    chart.tick(0.0);
    chart.tick(2000.0);

    chart.pointer_enter(&"a");
    chart.tick(2400.0);
    assert_eq!(chart.emphasis(&"a"), 0.0);
    assert!(chart.hovered().is_some());
}

#[test]
fn hit_test_uses_angle_and_ring() {
    let chart = settled_chart();
    let x = 150.0 + FRAC_PI_4.sin() * 80.0;
    let y = 150.0 - FRAC_PI_4.cos() * 80.0;
    assert_eq!(chart.hit_test(x, y), Some("a"));
    assert_eq!(chart.hit_test(150.0, 230.0), Some("c"));
    assert_eq!(chart.hit_test(150.0, 150.0), None);
    assert_eq!(chart.hit_test(150.0 + 120.0, 150.0), None);
}

#[test]
fn slice_labels_show_rounded_share() {
    let mut chart = settled_chart();
    chart.pointer_enter(&"b");

    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    let labels: Vec<&str> = frame
        .texts
        .iter()
        .filter(|text| text.text.ends_with('%'))
        .map(|text| text.text.as_str())
        .collect();
    assert_eq!(labels, vec!["25%", "25%", "25%", "25%"]);

    let payload = chart.hovered().expect("hovered");
    assert_eq!(payload.percentage, 25.0);
    assert_eq!(payload.total, 4.0);
}

#[test]
fn hover_after_idle_enlarges_over_full_duration() {
    let mut chart = settled_chart();
    assert!(!chart.needs_frame());

    chart.pointer_enter(&"b");
    chart.tick(60_000.0);
    chart.tick(60_150.0);
    let midway = chart.emphasis(&"b");
    assert!(midway > 0.0 && midway < 1.0);
    assert!(chart.needs_frame());

    chart.tick(60_300.0);
    assert_eq!(chart.emphasis(&"b"), 1.0);
}
