use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use marsh_charts::core::Item;
use marsh_charts::interaction::{
    ChartEvent, FADED_OPACITY, InteractionMode, InteractionTracker, PageMetrics, PointerPosition,
    SELECTED_BORDER, TooltipPayload, TooltipPlacement, TooltipPosition, resolve_style,
};
use marsh_charts::render::Color;

const BLUE: Color = Color::rgb(0.2, 0.4, 0.8);

#[test]
fn payload_uses_relevant_total_and_rounds_to_one_decimal() {
    let item = Item::new("fr", 1.0, BLUE).with_label("France");
    let payload = TooltipPayload::for_item(&item, 3.0);

    assert_eq!(payload.id, "fr");
    assert_eq!(payload.label.as_deref(), Some("France"));
    assert_relative_eq!(payload.percentage, 33.3);
    assert_eq!(payload.total, 3.0);
}

#[test]
fn payload_for_empty_total_is_zero_percent() {
    let item = Item::new(1u32, 0.0, BLUE);
    let payload = TooltipPayload::for_item(&item, 0.0);
    assert_eq!(payload.percentage, 0.0);
    assert_eq!(payload.label, None);
}

#[test]
fn tooltip_flips_left_near_right_edge() {
    let placement = TooltipPlacement::default();
    let page = PageMetrics {
        inner_width: 1000.0,
        scroll_x: 0.0,
        scroll_y: 10.0,
    };

    let right = placement.place(PointerPosition::new(100.0, 50.0), 80.0, page);
    assert_eq!(right, TooltipPosition { left: 120.0, top: 85.0 });

    let flipped = placement.place(PointerPosition::new(950.0, 50.0), 80.0, page);
    assert_eq!(flipped.left, 850.0);
}

#[test]
fn selection_fades_others_and_suppresses_hover() {
    let selected = Item::new("a", 1.0, BLUE).with_selected(true);
    let other = Item::new("b", 1.0, BLUE).with_border_color(Color::rgb(1.0, 0.0, 0.0));

    let selected_style = resolve_style(&selected, true, false);
    assert_eq!(selected_style.opacity, 1.0);
    assert_eq!(selected_style.border, Some(SELECTED_BORDER));
    assert_eq!(selected_style.border_width, 2.0);

    let other_style = resolve_style(&other, true, true);
    assert_eq!(other_style.opacity, FADED_OPACITY);
    assert_eq!(other_style.border, None);
    assert_eq!(other_style.fill, BLUE);
}

#[test]
fn hover_darkens_without_selection() {
    let item = Item::new("a", 1.0, BLUE).with_opacity(0.8);
    let style = resolve_style(&item, false, true);
    assert_eq!(style.fill, BLUE.darker(0.3));
    assert_eq!(style.opacity, 0.8);
    assert_eq!(resolve_style(&item, false, false).fill, BLUE);
}

#[test]
fn tracker_replays_hover_and_releases_observers() {
    let mut tracker: InteractionTracker<&str> = InteractionTracker::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _hover = tracker.subscribe_hover(move |payload| {
        sink.borrow_mut().push(payload.as_ref().map(|p| p.id));
    });

    let item = Item::new("a", 2.0, BLUE);
    tracker.pointer_enter(TooltipPayload::for_item(&item, 4.0));
    assert_eq!(tracker.mode(), InteractionMode::Hovering);
    assert_eq!(tracker.pointer_leave(), Some("a"));
    assert_eq!(tracker.mode(), InteractionMode::Idle);

    assert_eq!(*seen.borrow(), vec![None, Some("a"), None]);

    tracker.release();
    tracker.pointer_enter(TooltipPayload::for_item(&item, 4.0));
    assert_eq!(seen.borrow().len(), 3);
}

#[test]
fn click_events_reach_subscribers_until_dropped() {
    let tracker: InteractionTracker<u8> = InteractionTracker::new(TooltipPlacement::default());
    let clicks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicks);
    let subscription = tracker.subscribe_events(move |event| sink.borrow_mut().push(event.clone()));

    tracker.click(7);
    subscription.unsubscribe();
    tracker.click(8);

    assert_eq!(*clicks.borrow(), vec![ChartEvent::ItemClicked(7)]);
}
