use approx::assert_relative_eq;
use indexmap::IndexMap;
use marsh_charts::animation::{
    AnimationTiming, Easing, ElementStore, GeometryRules, PlanContext, Transition,
    TransitionPlanner, TransitionSpec,
};
use marsh_charts::core::{Reconciliation, reconcile};

/// Scalar elements that grow from and shrink to zero.
struct FromZero;

impl GeometryRules<&'static str, f64> for FromZero {
    fn enter_from(
        &self,
        _key: &&'static str,
        _target: &f64,
        _context: &PlanContext<'_, &'static str, f64>,
    ) -> f64 {
        0.0
    }

    fn exit_to(
        &self,
        _key: &&'static str,
        _current: &f64,
        _context: &PlanContext<'_, &'static str, f64>,
    ) -> f64 {
        0.0
    }
}

fn linear_planner() -> TransitionPlanner {
    TransitionPlanner::from_timing(AnimationTiming {
        create_ms: 100.0,
        standard_ms: 100.0,
        exit_ms: 100.0,
        easing: Easing::Linear,
    })
}

fn pass(
    planner: &TransitionPlanner,
    store: &mut ElementStore<&'static str, f64>,
    targets: &[(&'static str, f64)],
    now_ms: f64,
) -> Reconciliation<&'static str> {
    let targets: IndexMap<&'static str, f64> = targets.iter().copied().collect();
    let reconciliation = reconcile(store.keys(), targets.keys()).expect("reconcile");
    planner.plan_and_run(store, &reconciliation, &targets, &FromZero, now_ms);
    reconciliation
}

#[test]
fn interrupted_update_continues_from_drawn_geometry() {
    let planner = linear_planner();
    let mut store = ElementStore::new();

    pass(&planner, &mut store, &[("a", 10.0)], 0.0);
    store.advance(50.0);
    assert_relative_eq!(store.get(&"a").expect("a").committed(), 5.0);

    pass(&planner, &mut store, &[("a", 20.0)], 50.0);
    let transition = store.get(&"a").and_then(|state| state.transition()).copied();
    assert_eq!(transition.map(|t| t.from()), Some(5.0));

    assert_relative_eq!(store.current(&"a", 100.0).expect("a"), 12.5);
    store.advance(150.0);
    assert_relative_eq!(store.get(&"a").expect("a").committed(), 20.0);
    assert!(!store.is_animating());
}

#[test]
fn exiting_element_is_disposed_only_after_its_animation() {
    let planner = linear_planner();
    let mut store = ElementStore::new();
    pass(&planner, &mut store, &[("a", 10.0), ("b", 4.0)], 0.0);
    store.advance(100.0);

    let reconciliation = pass(&planner, &mut store, &[("a", 10.0)], 200.0);
    assert_eq!(reconciliation.exiting, vec!["b"]);
    assert_eq!(store.len(), 1);
    assert_eq!(store.exiting().len(), 1);

    assert!(store.advance(250.0).is_empty());
    assert_relative_eq!(store.exiting()[0].committed(), 2.0);
    assert_eq!(store.advance(300.0), vec!["b"]);
    assert!(store.exiting().is_empty());
}

#[test]
fn reentering_key_gets_a_fresh_element() {
    let planner = linear_planner();
    let mut store = ElementStore::new();
    pass(&planner, &mut store, &[("a", 10.0)], 0.0);
    store.advance(100.0);

    pass(&planner, &mut store, &[], 200.0);
    pass(&planner, &mut store, &[("a", 30.0)], 250.0);

    assert_eq!(store.exiting().len(), 1);
    let fresh = store.get(&"a").expect("fresh element");
    assert_eq!(fresh.committed(), 0.0);
    assert_eq!(fresh.target(), 30.0);

    assert_eq!(store.advance(300.0), vec!["a"]);
    assert!(store.contains(&"a"));
}

#[test]
fn unchanged_dataset_schedules_only_noop_updates() {
    let planner = linear_planner();
    let mut store = ElementStore::new();
    let targets = [("a", 1.0), ("b", 2.0), ("c", 3.0)];
    pass(&planner, &mut store, &targets, 0.0);
    store.advance(100.0);

    let reconciliation = pass(&planner, &mut store, &targets, 500.0);
    assert!(reconciliation.is_unchanged());
    assert!(
        store
            .live()
            .all(|state| state.transition().is_none_or(|t| t.is_noop()))
    );
}

#[test]
fn first_render_uses_create_timing() {
    let planner = TransitionPlanner::from_timing(AnimationTiming {
        create_ms: 750.0,
        standard_ms: 500.0,
        exit_ms: 375.0,
        easing: Easing::CubicInOut,
    });
    let mut store = ElementStore::new();
    pass(&planner, &mut store, &[("a", 1.0)], 0.0);
    let first = store.get(&"a").and_then(|s| s.transition()).map(|t| t.spec());
    assert_eq!(first.map(|s| s.duration_ms), Some(750.0));

    pass(&planner, &mut store, &[("a", 1.0), ("b", 2.0)], 1000.0);
    let later = store.get(&"b").and_then(|s| s.transition()).map(|t| t.spec());
    assert_eq!(later.map(|s| s.duration_ms), Some(500.0));
}

#[test]
fn invalid_duration_falls_back_to_instant() {
    let transition = Transition::new(0.0, 8.0, 0.0, TransitionSpec::new(f64::NAN, Easing::Linear));
    assert_eq!(transition.sample(0.0), 8.0);
    assert!(transition.is_finished(0.0));

    let negative = Transition::new(0.0, 8.0, 0.0, TransitionSpec::new(-5.0, Easing::Linear));
    assert_eq!(negative.spec(), TransitionSpec::INSTANT);
}

#[test]
fn delayed_transition_holds_start_geometry() {
    let spec = TransitionSpec::new(100.0, Easing::Linear).with_delay(50.0);
    let transition = Transition::new(0.0, 1.0, 0.0, spec);
    assert_eq!(transition.sample(40.0), 0.0);
    assert_relative_eq!(transition.sample(100.0), 0.5);
    assert_eq!(transition.sample(150.0), 1.0);
}
