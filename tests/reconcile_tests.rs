use marsh_charts::ChartError;
use marsh_charts::core::reconcile;
use proptest::prelude::*;
use std::collections::HashSet;

#[test]
fn classifies_enter_update_exit_in_render_order() {
    let previous = ["a", "b", "c"];
    let next = ["d", "c", "b"];

    let result = reconcile(previous.iter(), next.iter()).expect("reconcile");
    assert_eq!(result.entering, vec!["d"]);
    assert_eq!(result.updating, vec!["c", "b"]);
    assert!(result.exiting.is_empty());
}

#[test]
fn exiting_keys_keep_previous_order() {
    let previous = [3, 1, 2, 5];
    let next = [1];

    let result = reconcile(previous.iter(), next.iter()).expect("reconcile");
    assert_eq!(result.exiting, vec![3, 2, 5]);
    assert_eq!(result.updating, vec![1]);
    assert_eq!(result.total_keys(), 4);
}

#[test]
fn first_render_enters_everything() {
    let previous: [&str; 0] = [];
    let next = ["x", "y"];

    let result = reconcile(previous.iter(), next.iter()).expect("reconcile");
    assert_eq!(result.entering, vec!["x", "y"]);
    assert!(result.updating.is_empty());
    assert!(result.exiting.is_empty());
}

#[test]
fn unchanged_key_set_is_detected() {
    let keys = ["a", "b"];
    let result = reconcile(keys.iter(), keys.iter()).expect("reconcile");
    assert!(result.is_unchanged());
}

#[test]
fn duplicate_next_key_is_rejected() {
    let previous = ["a"];
    let next = ["a", "b", "a"];

    let err = reconcile(previous.iter(), next.iter()).expect_err("duplicate must fail");
    assert!(matches!(err, ChartError::DuplicateKey { .. }));
}

proptest! {
    #[test]
    fn groups_partition_both_key_sets(
        previous in proptest::collection::hash_set(0u16..200, 0..60),
        next in proptest::collection::hash_set(0u16..200, 0..60)
    ) {
        let previous: Vec<u16> = previous.into_iter().collect();
        let next: Vec<u16> = next.into_iter().collect();

        let result = reconcile(previous.iter(), next.iter()).expect("reconcile");

        let entering: HashSet<u16> = result.entering.iter().copied().collect();
        let updating: HashSet<u16> = result.updating.iter().copied().collect();
        let exiting: HashSet<u16> = result.exiting.iter().copied().collect();
        let previous_set: HashSet<u16> = previous.iter().copied().collect();
        let next_set: HashSet<u16> = next.iter().copied().collect();

        prop_assert!(entering.is_disjoint(&updating));
        prop_assert!(entering.is_disjoint(&exiting));
        prop_assert!(updating.is_disjoint(&exiting));
        prop_assert_eq!(&entering | &updating, next_set.clone());
        prop_assert_eq!(&updating | &exiting, previous_set.clone());
        prop_assert_eq!(entering, &next_set - &previous_set);
        prop_assert_eq!(exiting, &previous_set - &next_set);
    }
}
