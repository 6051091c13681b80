use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::animation::{ElementStore, Easing, Interpolate, Transition, TransitionSpec};
use crate::core::{ItemKey, Reconciliation};

/// Durations for the three reconciliation groups of one visualization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationTiming {
    /// Enter duration on the very first render.
    pub create_ms: f64,
    /// Enter and update duration afterwards.
    pub standard_ms: f64,
    pub exit_ms: f64,
    pub easing: Easing,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            create_ms: 750.0,
            standard_ms: 500.0,
            exit_ms: 375.0,
            easing: Easing::CubicInOut,
        }
    }
}

/// Read-only view handed to [`GeometryRules`] while a pass is planned.
#[derive(Debug)]
pub struct PlanContext<'a, K, G> {
    pub store: &'a ElementStore<K, G>,
    pub reconciliation: &'a Reconciliation<K>,
    /// Live keys before this pass, in render order.
    pub previous_order: &'a [K],
    /// Freshly computed target geometry, in next render order.
    pub targets: &'a IndexMap<K, G>,
    pub first_render: bool,
    pub now_ms: f64,
}

impl<K: ItemKey, G: Interpolate> PlanContext<'_, K, G> {
    /// Current geometry of the first element after `key` (in next order) that
    /// already exists on screen.
    #[must_use]
    pub fn next_live_neighbor(&self, key: &K) -> Option<G> {
        let index = self.targets.get_index_of(key)?;
        self.targets
            .keys()
            .skip(index + 1)
            .find_map(|candidate| self.store.current(candidate, self.now_ms))
    }

    /// Current geometry of the first element after `key` (in previous order)
    /// that survives this pass.
    #[must_use]
    pub fn next_remaining_neighbor(&self, key: &K) -> Option<G> {
        let index = self.previous_order.iter().position(|candidate| candidate == key)?;
        self.previous_order[index + 1..]
            .iter()
            .filter(|candidate| self.targets.contains_key(*candidate))
            .find_map(|candidate| self.store.current(candidate, self.now_ms))
    }
}

/// Per-visualization choice of where entering elements start and where
/// exiting elements go.
pub trait GeometryRules<K, G> {
    fn enter_from(&self, key: &K, target: &G, context: &PlanContext<'_, K, G>) -> G;

    fn exit_to(&self, key: &K, current: &G, context: &PlanContext<'_, K, G>) -> G;

    /// End geometry of an update; the freshly computed target by default.
    fn update_to(&self, _key: &K, _current: &G, target: &G) -> G
    where
        G: Copy,
    {
        *target
    }
}

/// Start/end geometry chosen for one key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedTransition<K, G> {
    pub key: K,
    pub from: G,
    pub to: G,
}

/// Everything scheduled by one [`TransitionPlanner::plan_and_run`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct PassPlan<K, G> {
    pub entering: Vec<PlannedTransition<K, G>>,
    pub updating: Vec<PlannedTransition<K, G>>,
    pub exiting: Vec<PlannedTransition<K, G>>,
}

impl<K, G> Default for PassPlan<K, G> {
    fn default() -> Self {
        Self {
            entering: Vec::new(),
            updating: Vec::new(),
            exiting: Vec::new(),
        }
    }
}

/// Schedules enter/update/exit transitions on an [`ElementStore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionPlanner {
    create: TransitionSpec,
    enter: TransitionSpec,
    update: TransitionSpec,
    exit: TransitionSpec,
}

impl TransitionPlanner {
    #[must_use]
    pub fn from_timing(timing: AnimationTiming) -> Self {
        Self {
            create: TransitionSpec::new(timing.create_ms, timing.easing),
            enter: TransitionSpec::new(timing.standard_ms, timing.easing),
            update: TransitionSpec::new(timing.standard_ms, timing.easing),
            exit: TransitionSpec::new(timing.exit_ms, timing.easing),
        }
    }

    /// Uses `spec` for every enter, first render included.
    #[must_use]
    pub fn with_enter(mut self, spec: TransitionSpec) -> Self {
        self.create = spec;
        self.enter = spec;
        self
    }

    #[must_use]
    pub fn enter_spec(&self, first_render: bool) -> TransitionSpec {
        if first_render { self.create } else { self.enter }
    }

    #[must_use]
    pub fn update_spec(&self) -> TransitionSpec {
        self.update
    }

    #[must_use]
    pub fn exit_spec(&self) -> TransitionSpec {
        self.exit
    }

    /// Plans all three groups of `reconciliation` against `store` and starts
    /// their transitions at `now_ms`.
    ///
    /// Start geometry for updates is the element's current drawn geometry, so
    /// re-running an unchanged dataset after animations settle schedules
    /// only no-op updates. Keys the store no longer knows are logged and
    /// skipped.
    pub fn plan_and_run<K, G, R>(
        &self,
        store: &mut ElementStore<K, G>,
        reconciliation: &Reconciliation<K>,
        targets: &IndexMap<K, G>,
        rules: &R,
        now_ms: f64,
    ) -> PassPlan<K, G>
    where
        K: ItemKey,
        G: Interpolate,
        R: GeometryRules<K, G>,
    {
        let previous_order = store.key_order();
        let first_render = !store.has_rendered();
        let plan = {
            let context = PlanContext {
                store: &*store,
                reconciliation,
                previous_order: &previous_order,
                targets,
                first_render,
                now_ms,
            };
            build_plan(&context, rules)
        };

        let enter_spec = self.enter_spec(first_render);
        for planned in &plan.entering {
            store.insert_entering(
                planned.key.clone(),
                Transition::new(planned.from, planned.to, now_ms, enter_spec),
            );
        }
        for planned in &plan.updating {
            let transition = Transition::new(planned.from, planned.to, now_ms, self.update);
            if !store.begin_update(&planned.key, transition) {
                warn!(key = ?planned.key, "update for unknown element skipped");
            }
        }
        for planned in &plan.exiting {
            let transition = Transition::new(planned.from, planned.to, now_ms, self.exit);
            if !store.begin_exit(&planned.key, transition) {
                warn!(key = ?planned.key, "exit for unknown element skipped");
            }
        }

        let order: Vec<K> = targets.keys().cloned().collect();
        store.reorder(&order);

        debug!(
            entering = plan.entering.len(),
            updating = plan.updating.len(),
            exiting = plan.exiting.len(),
            first_render,
            "planned transitions"
        );
        plan
    }
}

fn build_plan<K, G, R>(context: &PlanContext<'_, K, G>, rules: &R) -> PassPlan<K, G>
where
    K: ItemKey,
    G: Interpolate,
    R: GeometryRules<K, G>,
{
    let mut plan = PassPlan::default();

    for key in &context.reconciliation.entering {
        let Some(target) = context.targets.get(key) else {
            warn!(?key, "entering key has no target geometry");
            continue;
        };
        plan.entering.push(PlannedTransition {
            key: key.clone(),
            from: rules.enter_from(key, target, context),
            to: *target,
        });
    }

    for key in &context.reconciliation.updating {
        let (Some(target), Some(current)) = (
            context.targets.get(key),
            context.store.current(key, context.now_ms),
        ) else {
            warn!(?key, "updating key is stale");
            continue;
        };
        plan.updating.push(PlannedTransition {
            key: key.clone(),
            from: current,
            to: rules.update_to(key, &current, target),
        });
    }

    for key in &context.reconciliation.exiting {
        let Some(current) = context.store.current(key, context.now_ms) else {
            warn!(?key, "exiting key is stale");
            continue;
        };
        plan.exiting.push(PlannedTransition {
            key: key.clone(),
            from: current,
            to: rules.exit_to(key, &current, context),
        });
    }

    plan
}
