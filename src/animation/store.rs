use indexmap::IndexMap;
use tracing::trace;

use crate::animation::{Interpolate, Transition};
use crate::core::ItemKey;

/// Per-key geometry persisted across renders.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualElementState<K, G> {
    key: K,
    committed: G,
    transition: Option<Transition<G>>,
}

impl<K: ItemKey, G: Interpolate> VisualElementState<K, G> {
    fn new(key: K, committed: G, transition: Option<Transition<G>>) -> Self {
        Self {
            key,
            committed,
            transition,
        }
    }

    #[must_use]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Geometry written by the most recent [`ElementStore::advance`].
    #[must_use]
    pub fn committed(&self) -> G {
        self.committed
    }

    /// Geometry as it would be drawn at `now_ms`.
    ///
    /// This is what a new update starts from, so an interrupted animation
    /// continues from where it visibly is.
    #[must_use]
    pub fn current(&self, now_ms: f64) -> G {
        self.transition
            .map_or(self.committed, |transition| transition.sample(now_ms))
    }

    #[must_use]
    pub fn transition(&self) -> Option<&Transition<G>> {
        self.transition.as_ref()
    }

    /// Final geometry once any in-flight transition lands.
    #[must_use]
    pub fn target(&self) -> G {
        self.transition
            .map_or(self.committed, |transition| transition.to())
    }

    fn start(&mut self, transition: Transition<G>) {
        self.transition = Some(transition);
    }

    /// Commits the sampled geometry; returns `true` once no transition remains.
    fn advance(&mut self, now_ms: f64) -> bool {
        let Some(transition) = self.transition else {
            return true;
        };
        self.committed = transition.sample(now_ms);
        if transition.is_finished(now_ms) {
            self.transition = None;
            return true;
        }
        false
    }
}

/// Keyed `key → VisualElementState` map owned by one chart controller.
///
/// Live elements are kept in render order. Exiting elements are moved to a
/// separate list when their exit starts and only dropped once the exit has
/// finished, so a key that re-enters while its old element is still
/// collapsing gets a fresh, unrelated element.
#[derive(Debug, Clone)]
pub struct ElementStore<K, G> {
    live: IndexMap<K, VisualElementState<K, G>>,
    exiting: Vec<VisualElementState<K, G>>,
    rendered_once: bool,
}

impl<K: ItemKey, G: Interpolate> Default for ElementStore<K, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ItemKey, G: Interpolate> ElementStore<K, G> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            live: IndexMap::new(),
            exiting: Vec::new(),
            rendered_once: false,
        }
    }

    /// `true` after the first pass that created at least one element.
    #[must_use]
    pub fn has_rendered(&self) -> bool {
        self.rendered_once
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.live.keys()
    }

    #[must_use]
    pub fn key_order(&self) -> Vec<K> {
        self.live.keys().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.live.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&VisualElementState<K, G>> {
        self.live.get(key)
    }

    #[must_use]
    pub fn current(&self, key: &K, now_ms: f64) -> Option<G> {
        self.live.get(key).map(|state| state.current(now_ms))
    }

    pub fn live(&self) -> impl Iterator<Item = &VisualElementState<K, G>> {
        self.live.values()
    }

    #[must_use]
    pub fn exiting(&self) -> &[VisualElementState<K, G>] {
        &self.exiting
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.exiting.is_empty()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.exiting.is_empty() || self.live.values().any(|state| state.transition.is_some())
    }

    pub(crate) fn insert_entering(&mut self, key: K, transition: Transition<G>) {
        let state = VisualElementState::new(key.clone(), transition.from(), Some(transition));
        self.live.insert(key, state);
        self.rendered_once = true;
    }

    /// Restarts the element's transition; `false` when the key is not live.
    pub(crate) fn begin_update(&mut self, key: &K, transition: Transition<G>) -> bool {
        match self.live.get_mut(key) {
            Some(state) => {
                state.start(transition);
                true
            }
            None => false,
        }
    }

    /// Moves the element to the exiting list; `false` when the key is not live.
    pub(crate) fn begin_exit(&mut self, key: &K, transition: Transition<G>) -> bool {
        match self.live.shift_remove(key) {
            Some(mut state) => {
                state.start(transition);
                self.exiting.push(state);
                true
            }
            None => false,
        }
    }

    /// Reorders live elements to follow `order`; unknown keys are ignored.
    pub(crate) fn reorder(&mut self, order: &[K]) {
        let mut reordered = IndexMap::with_capacity(self.live.len());
        for key in order {
            if let Some((key, state)) = self.live.shift_remove_entry(key) {
                reordered.insert(key, state);
            }
        }
        reordered.extend(self.live.drain(..));
        self.live = reordered;
    }

    /// Samples every transition at `now_ms` and commits the result.
    ///
    /// Exiting elements whose animation has ended are discarded here and their
    /// keys returned, in the order their exits were started.
    pub fn advance(&mut self, now_ms: f64) -> Vec<K> {
        for state in self.live.values_mut() {
            state.advance(now_ms);
        }

        let mut disposed = Vec::new();
        self.exiting.retain_mut(|state| {
            if state.advance(now_ms) {
                disposed.push(state.key.clone());
                false
            } else {
                true
            }
        });
        if !disposed.is_empty() {
            trace!(count = disposed.len(), "disposed exited elements");
        }
        disposed
    }

    pub fn clear(&mut self) {
        self.live.clear();
        self.exiting.clear();
        self.rendered_once = false;
    }
}
