//! Keyed enter/update/exit classification between two consecutive renders.

use indexmap::IndexSet;
use tracing::trace;

use crate::core::types::ItemKey;
use crate::error::{ChartError, ChartResult};

/// Disjoint key groups produced by [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<K> {
    /// Keys new in this render, in next-dataset order.
    pub entering: Vec<K>,
    /// Keys present before and now, in next-dataset order.
    pub updating: Vec<K>,
    /// Keys present before and absent now, in previous order.
    pub exiting: Vec<K>,
}

impl<K> Default for Reconciliation<K> {
    fn default() -> Self {
        Self {
            entering: Vec::new(),
            updating: Vec::new(),
            exiting: Vec::new(),
        }
    }
}

impl<K: ItemKey> Reconciliation<K> {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }

    #[must_use]
    pub fn total_keys(&self) -> usize {
        self.entering.len() + self.updating.len() + self.exiting.len()
    }
}

/// Classifies `next` against `previous`.
///
/// Keys are only compared for equality (through hashing). A key repeated in
/// `next` is rejected with [`ChartError::DuplicateKey`] instead of letting one
/// instance silently win.
pub fn reconcile<'a, K, P, N>(previous: P, next: N) -> ChartResult<Reconciliation<K>>
where
    K: ItemKey,
    P: IntoIterator<Item = &'a K>,
    N: IntoIterator<Item = &'a K>,
{
    let previous: IndexSet<&K> = previous.into_iter().collect();
    let mut seen: IndexSet<&K> = IndexSet::with_capacity(previous.len());
    let mut result = Reconciliation::default();

    for key in next {
        if !seen.insert(key) {
            return Err(ChartError::DuplicateKey {
                key: format!("{key:?}"),
            });
        }
        if previous.contains(key) {
            result.updating.push(key.clone());
        } else {
            result.entering.push(key.clone());
        }
    }

    result.exiting = previous
        .into_iter()
        .filter(|key| !seen.contains(*key))
        .cloned()
        .collect();

    trace!(
        entering = result.entering.len(),
        updating = result.updating.len(),
        exiting = result.exiting.len(),
        "reconciled keys"
    );
    Ok(result)
}
