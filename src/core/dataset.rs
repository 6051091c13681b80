use indexmap::IndexSet;
use ordered_float::OrderedFloat;

use crate::core::types::{BarSeries, Item, ItemKey, Record};
use crate::error::{ChartError, ChartResult};

/// Percentage of `value` in `total`, with an empty total mapping to `0`.
#[must_use]
pub fn percentage(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value * 100.0 / total
    } else {
        0.0
    }
}

/// Rounds to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Validated, immutable snapshot of the records pushed by the host.
///
/// A new snapshot replaces the previous one wholesale; nothing is mutated in
/// place, so the previous snapshot stays available for diffing.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<R: Record> {
    records: Vec<R>,
    keys: IndexSet<R::Key>,
    total: f64,
    any_selected: bool,
}

impl<R: Record> Default for Dataset<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            keys: IndexSet::new(),
            total: 0.0,
            any_selected: false,
        }
    }
}

impl<R: Record> Dataset<R> {
    /// Validates keys and magnitudes, then computes the aggregate total.
    pub fn new(records: Vec<R>) -> ChartResult<Self> {
        let mut keys = IndexSet::with_capacity(records.len());
        let mut total = 0.0;
        let mut any_selected = false;
        for record in &records {
            let item = record.item();
            validate_magnitude(item)?;
            if !keys.insert(item.id.clone()) {
                return Err(duplicate_key(&item.id));
            }
            total += item.value;
            any_selected |= item.selected;
        }

        Ok(Self {
            records,
            keys,
            total,
            any_selected,
        })
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub fn keys(&self) -> &IndexSet<R::Key> {
        &self.keys
    }

    #[must_use]
    pub fn get(&self, key: &R::Key) -> Option<&R> {
        self.keys.get_index_of(key).map(|index| &self.records[index])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.total
    }

    /// `true` while at least one record is externally marked `selected`.
    #[must_use]
    pub fn any_selected(&self) -> bool {
        self.any_selected
    }

    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.records
            .iter()
            .map(|record| OrderedFloat(record.item().value))
            .max()
            .map_or(0.0, |max| max.0)
    }

    /// `(min, max)` over record values, or `None` for an empty snapshot.
    #[must_use]
    pub fn value_extent(&self) -> Option<(f64, f64)> {
        let values = self.records.iter().map(|record| OrderedFloat(record.item().value));
        let min = values.clone().min()?;
        let max = values.max()?;
        Some((min.0, max.0))
    }

    #[must_use]
    pub fn percentage_of(&self, key: &R::Key) -> Option<f64> {
        self.get(key)
            .map(|record| percentage(record.item().value, self.total))
    }
}

/// Validated snapshot for the grouped bar variant.
///
/// Keys are unique across every series, and each series keeps its own total
/// so that percentages are computed per series.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedDataset<K: ItemKey> {
    series: Vec<SeriesSnapshot<K>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSnapshot<K: ItemKey> {
    pub name: String,
    pub data: Dataset<Item<K>>,
}

impl<K: ItemKey> Default for GroupedDataset<K> {
    fn default() -> Self {
        Self { series: Vec::new() }
    }
}

impl<K: ItemKey> GroupedDataset<K> {
    pub fn new(series: Vec<BarSeries<K>>) -> ChartResult<Self> {
        let mut seen = IndexSet::new();
        let mut snapshots = Vec::with_capacity(series.len());
        for BarSeries { name, bars } in series {
            let data = Dataset::new(bars)?;
            for key in data.keys() {
                if !seen.insert(key.clone()) {
                    return Err(duplicate_key(key));
                }
            }
            snapshots.push(SeriesSnapshot { name, data });
        }
        Ok(Self { series: snapshots })
    }

    /// Wraps a single flat bar list as one unnamed series.
    pub fn single(bars: Vec<Item<K>>) -> ChartResult<Self> {
        Self::new(vec![BarSeries::new(String::new(), bars)])
    }

    #[must_use]
    pub fn series(&self) -> &[SeriesSnapshot<K>] {
        &self.series
    }

    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.series.len() > 1
    }

    #[must_use]
    pub fn any_selected(&self) -> bool {
        self.series.iter().any(|series| series.data.any_selected())
    }

    /// Iterates `(series index, item)` in series-major order.
    pub fn items(&self) -> impl Iterator<Item = (usize, &Item<K>)> {
        self.series
            .iter()
            .enumerate()
            .flat_map(|(index, series)| series.data.records().iter().map(move |item| (index, item)))
    }

    /// Looks up an item together with the total of the series it belongs to.
    #[must_use]
    pub fn find(&self, key: &K) -> Option<(&Item<K>, f64)> {
        self.series
            .iter()
            .find_map(|series| series.data.get(key).map(|item| (item, series.data.total())))
    }

    /// Distinct category labels in first-appearance order.
    #[must_use]
    pub fn categories(&self) -> IndexSet<&str> {
        self.items().map(|(_, item)| item.label.as_str()).collect()
    }

    /// Axis ceiling shared by every series.
    ///
    /// This is the largest single value over the largest series total, which
    /// for one series equals the largest percentage. With several series it
    /// couples them: bars of a series with a small total can overshoot.
    #[must_use]
    pub fn max_percentage(&self) -> f64 {
        let max_value = self
            .series
            .iter()
            .map(|series| OrderedFloat(series.data.max_value()))
            .max()
            .map_or(0.0, |max| max.0);
        let max_total = self
            .series
            .iter()
            .map(|series| OrderedFloat(series.data.total()))
            .max()
            .map_or(0.0, |max| max.0);
        percentage(max_value, max_total)
    }
}

fn validate_magnitude<K: ItemKey>(item: &Item<K>) -> ChartResult<()> {
    if !item.value.is_finite() || item.value < 0.0 {
        return Err(ChartError::InvalidMagnitude {
            key: format!("{:?}", item.id),
            value: item.value,
        });
    }
    Ok(())
}

fn duplicate_key<K: ItemKey>(key: &K) -> ChartError {
    ChartError::DuplicateKey {
        key: format!("{key:?}"),
    }
}
