use indexmap::IndexSet;

use crate::error::{ChartError, ChartResult};

/// Padding fractions applied to a [`BandScale`], both in units of one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPadding {
    pub inner: f64,
    pub outer: f64,
}

impl BandPadding {
    #[must_use]
    pub const fn new(inner: f64, outer: f64) -> Self {
        Self { inner, outer }
    }
}

/// Discrete category → band mapping.
///
/// The range is split into equal steps; each band is one step minus the
/// inner padding, and the leftover outer padding is centred. Positions depend
/// only on the number and order of categories, never on values.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    domain: IndexSet<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new<I, S>(domain: I, range: (f64, f64), padding: BandPadding) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "band range must be finite".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&padding.inner) || !padding.outer.is_finite() || padding.outer < 0.0
        {
            return Err(ChartError::InvalidData(
                "band padding must be inner in [0, 1] and outer >= 0".to_owned(),
            ));
        }

        let domain: IndexSet<String> = domain.into_iter().map(Into::into).collect();
        let count = domain.len() as f64;
        let (range_start, range_end) = range;
        let step = (range_end - range_start) / (count - padding.inner + padding.outer * 2.0).max(1.0);
        let start = range_start + (range_end - range_start - step * (count - padding.inner)) * 0.5;
        let bandwidth = step * (1.0 - padding.inner);

        Ok(Self {
            domain,
            start,
            step,
            bandwidth,
        })
    }

    /// Leading edge of the band for `category`, if it is part of the domain.
    #[must_use]
    pub fn position(&self, category: &str) -> Option<f64> {
        self.domain
            .get_index_of(category)
            .map(|index| self.start + self.step * index as f64)
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }

    #[must_use]
    pub fn domain(&self) -> &IndexSet<String> {
        &self.domain
    }

    /// `(category, leading edge)` pairs in domain order.
    pub fn bands(&self) -> impl Iterator<Item = (&str, f64)> {
        self.domain
            .iter()
            .enumerate()
            .map(|(index, category)| (category.as_str(), self.start + self.step * index as f64))
    }
}
