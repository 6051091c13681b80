use crate::error::{ChartError, ChartResult};

/// Continuous `domain → range` mapping.
///
/// The range may be inverted (`range_start > range_end`), which is how the
/// magnitude axis maps larger values to smaller pixel-y. A degenerate domain
/// maps every value to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale domain must be finite".to_owned(),
            ));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start: domain.0,
            domain_end: domain.1,
            range_start: range.0,
            range_end: range.1,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let span = self.domain_end - self.domain_start;
        let normalized = if span == 0.0 {
            0.5
        } else {
            (value - self.domain_start) / span
        };
        self.range_start + normalized * (self.range_end - self.range_start)
    }

    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let normalized = (pixel - self.range_start) / span;
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}

/// Square-root mapping used for bubble radii.
///
/// Values are compared on a `sqrt` axis so that area, not radius, grows with
/// the value and large magnitudes do not dominate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    inner: LinearScale,
}

impl SqrtScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        if domain.0 < 0.0 || domain.1 < 0.0 {
            return Err(ChartError::InvalidData(
                "sqrt scale domain must be >= 0".to_owned(),
            ));
        }
        Ok(Self {
            inner: LinearScale::new((domain.0.sqrt(), domain.1.sqrt()), range)?,
        })
    }

    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        self.inner.map(value.max(0.0).sqrt())
    }
}
