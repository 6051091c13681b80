use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::animation::{Easing, Interpolate};

/// Delay, duration and easing for one scheduled interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub delay_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl TransitionSpec {
    /// Completes on the first sample.
    pub const INSTANT: Self = Self {
        delay_ms: 0.0,
        duration_ms: 0.0,
        easing: Easing::Linear,
    };

    #[must_use]
    pub const fn new(duration_ms: f64, easing: Easing) -> Self {
        Self {
            delay_ms: 0.0,
            duration_ms,
            easing,
        }
    }

    #[must_use]
    pub const fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn is_animated(self) -> bool {
        self.duration_ms.is_finite()
            && self.duration_ms > 0.0
            && self.delay_ms.is_finite()
            && self.delay_ms >= 0.0
    }

    /// Replaces unusable timing with [`Self::INSTANT`].
    #[must_use]
    pub fn sanitized(self) -> Self {
        if self.is_animated() {
            return self;
        }
        if self.duration_ms != 0.0 || self.delay_ms != 0.0 {
            warn!(
                duration_ms = self.duration_ms,
                delay_ms = self.delay_ms,
                "invalid transition timing, falling back to an instant transition"
            );
        }
        Self::INSTANT
    }
}

/// Time-bounded interpolation between two geometries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition<G> {
    from: G,
    to: G,
    started_at_ms: f64,
    spec: TransitionSpec,
}

impl<G: Interpolate> Transition<G> {
    #[must_use]
    pub fn new(from: G, to: G, started_at_ms: f64, spec: TransitionSpec) -> Self {
        Self {
            from,
            to,
            started_at_ms,
            spec: spec.sanitized(),
        }
    }

    #[must_use]
    pub fn from(&self) -> G {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> G {
        self.to
    }

    #[must_use]
    pub fn spec(&self) -> TransitionSpec {
        self.spec
    }

    /// `true` when sampling can never change the geometry.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    /// Linear progress in `[0, 1]`, before easing.
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if !self.spec.is_animated() {
            return 1.0;
        }
        let elapsed = now_ms - self.started_at_ms - self.spec.delay_ms;
        (elapsed / self.spec.duration_ms).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    #[must_use]
    pub fn sample(&self, now_ms: f64) -> G {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            self.to
        } else if t <= 0.0 {
            self.from
        } else {
            self.from.interpolate(&self.to, self.spec.easing.apply(t))
        }
    }
}
