use serde::{Deserialize, Serialize};

const BACK_OVERSHOOT: f64 = 1.701_58;

/// Timing curve applied to normalized transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    /// Symmetric cubic ease, the default for data transitions.
    #[default]
    CubicInOut,
    /// Overshoots slightly at both ends; used when a hovered arc relaxes.
    BackInOut,
}

impl Easing {
    /// Maps `t` in `[0, 1]` to eased progress. Endpoints are exact.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
            Self::BackInOut => {
                let s = BACK_OVERSHOOT;
                let t = t * 2.0;
                if t < 1.0 {
                    t * t * ((s + 1.0) * t - s) / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * ((s + 1.0) * t + s) + 2.0) / 2.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Easing;

    #[test]
    fn endpoints_are_exact() {
        for easing in [Easing::Linear, Easing::CubicInOut, Easing::BackInOut] {
            assert!(easing.apply(0.0).abs() <= 1e-12);
            assert!((easing.apply(1.0) - 1.0).abs() <= 1e-12);
        }
    }

    #[test]
    fn cubic_is_symmetric_at_midpoint() {
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() <= 1e-12);
    }
}
