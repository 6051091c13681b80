use std::f64::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

/// Spherical Mercator projection with a fixed centre, zoom and translate.
///
/// The projection is built once per map instance: only the translate depends
/// on the container, and it is taken from the configured size at
/// construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MercatorProjection {
    /// `[longitude, latitude]` in degrees that lands on `translate`.
    pub center: [f64; 2],
    /// Pixels per radian.
    pub scale: f64,
    pub translate: [f64; 2],
}

impl MercatorProjection {
    #[must_use]
    pub fn new(center: [f64; 2], scale: f64, translate: [f64; 2]) -> Self {
        Self {
            center,
            scale,
            translate,
        }
    }

    /// Projects `(longitude, latitude)` in degrees to pixel `(x, y)`.
    #[must_use]
    pub fn project(&self, longitude: f64, latitude: f64) -> (f64, f64) {
        let (x, y) = mercator(longitude, latitude);
        let (cx, cy) = mercator(self.center[0], self.center[1]);
        (
            self.translate[0] + self.scale * (x - cx),
            self.translate[1] - self.scale * (y - cy),
        )
    }
}

fn mercator(longitude: f64, latitude: f64) -> (f64, f64) {
    let lambda = longitude.to_radians();
    let phi = latitude.to_radians().clamp(-1.484_422_229_745_332, 1.484_422_229_745_332);
    (lambda, (FRAC_PI_4 + phi / 2.0).tan().ln())
}
