use serde::{Deserialize, Serialize};

/// Geometry that can be blended between two states.
pub trait Interpolate: Copy + PartialEq {
    /// Value at eased progress `t`; `t = 0` yields `self`, `t = 1` yields `to`.
    #[must_use]
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

/// Column bounds in chart-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectGeometry {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

impl Interpolate for RectGeometry {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            width: lerp(self.width, to.width, t),
            height: lerp(self.height, to.height, t),
        }
    }
}

/// Angular span of one pie/donut slice, radians clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcGeometry {
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ArcGeometry {
    #[must_use]
    pub const fn new(start_angle: f64, end_angle: f64) -> Self {
        Self {
            start_angle,
            end_angle,
        }
    }

    /// Zero-width wedge at `angle`.
    #[must_use]
    pub const fn collapsed(angle: f64) -> Self {
        Self::new(angle, angle)
    }

    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + (self.end_angle - self.start_angle) / 2.0
    }
}

impl Interpolate for ArcGeometry {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            start_angle: lerp(self.start_angle, to.start_angle, t),
            end_angle: lerp(self.end_angle, to.end_angle, t),
        }
    }
}

/// Bubble centre and radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl CircleGeometry {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

impl Interpolate for CircleGeometry {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            center_x: lerp(self.center_x, to.center_x, t),
            center_y: lerp(self.center_y, to.center_y, t),
            radius: lerp(self.radius, to.radius, t),
        }
    }
}

/// Positioned numeric label.
///
/// An `exact` label shows `value` as given; otherwise the value is rounded to
/// an integer. Values in motion are always rounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelGeometry {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub opacity: f64,
    pub exact: bool,
}

impl LabelGeometry {
    #[must_use]
    pub fn text(&self) -> String {
        if self.exact {
            self.value.to_string()
        } else {
            (self.value.round() as i64).to_string()
        }
    }
}

impl Interpolate for LabelGeometry {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            value: lerp(self.value, to.value, t),
            opacity: lerp(self.opacity, to.opacity, t),
            exact: self.exact && to.exact && self.value == to.value,
        }
    }
}

/// Slice label that travels with its arc; positioned from the angles at draw time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcLabelGeometry {
    pub arc: ArcGeometry,
    pub value: f64,
    pub opacity: f64,
}

impl Interpolate for ArcLabelGeometry {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        Self {
            arc: self.arc.interpolate(&to.arc, t),
            value: lerp(self.value, to.value, t),
            opacity: lerp(self.opacity, to.opacity, t),
        }
    }
}
