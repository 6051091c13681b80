//! Keyed element persistence and time-bounded interpolation.
//!
//! Controllers compute target geometry from scales, classify keys with
//! [`crate::core::reconcile`], and hand both to a [`TransitionPlanner`] which
//! schedules transitions on an [`ElementStore`]. Frames then call
//! [`ElementStore::advance`] to commit sampled geometry and dispose of
//! finished exits.

mod clock;
mod easing;
mod geometry;
mod planner;
mod store;
mod transition;

pub use clock::{FrameClock, ResizeDebouncer};
pub use easing::Easing;
pub use geometry::{
    ArcGeometry, ArcLabelGeometry, CircleGeometry, Interpolate, LabelGeometry, RectGeometry,
};
pub use planner::{
    AnimationTiming, GeometryRules, PassPlan, PlanContext, PlannedTransition, TransitionPlanner,
};
pub use store::{ElementStore, VisualElementState};
pub use transition::{Transition, TransitionSpec};
