//! marsh-charts: keyed, animated bar, donut and bubble-map charts.
//!
//! Every datum is bound to one visual element by a stable key. On each data
//! change the controllers reconcile the new keys against what is on screen,
//! animate entering, updating and exiting elements from their current drawn
//! geometry, and hand backend-agnostic frames to a [`render::Renderer`].
//! Time is driven by the host through [`api::ChartController::tick`].

pub mod animation;
pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{BarChart, BarConfig, ChartController, DonutChart, DonutConfig, MapChart, MapConfig};
pub use error::{ChartError, ChartResult};
