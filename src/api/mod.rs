//! Host-facing chart controllers.
//!
//! Each controller owns its dataset snapshot, element stores and renderer.
//! The host feeds data, container sizes, pointer input and frame ticks; the
//! controllers hand finished [`crate::render::RenderFrame`]s to the renderer.

mod bar_chart;
mod chart_runtime;
mod config;
mod controller;
mod donut_chart;
mod map_chart;
mod map_view_box;
mod scale_provider;

pub use bar_chart::BarChart;
pub use chart_runtime::ChartRuntime;
pub use config::{BarConfig, DonutConfig, MapConfig};
pub use controller::ChartController;
pub use donut_chart::DonutChart;
pub use map_chart::MapChart;
pub use map_view_box::{MapViewBox, ViewBoxRect};
pub use scale_provider::{BarScales, DonutScales, MapScales, pie_angles};
