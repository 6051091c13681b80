//! Per-chart configuration.
//!
//! Every struct is `#[serde(default)]`, so a partial JSON object overrides the
//! documented defaults field by field and silently keeps the rest. Values are
//! not range-checked; out-of-range input is the caller's responsibility.

use serde::{Deserialize, Serialize};

use crate::animation::{AnimationTiming, Easing};
use crate::error::ChartResult;
use crate::interaction::TooltipPlacement;
use crate::render::Color;

const AXIS_COLOR: Color = Color::rgb(0xbb as f64 / 255.0, 0xbc as f64 / 255.0, 0xbc as f64 / 255.0);
const TEXT_COLOR: Color = Color::rgb(0.2, 0.2, 0.2);

/// Bar chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BarConfig {
    pub y_axis_name: String,
    /// Requested width; the rendered width never exceeds the container.
    pub width: f64,
    pub height: f64,
    pub label_top_padding: f64,
    pub count_rect_height: f64,
    pub gap_between_column_and_count: f64,
    pub tick_y_percentage: f64,
    pub margin_left: f64,
    pub axis_font_size: f64,
    pub category_padding_inner: f64,
    pub category_padding_outer: f64,
    pub series_padding_inner: f64,
    pub axis_color: Color,
    pub text_color: Color,
    pub timing: AnimationTiming,
    /// Count labels fade in over this duration after the standard delay.
    pub count_fade_ms: f64,
    pub resize_debounce_ms: f64,
    pub tooltip: TooltipPlacement,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            y_axis_name: String::new(),
            width: 1800.0,
            height: 400.0,
            label_top_padding: 15.0,
            count_rect_height: 20.0,
            gap_between_column_and_count: 5.0,
            tick_y_percentage: 10.0,
            margin_left: 50.0,
            axis_font_size: 12.0,
            category_padding_inner: 0.5,
            category_padding_outer: 0.3,
            series_padding_inner: 0.2,
            axis_color: AXIS_COLOR,
            text_color: TEXT_COLOR,
            timing: AnimationTiming {
                create_ms: 750.0,
                standard_ms: 500.0,
                exit_ms: 375.0,
                easing: Easing::Linear,
            },
            count_fade_ms: 250.0,
            resize_debounce_ms: 100.0,
            tooltip: TooltipPlacement::default(),
        }
    }
}

impl BarConfig {
    /// Parses a partial JSON object over the defaults.
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Donut/pie chart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DonutConfig {
    pub width: f64,
    pub height: f64,
    pub total_title: String,
    pub label_font_size: f64,
    pub total_title_font_size: f64,
    pub total_value_font_size: f64,
    pub text_color: Color,
    pub timing: AnimationTiming,
    /// Fade-in of slice labels and the total on first appearance.
    pub label_fade_ms: f64,
    /// Duration of the hover enlarge/relax animation.
    pub hover_ms: f64,
    pub resize_debounce_ms: f64,
    pub tooltip: TooltipPlacement,
}

impl Default for DonutConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 300.0,
            total_title: "Total:".to_owned(),
            label_font_size: 12.0,
            total_title_font_size: 14.0,
            total_value_font_size: 20.0,
            text_color: TEXT_COLOR,
            timing: AnimationTiming {
                create_ms: 1000.0,
                standard_ms: 1000.0,
                exit_ms: 1000.0,
                easing: Easing::CubicInOut,
            },
            label_fade_ms: 250.0,
            hover_ms: 300.0,
            resize_debounce_ms: 100.0,
            tooltip: TooltipPlacement::default(),
        }
    }
}

impl DonutConfig {
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Bubble map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
    pub width: f64,
    pub height: f64,
    /// `[min, max]` bubble radius in pixels.
    pub bubble_radius_range: [f64; 2],
    /// `[longitude, latitude]` placed at the centre of the map.
    pub projection_center: [f64; 2],
    pub projection_scale: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Fraction of the view box removed per wheel notch.
    pub wheel_zoom_step: f64,
    /// Fraction of the view box removed by one zoom-in command.
    pub zoom_in_step: f64,
    pub bubble_stroke: Color,
    pub bubble_stroke_width: f64,
    pub label_font_size: f64,
    /// Vertical offset of the value label from the bubble centre.
    pub label_offset_y: f64,
    pub text_color: Color,
    pub timing: AnimationTiming,
    pub resize_debounce_ms: f64,
    pub tooltip: TooltipPlacement,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
            bubble_radius_range: [8.0, 18.0],
            projection_center: [0.0, 40.0],
            projection_scale: 135.0,
            min_zoom: 1.0,
            max_zoom: 20.0,
            wheel_zoom_step: 0.05,
            zoom_in_step: 0.2,
            bubble_stroke: Color::rgb(0x3c as f64 / 255.0, 0x47 as f64 / 255.0, 0xe6 as f64 / 255.0),
            bubble_stroke_width: 1.0,
            label_font_size: 12.0,
            label_offset_y: 5.0,
            text_color: TEXT_COLOR,
            timing: AnimationTiming::default(),
            resize_debounce_ms: 100.0,
            tooltip: TooltipPlacement {
                offset_x: 5.0,
                offset_y: 10.0,
            },
        }
    }
}

impl MapConfig {
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
