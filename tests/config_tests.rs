use marsh_charts::animation::Easing;
use marsh_charts::render::Color;
use marsh_charts::{BarConfig, ChartError, DonutConfig, MapConfig};

#[test]
fn partial_bar_json_keeps_remaining_defaults() {
    let config = BarConfig::from_json_str(r#"{"width":900,"yAxisName":"Share"}"#)
        .expect("valid config");

    assert_eq!(config.width, 900.0);
    assert_eq!(config.y_axis_name, "Share");
    assert_eq!(config.height, 400.0);
    assert_eq!(config.tick_y_percentage, 10.0);
    assert_eq!(config.timing.create_ms, 750.0);
    assert_eq!(config.timing.easing, Easing::Linear);
}

#[test]
fn nested_timing_and_colors_parse() {
    let config = BarConfig::from_json_str(
        r#"{
            "timing": {"standardMs": 200, "easing": "backInOut"},
            "axisColor": {"red": 1.0, "green": 0.0, "blue": 0.0, "alpha": 1.0},
            "tooltip": {"offsetX": 4}
        }"#,
    )
    .expect("valid config");

    assert_eq!(config.timing.standard_ms, 200.0);
    assert_eq!(config.timing.exit_ms, 375.0);
    assert_eq!(config.timing.easing, Easing::BackInOut);
    assert_eq!(config.axis_color, Color::rgb(1.0, 0.0, 0.0));
    assert_eq!(config.tooltip.offset_x, 4.0);
    assert_eq!(config.tooltip.offset_y, 25.0);
}

#[test]
fn malformed_json_is_reported_as_config_error() {
    let result = BarConfig::from_json_str(r#"{"width": "wide"}"#);
    assert!(matches!(result, Err(ChartError::InvalidConfig(_))));

    let result = DonutConfig::from_json_str("{");
    assert!(matches!(result, Err(ChartError::InvalidConfig(_))));
}

#[test]
fn donut_defaults() {
    let config = DonutConfig::from_json_str("{}").expect("valid config");
    assert_eq!(config, DonutConfig::default());
    assert_eq!(config.width, 300.0);
    assert_eq!(config.total_title, "Total:");
    assert_eq!(config.timing.standard_ms, 1000.0);
    assert_eq!(config.hover_ms, 300.0);
    assert_eq!(config.timing.easing, Easing::CubicInOut);
}

#[test]
fn map_defaults() {
    let config = MapConfig::from_json_str(r#"{"maxZoom": 8}"#).expect("valid config");
    assert_eq!(config.max_zoom, 8.0);
    assert_eq!(config.bubble_radius_range, [8.0, 18.0]);
    assert_eq!(config.projection_center, [0.0, 40.0]);
    assert_eq!(config.projection_scale, 135.0);
    assert_eq!(config.zoom_in_step, 0.2);
    assert_eq!(config.tooltip.offset_x, 5.0);
    assert_eq!(config.tooltip.offset_y, 10.0);
}
