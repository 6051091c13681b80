use crate::core::Item;
use crate::render::{Color, ShapeStyle};

/// Opacity of unselected elements while a selection exists.
pub const FADED_OPACITY: f64 = 0.3;
/// `Color::darker` factor applied to the hovered element.
pub const HOVER_DARKEN: f64 = 0.3;
pub const BORDER_WIDTH: f64 = 2.0;
/// Border used for a selected element that does not carry its own.
pub const SELECTED_BORDER: Color = Color::rgb(0.2, 0.2, 0.2);

/// Resolves fill, opacity and border for one element.
///
/// While any element is selected, hover emphasis is suppressed: the selected
/// element is fully opaque with a border and every other element is faded
/// without one. Otherwise the element keeps its own opacity and border and is
/// darkened while hovered.
#[must_use]
pub fn resolve_style<K>(item: &Item<K>, any_selected: bool, hovered: bool) -> ShapeStyle {
    if any_selected {
        return if item.selected {
            ShapeStyle {
                fill: item.color,
                opacity: 1.0,
                border: Some(item.border_color.unwrap_or(SELECTED_BORDER)),
                border_width: BORDER_WIDTH,
            }
        } else {
            ShapeStyle {
                fill: item.color,
                opacity: FADED_OPACITY,
                border: None,
                border_width: 0.0,
            }
        };
    }

    let fill = if hovered {
        item.color.darker(HOVER_DARKEN)
    } else {
        item.color
    };
    ShapeStyle {
        fill,
        opacity: item.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
        border: item.border_color,
        border_width: if item.border_color.is_some() {
            BORDER_WIDTH
        } else {
            0.0
        },
    }
}
