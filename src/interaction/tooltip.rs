use serde::{Deserialize, Serialize};

use crate::core::{Item, percentage, round1};

/// Derived hover payload handed to external tooltip renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipPayload<K> {
    pub id: K,
    /// Category or country name, when the chart has one.
    pub label: Option<String>,
    pub value: f64,
    /// `100 × value / total`, rounded to one decimal; `0` for an empty total.
    pub percentage: f64,
    pub total: f64,
}

impl<K: Clone> TooltipPayload<K> {
    /// Builds the payload against `relevant_total`: the dataset total for
    /// simple charts, the owning series total for grouped bars.
    #[must_use]
    pub fn for_item(item: &Item<K>, relevant_total: f64) -> Self {
        Self {
            id: item.id.clone(),
            label: (!item.label.is_empty()).then(|| item.label.clone()),
            value: item.value,
            percentage: round1(percentage(item.value, relevant_total)),
            total: relevant_total,
        }
    }
}

/// Pointer position in viewport (client) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Host page metrics needed to keep the tooltip on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMetrics {
    pub inner_width: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            inner_width: f64::INFINITY,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

/// Page-space top-left corner of the floating tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPosition {
    pub left: f64,
    pub top: f64,
}

/// Offsets of the floating tooltip from the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TooltipPlacement {
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for TooltipPlacement {
    fn default() -> Self {
        Self {
            offset_x: 20.0,
            offset_y: 25.0,
        }
    }
}

impl TooltipPlacement {
    /// Places the tooltip right of the pointer, flipping to the left side when
    /// it would overflow the right edge of the page.
    #[must_use]
    pub fn place(
        &self,
        pointer: PointerPosition,
        tooltip_width: f64,
        page: PageMetrics,
    ) -> TooltipPosition {
        let right_side = pointer.x + page.scroll_x + self.offset_x;
        let left = if right_side + tooltip_width > page.inner_width {
            pointer.x - tooltip_width - self.offset_x + page.scroll_x
        } else {
            right_side
        };
        TooltipPosition {
            left,
            top: pointer.y + page.scroll_y + self.offset_y,
        }
    }
}
