//! Layout math turning a dataset and a container size into target geometry.

use std::f64::consts::{PI, TAU};

use crate::animation::{ArcGeometry, CircleGeometry, LabelGeometry, RectGeometry};
use crate::api::{BarConfig, DonutConfig, MapConfig};
use crate::core::{
    BandPadding, BandScale, Dataset, GroupedDataset, Item, ItemKey, LinearScale, MapCountry,
    MercatorProjection, SqrtScale, Ticks, Viewport, nice_ticks, percentage,
};
use crate::error::ChartResult;
use crate::render::TextHAlign;

/// Scales for one bar chart pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BarScales {
    /// Requested width capped to the container.
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub categories: BandScale,
    /// Inner band over series names; `None` for the single-series variant.
    pub series: Option<BandScale>,
    pub column_width: f64,
    /// Percentage → pixel-y, larger values higher up.
    pub magnitude: LinearScale,
    pub column_layer_height: f64,
    pub max_percentage: f64,
    pub tick_count: usize,
    gap: f64,
}

impl BarScales {
    pub fn compute<K: ItemKey>(
        data: &GroupedDataset<K>,
        container: Viewport,
        config: &BarConfig,
    ) -> ChartResult<Self> {
        let width = config.width.min(container.width).max(0.0);
        let plot_width = (width - config.margin_left).max(0.0);

        let categories = BandScale::new(
            data.categories(),
            (0.0, plot_width),
            BandPadding::new(config.category_padding_inner, config.category_padding_outer),
        )?;
        let series = if data.is_grouped() {
            Some(BandScale::new(
                data.series().iter().map(|series| series.name.as_str()),
                (0.0, categories.bandwidth()),
                BandPadding::new(config.series_padding_inner, 0.0),
            )?)
        } else {
            None
        };
        let column_width = match &series {
            Some(series) => series.bandwidth(),
            // An empty inner band keeps a single step spanning the whole category.
            None => categories.bandwidth() * (1.0 - config.series_padding_inner),
        };

        let column_layer_height = config.height - (config.label_top_padding + config.axis_font_size);
        let max_percentage = data.max_percentage();
        let tick = config.tick_y_percentage;
        let magnitude = LinearScale::new(
            (0.0, max_percentage + tick / 2.0),
            (
                column_layer_height,
                config.gap_between_column_and_count + config.count_rect_height,
            ),
        )?;
        let tick_count = if tick.is_finite() && tick > 0.0 {
            (max_percentage / tick).floor() as usize
        } else {
            0
        };

        Ok(Self {
            width,
            height: config.height,
            margin_left: config.margin_left,
            categories,
            series,
            column_width,
            magnitude,
            column_layer_height,
            max_percentage,
            tick_count,
            gap: config.gap_between_column_and_count,
        })
    }

    /// Pixel-y of a zero-height column.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.magnitude.map(0.0)
    }

    /// Left edge of the column for `category` in `series_name`.
    #[must_use]
    pub fn column_x(&self, category: &str, series_name: &str) -> Option<f64> {
        let outer = self.categories.position(category)?;
        let inner = match &self.series {
            Some(series) => series.position(series_name)?,
            None => 0.0,
        };
        Some(outer + inner)
    }

    #[must_use]
    pub fn column<K>(&self, item: &Item<K>, series_name: &str, series_total: f64) -> Option<RectGeometry> {
        let x = self.column_x(&item.label, series_name)?;
        let y = self.magnitude.map(percentage(item.value, series_total));
        Some(RectGeometry {
            x,
            y,
            width: self.column_width,
            height: (self.baseline() - y).max(0.0),
        })
    }

    /// Count label centred above `column`.
    #[must_use]
    pub fn count_label(&self, column: &RectGeometry, value: f64) -> LabelGeometry {
        LabelGeometry {
            x: column.x + column.width / 2.0,
            y: column.y - self.gap,
            value,
            opacity: 1.0,
            exact: true,
        }
    }

    /// Percentage tick values for the magnitude axis.
    #[must_use]
    pub fn ticks(&self) -> Ticks {
        let (_, domain_end) = self.magnitude.domain();
        nice_ticks(0.0, domain_end, self.tick_count)
    }
}

/// Radii and centre for one donut pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonutScales {
    pub width: f64,
    pub height: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    /// Solid pie while any slice is selected.
    pub pie_mode: bool,
}

impl DonutScales {
    #[must_use]
    pub fn compute(container: Viewport, config: &DonutConfig, any_selected: bool) -> Self {
        let width = config.width.min(container.width).max(0.0);
        let height = config.height.max(0.0);
        Self {
            width,
            height,
            center_x: width / 2.0,
            center_y: height / 2.0,
            radius: width.min(height) / 2.0,
            pie_mode: any_selected,
        }
    }

    /// `(inner, outer)` radii at hover `emphasis` (0 = resting, 1 = enlarged).
    #[must_use]
    pub fn radii(&self, emphasis: f64) -> (f64, f64) {
        let r = self.radius;
        if self.pie_mode {
            return (0.0, 0.65 * r);
        }
        let inner = 0.4 * r + (0.39 * r - 0.4 * r) * emphasis;
        let outer = 0.65 * r + (0.66 * r - 0.65 * r) * emphasis;
        (inner.max(0.0), outer.max(inner.max(0.0)))
    }

    /// Label point for `arc`: the label-arc centroid pushed outwards by 1.3,
    /// anchored at its start on the right half and at its end on the left.
    #[must_use]
    pub fn label_anchor(&self, arc: &ArcGeometry) -> (f64, f64, TextHAlign) {
        let r = self.radius;
        let centroid_radius = (0.4 * r + 0.7 * r) / 2.0 * 1.3;
        let angle = arc.mid_angle();
        let x = self.center_x + angle.sin() * centroid_radius;
        let y = self.center_y - angle.cos() * centroid_radius;
        let align = if angle < PI {
            TextHAlign::Left
        } else {
            TextHAlign::Right
        };
        (x, y, align)
    }

    /// Clockwise angle from 12 o'clock and distance of `(x, y)` from the centre.
    #[must_use]
    pub fn polar(&self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        let angle = dx.atan2(-dy).rem_euclid(TAU);
        (angle, dx.hypot(dy))
    }
}

/// Pie layout: consecutive slices in input order, starting at 12 o'clock.
///
/// An empty total lays every slice out as a zero wedge at 0.
#[must_use]
pub fn pie_angles(values: impl IntoIterator<Item = f64>, total: f64) -> Vec<ArcGeometry> {
    let k = if total > 0.0 { TAU / total } else { 0.0 };
    let mut start = 0.0;
    values
        .into_iter()
        .map(|value| {
            let end = start + value * k;
            let arc = ArcGeometry::new(start, end);
            start = end;
            arc
        })
        .collect()
}

/// Projection and bubble radius scale for one map pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapScales {
    pub projection: MercatorProjection,
    pub radius: Option<SqrtScale>,
    pub label_offset_y: f64,
}

impl MapScales {
    pub fn compute<K: ItemKey>(
        data: &Dataset<MapCountry<K>>,
        projection: MercatorProjection,
        config: &MapConfig,
    ) -> ChartResult<Self> {
        let radius = match data.value_extent() {
            Some(extent) => Some(SqrtScale::new(
                extent,
                (config.bubble_radius_range[0], config.bubble_radius_range[1]),
            )?),
            None => None,
        };
        Ok(Self {
            projection,
            radius,
            label_offset_y: config.label_offset_y,
        })
    }

    #[must_use]
    pub fn bubble<K>(&self, country: &MapCountry<K>) -> CircleGeometry {
        let (center_x, center_y) = self.projection.project(country.longitude, country.latitude);
        CircleGeometry {
            center_x,
            center_y,
            radius: self.radius.map_or(0.0, |scale| scale.map(country.item.value)),
        }
    }

    #[must_use]
    pub fn value_label(&self, bubble: &CircleGeometry, value: f64) -> LabelGeometry {
        LabelGeometry {
            x: bubble.center_x,
            y: bubble.center_y + self.label_offset_y,
            value,
            opacity: 1.0,
            exact: true,
        }
    }
}
