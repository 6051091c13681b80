use std::f64::consts::FRAC_PI_2;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::animation::{
    ElementStore, GeometryRules, LabelGeometry, PlanContext, RectGeometry, TransitionPlanner,
    TransitionSpec,
};
use crate::api::{BarConfig, BarScales, ChartController, ChartRuntime};
use crate::core::{BarSeries, GroupedDataset, Item, ItemKey, Viewport, reconcile};
use crate::error::ChartResult;
use crate::interaction::{TooltipPayload, resolve_style};
use crate::render::{
    LinePrimitive, RectPrimitive, RenderFrame, Renderer, ShapeStyle, TextHAlign, TextPrimitive,
};

const TICK_LABEL_GAP: f64 = 6.0;
const X_LABEL_SHIFT: f64 = 0.1;

/// Columns grow out of and collapse into the baseline.
struct ColumnRules {
    baseline: f64,
}

impl<K: ItemKey> GeometryRules<K, RectGeometry> for ColumnRules {
    fn enter_from(
        &self,
        _key: &K,
        target: &RectGeometry,
        _context: &PlanContext<'_, K, RectGeometry>,
    ) -> RectGeometry {
        RectGeometry {
            y: self.baseline,
            height: 0.0,
            ..*target
        }
    }

    fn exit_to(
        &self,
        _key: &K,
        current: &RectGeometry,
        _context: &PlanContext<'_, K, RectGeometry>,
    ) -> RectGeometry {
        RectGeometry {
            y: self.baseline,
            height: 0.0,
            ..*current
        }
    }
}

/// Count labels fade in place.
struct CountRules;

impl<K: ItemKey> GeometryRules<K, LabelGeometry> for CountRules {
    fn enter_from(
        &self,
        _key: &K,
        target: &LabelGeometry,
        _context: &PlanContext<'_, K, LabelGeometry>,
    ) -> LabelGeometry {
        LabelGeometry {
            opacity: 0.0,
            ..*target
        }
    }

    fn exit_to(
        &self,
        _key: &K,
        current: &LabelGeometry,
        _context: &PlanContext<'_, K, LabelGeometry>,
    ) -> LabelGeometry {
        LabelGeometry {
            opacity: 0.0,
            ..*current
        }
    }

    /// A count shows its raw value until it first tweens to a new one.
    fn update_to(
        &self,
        _key: &K,
        current: &LabelGeometry,
        target: &LabelGeometry,
    ) -> LabelGeometry {
        LabelGeometry {
            exact: current.exact && current.value == target.value,
            ..*target
        }
    }
}

/// Keyed bar chart, simple or grouped by series.
///
/// Heights are percentages of the owning series total. Axes are redrawn
/// from the current scales on every frame and are not animated.
#[derive(Debug)]
pub struct BarChart<K: ItemKey, R: Renderer> {
    renderer: R,
    config: BarConfig,
    runtime: ChartRuntime<K>,
    data: GroupedDataset<K>,
    scales: Option<BarScales>,
    columns: ElementStore<K, RectGeometry>,
    counts: ElementStore<K, LabelGeometry>,
    column_planner: TransitionPlanner,
    count_planner: TransitionPlanner,
    resting_styles: IndexMap<K, ShapeStyle>,
    exit_styles: IndexMap<K, ShapeStyle>,
}

impl<K: ItemKey, R: Renderer> BarChart<K, R> {
    #[must_use]
    pub fn new(renderer: R, config: BarConfig) -> Self {
        let runtime = ChartRuntime::new(config.resize_debounce_ms, config.tooltip);
        let (column_planner, count_planner) = planners(&config);
        Self {
            renderer,
            config,
            runtime,
            data: GroupedDataset::default(),
            scales: None,
            columns: ElementStore::new(),
            counts: ElementStore::new(),
            column_planner,
            count_planner,
            resting_styles: IndexMap::new(),
            exit_styles: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &BarConfig {
        &self.config
    }

    /// Replaces layout and timing; takes effect with a new pass.
    ///
    /// Debounce interval and tooltip offsets are fixed at construction.
    pub fn set_config(&mut self, config: BarConfig) {
        let (column_planner, count_planner) = planners(&config);
        self.column_planner = column_planner;
        self.count_planner = count_planner;
        self.config = config;
        self.runtime.request_pass();
    }

    /// Replaces the dataset with a single unnamed series.
    pub fn set_data(&mut self, bars: Vec<Item<K>>) -> ChartResult<()> {
        self.data = GroupedDataset::single(bars)?;
        self.runtime.request_pass();
        Ok(())
    }

    /// Replaces the dataset with grouped series.
    pub fn set_series(&mut self, series: Vec<BarSeries<K>>) -> ChartResult<()> {
        self.data = GroupedDataset::new(series)?;
        self.runtime.request_pass();
        Ok(())
    }

    #[must_use]
    pub fn data(&self) -> &GroupedDataset<K> {
        &self.data
    }

    #[must_use]
    pub fn scales(&self) -> Option<&BarScales> {
        self.scales.as_ref()
    }

    #[must_use]
    pub fn columns(&self) -> &ElementStore<K, RectGeometry> {
        &self.columns
    }

    #[must_use]
    pub fn counts(&self) -> &ElementStore<K, LabelGeometry> {
        &self.counts
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn push_axes(&self, frame: &mut RenderFrame, scales: &BarScales) {
        let config = &self.config;
        let left = scales.margin_left;
        let baseline = scales.column_layer_height;
        let (_, top) = scales.magnitude.range();

        frame.lines.push(LinePrimitive::new(
            left,
            baseline,
            scales.width.max(left),
            baseline,
            1.0,
            config.axis_color,
        ));
        frame.lines.push(LinePrimitive::new(
            left,
            top,
            left,
            baseline,
            1.0,
            config.axis_color,
        ));

        let bandwidth = scales.categories.bandwidth();
        for (category, position) in scales.categories.bands() {
            if category.is_empty() {
                continue;
            }
            frame.texts.push(TextPrimitive::new(
                category,
                left + position + bandwidth / 2.0 - X_LABEL_SHIFT * bandwidth,
                baseline + config.label_top_padding,
                config.axis_font_size,
                config.text_color,
                TextHAlign::Center,
            ));
        }

        for tick in scales.ticks() {
            frame.texts.push(TextPrimitive::new(
                format!("{tick}%"),
                left - TICK_LABEL_GAP,
                scales.magnitude.map(tick),
                config.axis_font_size,
                config.text_color,
                TextHAlign::Right,
            ));
        }

        if !config.y_axis_name.is_empty() {
            frame.texts.push(
                TextPrimitive::new(
                    config.y_axis_name.clone(),
                    config.axis_font_size,
                    baseline / 2.0,
                    config.axis_font_size,
                    config.text_color,
                    TextHAlign::Center,
                )
                .with_rotation(-FRAC_PI_2),
            );
        }
    }
}

fn planners(config: &BarConfig) -> (TransitionPlanner, TransitionPlanner) {
    let timing = config.timing;
    let fade = TransitionSpec::new(config.count_fade_ms, timing.easing).with_delay(timing.standard_ms);
    (
        TransitionPlanner::from_timing(timing),
        TransitionPlanner::from_timing(timing).with_enter(fade),
    )
}

fn rect(geometry: RectGeometry, offset_x: f64, style: ShapeStyle) -> RectPrimitive {
    RectPrimitive {
        x: geometry.x + offset_x,
        y: geometry.y,
        width: geometry.width.max(0.0),
        height: geometry.height.max(0.0),
        style,
    }
}

fn count_text(geometry: LabelGeometry, offset_x: f64, config: &BarConfig) -> TextPrimitive {
    TextPrimitive::new(
        geometry.text(),
        geometry.x + offset_x,
        geometry.y,
        config.axis_font_size,
        config.text_color,
        TextHAlign::Center,
    )
    .with_opacity(geometry.opacity.clamp(0.0, 1.0))
}

impl<K: ItemKey, R: Renderer> ChartController for BarChart<K, R> {
    type Key = K;

    fn runtime(&self) -> &ChartRuntime<K> {
        &self.runtime
    }

    fn runtime_mut(&mut self) -> &mut ChartRuntime<K> {
        &mut self.runtime
    }

    fn render_pass(&mut self) {
        let Some(container) = self.runtime.begin_pass() else {
            return;
        };
        let scales = match BarScales::compute(&self.data, container, &self.config) {
            Ok(scales) => scales,
            Err(err) => {
                warn!(error = %err, "bar layout failed, pass skipped");
                return;
            }
        };

        let any_selected = self.data.any_selected();
        let mut columns = IndexMap::new();
        let mut counts = IndexMap::new();
        let mut styles = IndexMap::new();
        for series in self.data.series() {
            let total = series.data.total();
            for item in series.data.records() {
                let Some(column) = scales.column(item, &series.name, total) else {
                    warn!(key = ?item.id, "bar category missing from band scale");
                    continue;
                };
                counts.insert(item.id.clone(), scales.count_label(&column, item.value));
                columns.insert(item.id.clone(), column);
                styles.insert(item.id.clone(), resolve_style(item, any_selected, false));
            }
        }

        let reconciliation = match reconcile(self.columns.keys(), columns.keys()) {
            Ok(reconciliation) => reconciliation,
            Err(err) => {
                warn!(error = %err, "bar reconciliation failed, pass skipped");
                return;
            }
        };
        for key in &reconciliation.exiting {
            if let Some(style) = self.resting_styles.get(key) {
                self.exit_styles.insert(key.clone(), *style);
            }
        }

        let now = self.runtime.now();
        let rules = ColumnRules {
            baseline: scales.baseline(),
        };
        self.column_planner
            .plan_and_run(&mut self.columns, &reconciliation, &columns, &rules, now);
        self.count_planner
            .plan_and_run(&mut self.counts, &reconciliation, &counts, &CountRules, now);

        debug!(
            width = scales.width,
            max_percentage = scales.max_percentage,
            columns = columns.len(),
            grouped = self.data.is_grouped(),
            "bar pass"
        );
        self.resting_styles = styles;
        self.scales = Some(scales);
        self.refresh_hover();
    }

    fn advance_elements(&mut self, now_ms: f64) -> Vec<K> {
        let disposed = self.columns.advance(now_ms);
        self.counts.advance(now_ms);
        for key in &disposed {
            if !self.columns.exiting().iter().any(|state| state.key() == key) {
                self.exit_styles.shift_remove(key);
            }
        }
        disposed
    }

    fn is_animating(&self) -> bool {
        self.columns.is_animating() || self.counts.is_animating()
    }

    fn build_frame(&self) -> Option<RenderFrame> {
        let scales = self.scales.as_ref()?;
        let now = self.runtime.now();
        let left = scales.margin_left;
        let any_selected = self.data.any_selected();
        let interaction = self.runtime.interaction();
        let mut frame = RenderFrame::new(Viewport::new(scales.width, scales.height));

        for state in self.columns.exiting() {
            let style = self
                .exit_styles
                .get(state.key())
                .copied()
                .unwrap_or_else(|| ShapeStyle::filled(self.config.axis_color));
            frame.rects.push(rect(state.current(now), left, style));
        }
        for state in self.columns.live() {
            let Some((item, _)) = self.data.find(state.key()) else {
                continue;
            };
            let style = resolve_style(item, any_selected, interaction.is_hovered(state.key()));
            frame.rects.push(rect(state.current(now), left, style));
        }

        self.push_axes(&mut frame, scales);

        for state in self.counts.exiting().iter().chain(self.counts.live()) {
            frame
                .texts
                .push(count_text(state.current(now), left, &self.config));
        }
        Some(frame)
    }

    fn present(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        self.renderer.render(frame)
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<K> {
        let scales = self.scales.as_ref()?;
        let now = self.runtime.now();
        let local_x = x - scales.margin_left;
        self.columns
            .live()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find(|state| state.current(now).contains(local_x, y))
            .map(|state| state.key().clone())
    }

    fn tooltip_for(&self, key: &K) -> Option<TooltipPayload<K>> {
        self.data
            .find(key)
            .map(|(item, series_total)| TooltipPayload::for_item(item, series_total))
    }
}
