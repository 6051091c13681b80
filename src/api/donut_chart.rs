use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::animation::{
    ArcGeometry, ArcLabelGeometry, Easing, ElementStore, GeometryRules, Interpolate, PlanContext,
    Transition, TransitionPlanner, TransitionSpec,
};
use crate::api::{ChartController, ChartRuntime, DonutConfig, DonutScales, pie_angles};
use crate::core::{Dataset, Item, ItemKey, Viewport, percentage, reconcile};
use crate::error::ChartResult;
use crate::interaction::{TooltipPayload, resolve_style};
use crate::render::{ArcPrimitive, RenderFrame, Renderer, ShapeStyle, TextHAlign, TextPrimitive};

const TOTAL_TITLE_OFFSET: f64 = 12.0;
const TOTAL_VALUE_OFFSET: f64 = 10.0;

/// Where a slice collapses to on exit: the start of the next surviving
/// slice, or its own end angle when none survives after it.
fn exit_arc<K: ItemKey, G>(
    key: &K,
    current: ArcGeometry,
    context: &PlanContext<'_, K, G>,
    arc_of: impl Fn(G) -> ArcGeometry,
) -> ArcGeometry
where
    G: Interpolate,
{
    context.next_remaining_neighbor(key).map_or_else(
        || ArcGeometry::collapsed(current.end_angle),
        |neighbor| ArcGeometry::collapsed(arc_of(neighbor).start_angle),
    )
}

struct SliceRules;

impl<K: ItemKey> GeometryRules<K, ArcGeometry> for SliceRules {
    fn enter_from(
        &self,
        key: &K,
        target: &ArcGeometry,
        context: &PlanContext<'_, K, ArcGeometry>,
    ) -> ArcGeometry {
        // The first render opens every slice from 12 o'clock; later entries
        // open at the start of the next slice already on screen.
        if context.first_render {
            return ArcGeometry::collapsed(0.0);
        }
        context.next_live_neighbor(key).map_or_else(
            || ArcGeometry::collapsed(target.end_angle),
            |neighbor| ArcGeometry::collapsed(neighbor.start_angle),
        )
    }

    fn exit_to(
        &self,
        key: &K,
        current: &ArcGeometry,
        context: &PlanContext<'_, K, ArcGeometry>,
    ) -> ArcGeometry {
        exit_arc(key, *current, context, |arc| arc)
    }
}

/// Labels appear in place once their slice has landed and leave with it.
struct SliceLabelRules;

impl<K: ItemKey> GeometryRules<K, ArcLabelGeometry> for SliceLabelRules {
    fn enter_from(
        &self,
        _key: &K,
        target: &ArcLabelGeometry,
        _context: &PlanContext<'_, K, ArcLabelGeometry>,
    ) -> ArcLabelGeometry {
        ArcLabelGeometry {
            opacity: 0.0,
            ..*target
        }
    }

    fn exit_to(
        &self,
        key: &K,
        current: &ArcLabelGeometry,
        context: &PlanContext<'_, K, ArcLabelGeometry>,
    ) -> ArcLabelGeometry {
        ArcLabelGeometry {
            arc: exit_arc(key, current.arc, context, |label| label.arc),
            value: current.value,
            opacity: 0.0,
        }
    }
}

/// Keyed donut chart; becomes a solid pie while any slice is selected.
#[derive(Debug)]
pub struct DonutChart<K: ItemKey, R: Renderer> {
    renderer: R,
    config: DonutConfig,
    runtime: ChartRuntime<K>,
    data: Dataset<Item<K>>,
    scales: Option<DonutScales>,
    slices: ElementStore<K, ArcGeometry>,
    labels: ElementStore<K, ArcLabelGeometry>,
    slice_planner: TransitionPlanner,
    label_planner: TransitionPlanner,
    /// Hover emphasis per key, 0 resting and 1 enlarged.
    emphasis: IndexMap<K, Transition<f64>>,
    /// Emphasis targets from hover changes, started by the next tick.
    queued_emphasis: Vec<(K, f64, Easing)>,
    total: Option<Transition<f64>>,
    resting_styles: IndexMap<K, ShapeStyle>,
    exit_styles: IndexMap<K, ShapeStyle>,
}

impl<K: ItemKey, R: Renderer> DonutChart<K, R> {
    #[must_use]
    pub fn new(renderer: R, config: DonutConfig) -> Self {
        let runtime = ChartRuntime::new(config.resize_debounce_ms, config.tooltip);
        let (slice_planner, label_planner) = planners(&config);
        Self {
            renderer,
            config,
            runtime,
            data: Dataset::default(),
            scales: None,
            slices: ElementStore::new(),
            labels: ElementStore::new(),
            slice_planner,
            label_planner,
            emphasis: IndexMap::new(),
            queued_emphasis: Vec::new(),
            total: None,
            resting_styles: IndexMap::new(),
            exit_styles: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DonutConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DonutConfig) {
        let (slice_planner, label_planner) = planners(&config);
        self.slice_planner = slice_planner;
        self.label_planner = label_planner;
        self.config = config;
        self.runtime.request_pass();
    }

    pub fn set_data(&mut self, items: Vec<Item<K>>) -> ChartResult<()> {
        self.data = Dataset::new(items)?;
        self.runtime.request_pass();
        Ok(())
    }

    #[must_use]
    pub fn data(&self) -> &Dataset<Item<K>> {
        &self.data
    }

    #[must_use]
    pub fn scales(&self) -> Option<&DonutScales> {
        self.scales.as_ref()
    }

    #[must_use]
    pub fn slices(&self) -> &ElementStore<K, ArcGeometry> {
        &self.slices
    }

    #[must_use]
    pub fn labels(&self) -> &ElementStore<K, ArcLabelGeometry> {
        &self.labels
    }

    /// Hover emphasis of `key` at the runtime clock.
    #[must_use]
    pub fn emphasis(&self, key: &K) -> f64 {
        self.emphasis
            .get(key)
            .map_or(0.0, |transition| transition.sample(self.runtime.now()))
    }

    /// Displayed total, or `None` while a slice is selected or before the
    /// first pass.
    #[must_use]
    pub fn displayed_total(&self) -> Option<f64> {
        if self.data.any_selected() {
            return None;
        }
        self.total
            .map(|total| total.sample(self.runtime.now()).round())
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

    fn start_emphasis(&mut self, key: &K, target: f64, easing: Easing) {
        let now = self.runtime.now();
        let from = self.emphasis(key);
        let spec = TransitionSpec::new(self.config.hover_ms, easing);
        self.emphasis
            .insert(key.clone(), Transition::new(from, target, now, spec));
    }

    fn push_center(&self, frame: &mut RenderFrame, scales: &DonutScales) {
        let Some(total) = self.displayed_total() else {
            return;
        };
        let config = &self.config;
        if !config.total_title.is_empty() {
            frame.texts.push(TextPrimitive::new(
                config.total_title.clone(),
                scales.center_x,
                scales.center_y - TOTAL_TITLE_OFFSET,
                config.total_title_font_size,
                config.text_color,
                TextHAlign::Center,
            ));
        }
        frame.texts.push(TextPrimitive::new(
            format!("{total}"),
            scales.center_x,
            scales.center_y + TOTAL_VALUE_OFFSET,
            config.total_value_font_size,
            config.text_color,
            TextHAlign::Center,
        ));
    }
}

fn planners(config: &DonutConfig) -> (TransitionPlanner, TransitionPlanner) {
    let timing = config.timing;
    let fade = TransitionSpec::new(config.label_fade_ms, timing.easing).with_delay(timing.standard_ms);
    (
        TransitionPlanner::from_timing(timing),
        TransitionPlanner::from_timing(timing).with_enter(fade),
    )
}

fn arc_primitive(
    scales: &DonutScales,
    arc: ArcGeometry,
    emphasis: f64,
    style: ShapeStyle,
) -> ArcPrimitive {
    let (inner_radius, outer_radius) = scales.radii(emphasis);
    ArcPrimitive {
        center_x: scales.center_x,
        center_y: scales.center_y,
        inner_radius,
        outer_radius,
        start_angle: arc.start_angle,
        end_angle: arc.end_angle,
        style,
    }
}

impl<K: ItemKey, R: Renderer> ChartController for DonutChart<K, R> {
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
        let any_selected = self.data.any_selected();
        let scales = DonutScales::compute(container, &self.config, any_selected);
        let total = self.data.total();

        let angles = pie_angles(self.data.records().iter().map(|item| item.value), total);
        let mut slices = IndexMap::with_capacity(angles.len());
        let mut labels = IndexMap::with_capacity(angles.len());
        let mut styles = IndexMap::with_capacity(angles.len());
        for (item, arc) in self.data.records().iter().zip(angles) {
            slices.insert(item.id.clone(), arc);
            labels.insert(
                item.id.clone(),
                ArcLabelGeometry {
                    arc,
                    value: percentage(item.value, total).round(),
                    opacity: 1.0,
                },
            );
            styles.insert(item.id.clone(), resolve_style(item, any_selected, false));
        }

        let reconciliation = match reconcile(self.slices.keys(), slices.keys()) {
            Ok(reconciliation) => reconciliation,
            Err(err) => {
                warn!(error = %err, "donut reconciliation failed, pass skipped");
                return;
            }
        };
        for key in &reconciliation.exiting {
            if let Some(style) = self.resting_styles.get(key) {
                self.exit_styles.insert(key.clone(), *style);
            }
            self.emphasis.shift_remove(key);
        }
        if any_selected {
            self.emphasis.clear();
        }

        let now = self.runtime.now();
        self.slice_planner
            .plan_and_run(&mut self.slices, &reconciliation, &slices, &SliceRules, now);
        self.label_planner
            .plan_and_run(&mut self.labels, &reconciliation, &labels, &SliceLabelRules, now);

        let total_from = self.total.map_or(total, |current| current.sample(now));
        let total_spec = TransitionSpec::new(self.config.timing.standard_ms, self.config.timing.easing);
        self.total = Some(Transition::new(total_from, total, now, total_spec));

        debug!(
            slices = slices.len(),
            total,
            pie_mode = scales.pie_mode,
            "donut pass"
        );
        self.resting_styles = styles;
        self.scales = Some(scales);
        self.refresh_hover();
    }

    fn advance_elements(&mut self, now_ms: f64) -> Vec<K> {
        let disposed = self.slices.advance(now_ms);
        self.labels.advance(now_ms);
        for key in &disposed {
            if !self.slices.exiting().iter().any(|state| state.key() == key) {
                self.exit_styles.shift_remove(key);
            }
        }
        self.emphasis
            .retain(|_, transition| !(transition.is_finished(now_ms) && transition.to() == 0.0));
        disposed
    }

    fn is_animating(&self) -> bool {
        let now = self.runtime.now();
        self.slices.is_animating()
            || self.labels.is_animating()
            || !self.queued_emphasis.is_empty()
            || self
                .emphasis
                .values()
                .any(|transition| !transition.is_finished(now))
            || self.total.is_some_and(|total| !total.is_finished(now))
    }

    fn build_frame(&self) -> Option<RenderFrame> {
        let scales = self.scales.as_ref()?;
        let now = self.runtime.now();
        let any_selected = self.data.any_selected();
        let interaction = self.runtime.interaction();
        let mut frame = RenderFrame::new(Viewport::new(scales.width, scales.height));

        for state in self.slices.exiting() {
            let style = self
                .exit_styles
                .get(state.key())
                .copied()
                .unwrap_or_else(|| ShapeStyle::filled(self.config.text_color));
            frame
                .arcs
                .push(arc_primitive(scales, state.current(now), 0.0, style));
        }
        for state in self.slices.live() {
            let Some(item) = self.data.get(state.key()) else {
                continue;
            };
            let style = resolve_style(item, any_selected, interaction.is_hovered(state.key()));
            frame.arcs.push(arc_primitive(
                scales,
                state.current(now),
                self.emphasis(state.key()),
                style,
            ));
        }

        for state in self.labels.exiting().iter().chain(self.labels.live()) {
            let label = state.current(now);
            let (x, y, align) = scales.label_anchor(&label.arc);
            frame.texts.push(
                TextPrimitive::new(
                    format!("{}%", label.value.round() as i64),
                    x,
                    y,
                    self.config.label_font_size,
                    self.config.text_color,
                    align,
                )
                .with_opacity(label.opacity.clamp(0.0, 1.0)),
            );
        }

        self.push_center(&mut frame, scales);
        Some(frame)
    }

    fn present(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        self.renderer.render(frame)
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<K> {
        let scales = self.scales.as_ref()?;
        let now = self.runtime.now();
        let (angle, distance) = scales.polar(x, y);
        self.slices
            .live()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find(|state| {
                let arc = state.current(now);
                let (inner, outer) = scales.radii(self.emphasis(state.key()));
                distance >= inner
                    && distance <= outer
                    && angle >= arc.start_angle
                    && angle < arc.end_angle
            })
            .map(|state| state.key().clone())
    }

    fn tooltip_for(&self, key: &K) -> Option<TooltipPayload<K>> {
        self.data
            .get(key)
            .map(|item| TooltipPayload::for_item(item, self.data.total()))
    }

    fn start_deferred(&mut self) {
        let any_selected = self.data.any_selected();
        for (key, target, easing) in std::mem::take(&mut self.queued_emphasis) {
            if target > 0.0 && (any_selected || self.data.get(&key).is_none()) {
                continue;
            }
            self.start_emphasis(&key, target, easing);
        }
    }

    fn hover_changed(&mut self, previous: Option<&K>, next: Option<&K>) {
        if let Some(previous) = previous {
            self.queued_emphasis.push((previous.clone(), 0.0, Easing::BackInOut));
        }
        if let Some(next) = next {
            if !self.data.any_selected() {
                self.queued_emphasis.push((next.clone(), 1.0, Easing::CubicInOut));
            }
        }
    }
}
