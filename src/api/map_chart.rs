use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::animation::{
    CircleGeometry, ElementStore, GeometryRules, LabelGeometry, PlanContext, TransitionPlanner,
};
use crate::api::{ChartController, ChartRuntime, MapConfig, MapScales, MapViewBox};
use crate::core::{Dataset, ItemKey, MapCountry, MercatorProjection, Viewport, reconcile};
use crate::error::ChartResult;
use crate::interaction::{InteractionMode, PointerPosition, TooltipPayload, resolve_style};
use crate::render::{CirclePrimitive, RenderFrame, Renderer, ShapeStyle, TextHAlign, TextPrimitive};

/// Bubbles grow from and shrink to their centre.
struct BubbleRules;

impl<K: ItemKey> GeometryRules<K, CircleGeometry> for BubbleRules {
    fn enter_from(
        &self,
        _key: &K,
        target: &CircleGeometry,
        _context: &PlanContext<'_, K, CircleGeometry>,
    ) -> CircleGeometry {
        CircleGeometry {
            radius: 0.0,
            ..*target
        }
    }

    fn exit_to(
        &self,
        _key: &K,
        current: &CircleGeometry,
        _context: &PlanContext<'_, K, CircleGeometry>,
    ) -> CircleGeometry {
        CircleGeometry {
            radius: 0.0,
            ..*current
        }
    }
}

struct BubbleLabelRules;

impl<K: ItemKey> GeometryRules<K, LabelGeometry> for BubbleLabelRules {
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
}

/// Keyed bubble map with pan and zoom.
///
/// The projection is fixed at construction from the configured size;
/// resizes only change the client area the view box is fitted into.
#[derive(Debug)]
pub struct MapChart<K: ItemKey, R: Renderer> {
    renderer: R,
    config: MapConfig,
    runtime: ChartRuntime<K>,
    data: Dataset<MapCountry<K>>,
    projection: MercatorProjection,
    scales: Option<MapScales>,
    client: Option<Viewport>,
    view_box: MapViewBox,
    bubbles: ElementStore<K, CircleGeometry>,
    labels: ElementStore<K, LabelGeometry>,
    planner: TransitionPlanner,
    resting_styles: IndexMap<K, ShapeStyle>,
    exit_styles: IndexMap<K, ShapeStyle>,
}

impl<K: ItemKey, R: Renderer> MapChart<K, R> {
    #[must_use]
    pub fn new(renderer: R, config: MapConfig) -> Self {
        let runtime = ChartRuntime::new(config.resize_debounce_ms, config.tooltip);
        let projection = MercatorProjection::new(
            config.projection_center,
            config.projection_scale,
            [config.width * 0.5, config.height * 0.5],
        );
        let view_box = MapViewBox::new(config.width, config.height, config.min_zoom, config.max_zoom);
        let planner = TransitionPlanner::from_timing(config.timing);
        Self {
            renderer,
            config,
            runtime,
            data: Dataset::default(),
            projection,
            scales: None,
            client: None,
            view_box,
            bubbles: ElementStore::new(),
            labels: ElementStore::new(),
            planner,
            resting_styles: IndexMap::new(),
            exit_styles: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Replaces styling and timing. The projection keeps its initial setup.
    pub fn set_config(&mut self, config: MapConfig) {
        self.planner = TransitionPlanner::from_timing(config.timing);
        self.config = config;
        self.runtime.request_pass();
    }

    pub fn set_data(&mut self, countries: Vec<MapCountry<K>>) -> ChartResult<()> {
        self.data = Dataset::new(countries)?;
        self.runtime.request_pass();
        Ok(())
    }

    #[must_use]
    pub fn data(&self) -> &Dataset<MapCountry<K>> {
        &self.data
    }

    #[must_use]
    pub fn projection(&self) -> MercatorProjection {
        self.projection
    }

    #[must_use]
    pub fn scales(&self) -> Option<&MapScales> {
        self.scales.as_ref()
    }

    #[must_use]
    pub fn bubbles(&self) -> &ElementStore<K, CircleGeometry> {
        &self.bubbles
    }

    #[must_use]
    pub fn labels(&self) -> &ElementStore<K, LabelGeometry> {
        &self.labels
    }

    #[must_use]
    pub fn view_box(&self) -> &MapViewBox {
        &self.view_box
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

    /// Wheel zoom around `offset` inside the client area.
    pub fn wheel(&mut self, delta_y: f64, offset: PointerPosition) {
        let Some(client) = self.live_client() else {
            return;
        };
        if self
            .view_box
            .wheel(delta_y, offset, client, self.config.wheel_zoom_step)
        {
            self.runtime.mark_frame_dirty();
        }
    }

    pub fn pan_start(&mut self, pointer: PointerPosition) {
        if self.runtime.is_torn_down() {
            return;
        }
        self.view_box.pan_start(pointer);
        self.runtime.interaction_mut().set_mode(InteractionMode::Panning);
    }

    pub fn pan_move(&mut self, pointer: PointerPosition) {
        if self.view_box.pan_move(pointer) {
            self.runtime.mark_frame_dirty();
        }
    }

    pub fn pan_end(&mut self, pointer: PointerPosition) {
        if self.view_box.pan_end(pointer) {
            self.runtime.interaction_mut().set_mode(InteractionMode::Idle);
            self.runtime.mark_frame_dirty();
        }
    }

    /// Pointer left the map: a drag in progress is abandoned.
    pub fn pan_cancel(&mut self) {
        if self.view_box.is_panning() {
            self.view_box.pan_cancel();
            self.runtime.interaction_mut().set_mode(InteractionMode::Idle);
            self.runtime.mark_frame_dirty();
        }
    }

    pub fn zoom_in(&mut self) {
        let Some(client) = self.live_client() else {
            return;
        };
        if self.view_box.zoom_in(client, self.config.zoom_in_step) {
            self.runtime.mark_frame_dirty();
        }
    }

    pub fn zoom_out(&mut self) {
        let Some(client) = self.live_client() else {
            return;
        };
        if self.view_box.zoom_out(client, self.config.zoom_in_step) {
            self.runtime.mark_frame_dirty();
        }
    }

    /// Resets pan and zoom to the whole map.
    pub fn home(&mut self) {
        let Some(client) = self.live_client() else {
            return;
        };
        self.view_box.home(client);
        self.runtime.mark_frame_dirty();
    }

    fn live_client(&self) -> Option<Viewport> {
        if self.runtime.is_torn_down() {
            return None;
        }
        self.client
    }

    fn circle(&self, bubble: CircleGeometry, client: Viewport, style: ShapeStyle) -> CirclePrimitive {
        let (center_x, center_y) = self.view_box.to_client(bubble.center_x, bubble.center_y, client);
        CirclePrimitive {
            center_x,
            center_y,
            radius: (bubble.radius * self.view_box.zoom_factor(client)).max(0.0),
            style,
        }
    }

    fn bubble_style(&self, country: &MapCountry<K>, any_selected: bool, hovered: bool) -> ShapeStyle {
        let mut style = resolve_style(&country.item, any_selected, hovered);
        if !any_selected && style.border.is_none() {
            style.border = Some(self.config.bubble_stroke);
            style.border_width = self.config.bubble_stroke_width;
        }
        style
    }
}

impl<K: ItemKey, R: Renderer> ChartController for MapChart<K, R> {
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
        let scales = match MapScales::compute(&self.data, self.projection, &self.config) {
            Ok(scales) => scales,
            Err(err) => {
                warn!(error = %err, "map layout failed, pass skipped");
                return;
            }
        };

        let any_selected = self.data.any_selected();
        let mut bubbles = IndexMap::with_capacity(self.data.len());
        let mut labels = IndexMap::with_capacity(self.data.len());
        let mut styles = IndexMap::with_capacity(self.data.len());
        for country in self.data.records() {
            let bubble = scales.bubble(country);
            labels.insert(
                country.item.id.clone(),
                scales.value_label(&bubble, country.item.value),
            );
            bubbles.insert(country.item.id.clone(), bubble);
            styles.insert(
                country.item.id.clone(),
                self.bubble_style(country, any_selected, false),
            );
        }

        let reconciliation = match reconcile(self.bubbles.keys(), bubbles.keys()) {
            Ok(reconciliation) => reconciliation,
            Err(err) => {
                warn!(error = %err, "map reconciliation failed, pass skipped");
                return;
            }
        };
        for key in &reconciliation.exiting {
            if let Some(style) = self.resting_styles.get(key) {
                self.exit_styles.insert(key.clone(), *style);
            }
        }

        let now = self.runtime.now();
        self.planner
            .plan_and_run(&mut self.bubbles, &reconciliation, &bubbles, &BubbleRules, now);
        self.planner
            .plan_and_run(&mut self.labels, &reconciliation, &labels, &BubbleLabelRules, now);

        let client = Viewport::new(
            self.config.width.min(container.width),
            self.config.height,
        );
        debug!(
            bubbles = bubbles.len(),
            width = client.width,
            height = client.height,
            "map pass"
        );
        self.client = client.is_valid().then_some(client);
        self.resting_styles = styles;
        self.scales = Some(scales);
        self.refresh_hover();
    }

    fn advance_elements(&mut self, now_ms: f64) -> Vec<K> {
        let disposed = self.bubbles.advance(now_ms);
        self.labels.advance(now_ms);
        for key in &disposed {
            if !self.bubbles.exiting().iter().any(|state| state.key() == key) {
                self.exit_styles.shift_remove(key);
            }
        }
        disposed
    }

    fn is_animating(&self) -> bool {
        self.bubbles.is_animating() || self.labels.is_animating()
    }

    fn build_frame(&self) -> Option<RenderFrame> {
        self.scales.as_ref()?;
        let client = self.client?;
        let now = self.runtime.now();
        let any_selected = self.data.any_selected();
        let interaction = self.runtime.interaction();
        let mut frame = RenderFrame::new(client);

        for state in self.bubbles.exiting() {
            let style = self
                .exit_styles
                .get(state.key())
                .copied()
                .unwrap_or_else(|| ShapeStyle::filled(self.config.bubble_stroke));
            frame.circles.push(self.circle(state.current(now), client, style));
        }
        for state in self.bubbles.live() {
            let Some(country) = self.data.get(state.key()) else {
                continue;
            };
            let style = self.bubble_style(country, any_selected, interaction.is_hovered(state.key()));
            frame.circles.push(self.circle(state.current(now), client, style));
        }

        for state in self.labels.exiting().iter().chain(self.labels.live()) {
            let label = state.current(now);
            let (x, y) = self.view_box.to_client(label.x, label.y, client);
            frame.texts.push(
                TextPrimitive::new(
                    label.text(),
                    x,
                    y,
                    self.config.label_font_size,
                    self.config.text_color,
                    TextHAlign::Center,
                )
                .with_opacity(label.opacity.clamp(0.0, 1.0)),
            );
        }
        Some(frame)
    }

    fn present(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        self.renderer.render(frame)
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<K> {
        let client = self.client?;
        let now = self.runtime.now();
        let (map_x, map_y) = self.view_box.to_map(x, y, client);
        self.bubbles
            .live()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .find(|state| state.current(now).contains(map_x, map_y))
            .map(|state| state.key().clone())
    }

    fn tooltip_for(&self, key: &K) -> Option<TooltipPayload<K>> {
        self.data
            .get(key)
            .map(|country| TooltipPayload::for_item(&country.item, self.data.total()))
    }
}
