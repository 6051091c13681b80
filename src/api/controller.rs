use tracing::warn;

use crate::api::ChartRuntime;
use crate::core::{ItemKey, Viewport};
use crate::error::ChartResult;
use crate::interaction::{
    ChartEvent, PageMetrics, PointerPosition, ReactiveCell, Subscription, TooltipPayload,
    TooltipPosition,
};
use crate::render::RenderFrame;

/// Shared lifecycle of the bar, donut and map controllers.
///
/// Implementors supply the chart-specific pieces: laying out and scheduling a
/// pass, advancing their element stores, building a frame, hit testing and
/// tooltip payloads. Everything host-facing (frame ticks, resize handling,
/// pointer input, subscriptions, teardown) is provided here so the three
/// charts behave identically.
pub trait ChartController {
    type Key: ItemKey;

    fn runtime(&self) -> &ChartRuntime<Self::Key>;

    fn runtime_mut(&mut self) -> &mut ChartRuntime<Self::Key>;

    /// Recomputes scales for the current data and container and schedules
    /// transitions at the runtime clock. Run by [`ChartController::tick`]
    /// once a pass was requested and the container is measured.
    fn render_pass(&mut self);

    /// Starts animations that input queued since the last tick.
    fn start_deferred(&mut self) {}

    /// Commits sampled geometry; returns keys whose exit finished.
    fn advance_elements(&mut self, now_ms: f64) -> Vec<Self::Key>;

    fn is_animating(&self) -> bool;

    /// Scene at the runtime clock, or `None` before the first pass.
    fn build_frame(&self) -> Option<RenderFrame>;

    fn present(&mut self, frame: &RenderFrame) -> ChartResult<()>;

    /// Topmost live element under chart-local `(x, y)`.
    fn hit_test(&self, x: f64, y: f64) -> Option<Self::Key>;

    /// Hover payload for a key of the current dataset.
    fn tooltip_for(&self, key: &Self::Key) -> Option<TooltipPayload<Self::Key>>;

    /// Called after the hovered key changed.
    fn hover_changed(&mut self, _previous: Option<&Self::Key>, _next: Option<&Self::Key>) {}

    /// Advances the chart to `now_ms` and draws if anything changed.
    ///
    /// Applies a debounced resize and any requested pass first, so their
    /// transitions start at `now_ms`. Then commits animation progress,
    /// reports finished exits and presents the frame.
    /// Returns whether the host should schedule another tick. Renderer
    /// failures are logged, never propagated.
    fn tick(&mut self, now_ms: f64) -> bool {
        if self.runtime().is_torn_down() {
            return false;
        }
        // Sampled against the previous clock so a tween ending exactly at
        // `now_ms` still gets its final frame.
        let was_animating = self.is_animating();
        let now = self.runtime().advance_clock(now_ms);

        if let Some(size) = self.runtime().poll_resize(now) {
            self.runtime_mut().set_container(size);
            self.runtime_mut().request_pass();
        }
        if self.runtime().render_pending() && self.runtime().container().is_some() {
            self.render_pass();
        }
        self.start_deferred();

        let disposed = self.advance_elements(now);
        if !disposed.is_empty() {
            self.runtime_mut().mark_frame_dirty();
        }
        for key in disposed {
            self.runtime().interaction().emit(ChartEvent::ExitCompleted(key));
        }

        if was_animating || self.runtime().is_frame_dirty() {
            if let Err(err) = self.render() {
                warn!(error = %err, "frame rejected by renderer");
            }
        }
        self.needs_frame()
    }

    /// Builds and presents the frame at the runtime clock.
    fn render(&mut self) -> ChartResult<()> {
        let Some(frame) = self.build_frame() else {
            return Ok(());
        };
        self.present(&frame)?;
        self.runtime_mut().clear_frame_dirty();
        Ok(())
    }

    #[must_use]
    fn needs_frame(&self) -> bool {
        let runtime = self.runtime();
        if runtime.is_torn_down() {
            return false;
        }
        self.is_animating()
            || runtime.resize_pending()
            || runtime.is_frame_dirty()
            || (runtime.render_pending() && runtime.container().is_some())
    }

    fn notify_resize(&mut self, size: Viewport) {
        self.runtime().notify_resize(size);
    }

    /// Follows `source` for container sizes; the current value is applied
    /// without debounce and the next tick runs the first pass.
    fn attach_viewport_source(&mut self, source: &ReactiveCell<Option<Viewport>>) {
        self.runtime_mut().attach_viewport_source(source);
        self.runtime_mut().request_pass();
    }

    fn pointer_enter(&mut self, key: &Self::Key) {
        if self.runtime().is_torn_down() {
            return;
        }
        let Some(payload) = self.tooltip_for(key) else {
            warn!(?key, "pointer enter on unknown key ignored");
            return;
        };
        let previous = self.runtime().interaction().hovered_key().cloned();
        self.runtime_mut().interaction_mut().pointer_enter(payload);
        if previous.as_ref() != Some(key) {
            self.hover_changed(previous.as_ref(), Some(key));
            self.runtime_mut().mark_frame_dirty();
        }
    }

    fn pointer_leave(&mut self) {
        if self.runtime().is_torn_down() {
            return;
        }
        let previous = self.runtime_mut().interaction_mut().pointer_leave();
        if previous.is_some() {
            self.hover_changed(previous.as_ref(), None);
            self.runtime_mut().mark_frame_dirty();
        }
    }

    /// Moves the floating tooltip; `None` after teardown.
    fn pointer_move(&mut self, pointer: PointerPosition) -> Option<TooltipPosition> {
        if self.runtime().is_torn_down() {
            return None;
        }
        Some(self.runtime_mut().interaction_mut().pointer_move(pointer))
    }

    /// Hit-tests chart-local `(x, y)` and enters or leaves accordingly.
    fn pointer_at(&mut self, x: f64, y: f64) -> Option<Self::Key> {
        let hit = self.hit_test(x, y);
        match &hit {
            Some(key) => self.pointer_enter(key),
            None => self.pointer_leave(),
        }
        hit
    }

    fn click(&mut self, key: &Self::Key) {
        if self.runtime().is_torn_down() {
            return;
        }
        if self.tooltip_for(key).is_none() {
            warn!(?key, "click on unknown key ignored");
            return;
        }
        self.runtime().interaction().click(key.clone());
    }

    /// Republishes or clears the hover payload after the dataset changed.
    fn refresh_hover(&mut self) {
        let Some(key) = self.runtime().interaction().hovered_key().cloned() else {
            return;
        };
        match self.tooltip_for(&key) {
            Some(payload) => self.runtime_mut().interaction_mut().refresh(Some(payload)),
            None => self.pointer_leave(),
        }
    }

    fn hovered(&self) -> Option<TooltipPayload<Self::Key>> {
        self.runtime().interaction().hovered_payload()
    }

    fn set_page_metrics(&mut self, page: PageMetrics) {
        self.runtime_mut().interaction_mut().set_page_metrics(page);
    }

    fn set_tooltip_width(&mut self, width: f64) {
        self.runtime_mut().interaction_mut().set_tooltip_width(width);
    }

    fn subscribe_hover(
        &self,
        observer: impl FnMut(&Option<TooltipPayload<Self::Key>>) + 'static,
    ) -> Subscription
    where
        Self: Sized,
    {
        self.runtime().interaction().subscribe_hover(observer)
    }

    fn subscribe_tooltip_position(
        &self,
        observer: impl FnMut(&Option<TooltipPosition>) + 'static,
    ) -> Subscription
    where
        Self: Sized,
    {
        self.runtime().interaction().subscribe_tooltip_position(observer)
    }

    fn subscribe_events(&self, observer: impl FnMut(&ChartEvent<Self::Key>) + 'static) -> Subscription
    where
        Self: Sized,
    {
        self.runtime().interaction().subscribe_events(observer)
    }

    /// Stops all future passes and releases every subscription. Idempotent.
    fn teardown(&mut self) {
        self.runtime_mut().teardown();
    }
}
