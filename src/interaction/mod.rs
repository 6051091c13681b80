mod reactive;
mod style;
mod tooltip;

use serde::{Deserialize, Serialize};
use tracing::trace;

pub use reactive::{EventEmitter, ReactiveCell, Subscription};
pub use style::{BORDER_WIDTH, FADED_OPACITY, HOVER_DARKEN, SELECTED_BORDER, resolve_style};
pub use tooltip::{PageMetrics, PointerPosition, TooltipPayload, TooltipPlacement, TooltipPosition};

use crate::core::ItemKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    /// Pointer is over a chart element.
    Hovering,
    /// Pointer is dragging the map view box.
    Panning,
}

/// Events surfaced to the external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartEvent<K> {
    ItemClicked(K),
    /// An exiting element finished collapsing and was discarded.
    ExitCompleted(K),
}

/// Hover, tooltip and click bookkeeping for one chart instance.
///
/// The hover cell replays its latest payload to late subscribers, so a
/// tooltip renderer attached mid-hover still shows the current item.
#[derive(Debug)]
pub struct InteractionTracker<K: ItemKey> {
    mode: InteractionMode,
    hovered_key: Option<K>,
    hovered: ReactiveCell<Option<TooltipPayload<K>>>,
    tooltip_position: ReactiveCell<Option<TooltipPosition>>,
    events: EventEmitter<ChartEvent<K>>,
    placement: TooltipPlacement,
    page: PageMetrics,
    tooltip_width: f64,
}

impl<K: ItemKey> Default for InteractionTracker<K> {
    fn default() -> Self {
        Self::new(TooltipPlacement::default())
    }
}

impl<K: ItemKey> InteractionTracker<K> {
    #[must_use]
    pub fn new(placement: TooltipPlacement) -> Self {
        Self {
            mode: InteractionMode::Idle,
            hovered_key: None,
            hovered: ReactiveCell::new(None),
            tooltip_position: ReactiveCell::new(None),
            events: EventEmitter::new(),
            placement,
            page: PageMetrics::default(),
            tooltip_width: 0.0,
        }
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn hovered_key(&self) -> Option<&K> {
        self.hovered_key.as_ref()
    }

    #[must_use]
    pub fn is_hovered(&self, key: &K) -> bool {
        self.hovered_key.as_ref() == Some(key)
    }

    #[must_use]
    pub fn hovered_payload(&self) -> Option<TooltipPayload<K>> {
        self.hovered.get()
    }

    #[must_use]
    pub fn tooltip_position(&self) -> Option<TooltipPosition> {
        self.tooltip_position.get()
    }

    pub fn subscribe_hover(
        &self,
        observer: impl FnMut(&Option<TooltipPayload<K>>) + 'static,
    ) -> Subscription {
        self.hovered.subscribe(observer)
    }

    pub fn subscribe_tooltip_position(
        &self,
        observer: impl FnMut(&Option<TooltipPosition>) + 'static,
    ) -> Subscription {
        self.tooltip_position.subscribe(observer)
    }

    pub fn subscribe_events(&self, observer: impl FnMut(&ChartEvent<K>) + 'static) -> Subscription {
        self.events.subscribe(observer)
    }

    pub fn set_page_metrics(&mut self, page: PageMetrics) {
        self.page = page;
    }

    /// Measured width of the host's tooltip element, used for edge flipping.
    pub fn set_tooltip_width(&mut self, width: f64) {
        self.tooltip_width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    }

    pub fn pointer_enter(&mut self, payload: TooltipPayload<K>) {
        trace!(key = ?payload.id, "pointer enter");
        self.hovered_key = Some(payload.id.clone());
        self.mode = InteractionMode::Hovering;
        self.hovered.publish(Some(payload));
    }

    /// Clears hover state; returns the key that was hovered.
    pub fn pointer_leave(&mut self) -> Option<K> {
        let previous = self.hovered_key.take();
        if previous.is_some() {
            trace!(key = ?previous, "pointer leave");
            self.hovered.publish(None);
        }
        if self.mode == InteractionMode::Hovering {
            self.mode = InteractionMode::Idle;
        }
        previous
    }

    pub fn pointer_move(&mut self, pointer: PointerPosition) -> TooltipPosition {
        let position = self.placement.place(pointer, self.tooltip_width, self.page);
        self.tooltip_position.publish(Some(position));
        position
    }

    /// Republishes the payload for the hovered key after a data change.
    pub fn refresh(&mut self, payload: Option<TooltipPayload<K>>) {
        match payload {
            Some(payload) if self.is_hovered(&payload.id) => self.hovered.publish(Some(payload)),
            Some(_) => {}
            None => {
                self.pointer_leave();
            }
        }
    }

    pub fn click(&self, id: K) {
        trace!(key = ?id, "item clicked");
        self.events.emit(&ChartEvent::ItemClicked(id));
    }

    pub fn emit(&self, event: ChartEvent<K>) {
        self.events.emit(&event);
    }

    /// Clears hover state and releases every observer.
    pub fn release(&mut self) {
        self.pointer_leave();
        self.tooltip_position.publish(None);
        self.hovered.clear_observers();
        self.tooltip_position.clear_observers();
        self.events.clear();
    }
}
