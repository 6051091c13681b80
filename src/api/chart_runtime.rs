use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::animation::{FrameClock, ResizeDebouncer};
use crate::core::{ItemKey, Viewport};
use crate::interaction::{InteractionTracker, ReactiveCell, Subscription, TooltipPlacement};

/// Lifecycle state shared by every chart controller.
///
/// Owns the frame clock, the debounced container size, the pending-pass
/// flag and the interaction tracker. The clock only moves on host ticks, so
/// passes and resizes are queued here and carried out by the next tick. After [`ChartRuntime::teardown`] no
/// further pass may run and every resize notification is ignored.
#[derive(Debug)]
pub struct ChartRuntime<K: ItemKey> {
    clock: FrameClock,
    container: Option<Viewport>,
    resize: Rc<RefCell<ResizeDebouncer>>,
    resize_subscription: Option<Subscription>,
    render_pending: bool,
    frame_dirty: bool,
    torn_down: bool,
    interaction: InteractionTracker<K>,
}

impl<K: ItemKey> ChartRuntime<K> {
    #[must_use]
    pub fn new(resize_debounce_ms: f64, placement: TooltipPlacement) -> Self {
        Self {
            clock: FrameClock::default(),
            container: None,
            resize: Rc::new(RefCell::new(ResizeDebouncer::new(resize_debounce_ms))),
            resize_subscription: None,
            render_pending: false,
            frame_dirty: false,
            torn_down: false,
            interaction: InteractionTracker::new(placement),
        }
    }

    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn advance_clock(&self, now_ms: f64) -> f64 {
        self.clock.advance_to(now_ms)
    }

    /// Measured container size; `None` until a valid measurement arrived.
    #[must_use]
    pub fn container(&self) -> Option<Viewport> {
        self.container
    }

    /// Applies a size immediately. Invalid sizes mark the container unmeasured.
    pub fn set_container(&mut self, size: Viewport) {
        self.container = size.is_valid().then_some(size);
        trace!(
            width = size.width,
            height = size.height,
            measured = self.container.is_some(),
            "container size applied"
        );
    }

    /// Queues a size behind the debounce interval, measured from the next tick.
    pub fn notify_resize(&self, size: Viewport) {
        if self.torn_down {
            return;
        }
        self.resize.borrow_mut().push(size);
    }

    /// Follows `source` for container sizes until teardown.
    ///
    /// The value current at attach time is applied without waiting for the
    /// debounce interval; later publishes are debounced.
    pub fn attach_viewport_source(&mut self, source: &ReactiveCell<Option<Viewport>>) {
        if self.torn_down {
            return;
        }
        let debouncer = Rc::clone(&self.resize);
        let subscription = source.subscribe(move |size| {
            if let Some(size) = size {
                debouncer.borrow_mut().push(*size);
            }
        });
        self.resize_subscription = Some(subscription);

        let initial = self.resize.borrow_mut().flush();
        if let Some(size) = initial {
            self.set_container(size);
        }
    }

    /// Releases the debounced size once the quiet period elapsed.
    pub fn poll_resize(&self, now_ms: f64) -> Option<Viewport> {
        if self.torn_down {
            return None;
        }
        self.resize.borrow_mut().poll(now_ms)
    }

    #[must_use]
    pub fn resize_pending(&self) -> bool {
        !self.torn_down && self.resize.borrow().is_pending()
    }

    /// Asks the next tick to run a pass at its own timestamp.
    pub fn request_pass(&mut self) {
        if self.torn_down {
            return;
        }
        self.render_pending = true;
        trace!("pass requested");
    }

    /// Container to lay out against, or `None` when the pass must wait.
    ///
    /// A pass that finds no measurement stays pending until a tick has a
    /// container.
    pub fn begin_pass(&mut self) -> Option<Viewport> {
        if self.torn_down {
            return None;
        }
        match self.container {
            Some(container) => {
                self.render_pending = false;
                self.frame_dirty = true;
                Some(container)
            }
            None => {
                debug!("container not measured yet, render deferred");
                self.render_pending = true;
                None
            }
        }
    }

    #[must_use]
    pub fn render_pending(&self) -> bool {
        self.render_pending && !self.torn_down
    }

    #[must_use]
    pub fn is_frame_dirty(&self) -> bool {
        self.frame_dirty
    }

    pub fn mark_frame_dirty(&mut self) {
        if !self.torn_down {
            self.frame_dirty = true;
        }
    }

    pub fn clear_frame_dirty(&mut self) {
        self.frame_dirty = false;
    }

    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionTracker<K> {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut InteractionTracker<K> {
        &mut self.interaction
    }

    /// Releases the resize subscription and every observer. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.render_pending = false;
        self.frame_dirty = false;
        if let Some(subscription) = self.resize_subscription.take() {
            subscription.unsubscribe();
        }
        self.resize.borrow_mut().flush();
        self.interaction.release();
        debug!("chart torn down");
    }
}
