use std::cell::Cell;

use tracing::trace;

use crate::core::Viewport;

/// Monotonic frame time in milliseconds, advanced only by host ticks.
#[derive(Debug, Default)]
pub struct FrameClock {
    now_ms: Cell<f64>,
}

impl FrameClock {
    #[must_use]
    pub fn new(start_ms: f64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    #[must_use]
    pub fn now(&self) -> f64 {
        self.now_ms.get()
    }

    /// Moves the clock forward; earlier or non-finite timestamps are ignored.
    pub fn advance_to(&self, now_ms: f64) -> f64 {
        if now_ms.is_finite() && now_ms > self.now_ms.get() {
            self.now_ms.set(now_ms);
        }
        self.now_ms.get()
    }
}

/// Collapses bursts of resize notifications into one measurement.
///
/// Sizes pushed without a timestamp start their quiet period at the first
/// poll that sees them, so a resize reported while the host was idle still
/// waits the full interval.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeDebouncer {
    interval_ms: f64,
    pending: Option<(Viewport, Option<f64>)>,
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            pending: None,
        }
    }

    /// Records `size`; its quiet period starts at the next poll.
    pub fn push(&mut self, size: Viewport) {
        trace!(width = size.width, height = size.height, "resize queued");
        self.pending = Some((size, None));
    }

    /// Records `size`, restarting the quiet period at `at_ms`.
    pub fn push_at(&mut self, size: Viewport, at_ms: f64) {
        trace!(width = size.width, height = size.height, at_ms, "resize queued");
        self.pending = Some((size, Some(at_ms)));
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Releases the latest size once no resize arrived for the interval.
    pub fn poll(&mut self, now_ms: f64) -> Option<Viewport> {
        let (size, queued_at) = self.pending?;
        let queued_at = queued_at.unwrap_or(now_ms);
        if now_ms - queued_at >= self.interval_ms {
            self.pending = None;
            return Some(size);
        }
        self.pending = Some((size, Some(queued_at)));
        None
    }

    /// Releases the latest size immediately.
    pub fn flush(&mut self) -> Option<Viewport> {
        self.pending.take().map(|(size, _)| size)
    }
}
