use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Viewport;
use crate::interaction::PointerPosition;

/// Visible window of the map in projected pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBoxRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Pan and zoom state of the bubble map.
///
/// Zoom is expressed as `client width / view box width` and clamped to
/// `[min_scale, max_scale]`. While a drag is in progress the visible window
/// is previewed and only committed when the drag ends; leaving the map
/// cancels the drag.
#[derive(Debug, Clone, PartialEq)]
pub struct MapViewBox {
    committed: ViewBoxRect,
    preview: Option<ViewBoxRect>,
    drag_start: Option<PointerPosition>,
    scale: f64,
    min_scale: f64,
    max_scale: f64,
}

impl MapViewBox {
    #[must_use]
    pub fn new(width: f64, height: f64, min_scale: f64, max_scale: f64) -> Self {
        let min_scale = if min_scale.is_finite() && min_scale > 0.0 {
            min_scale
        } else {
            1.0
        };
        Self {
            committed: ViewBoxRect {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            preview: None,
            drag_start: None,
            scale: min_scale,
            min_scale,
            max_scale: max_scale.max(min_scale),
        }
    }

    /// Window currently drawn, including an uncommitted drag.
    #[must_use]
    pub fn visible(&self) -> ViewBoxRect {
        self.preview.unwrap_or(self.committed)
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Zooms by `step` of the window per notch around the pointer.
    ///
    /// A positive `delta_y` shrinks the window (zooms in). `offset` is the
    /// pointer position inside the client area. Returns whether the window
    /// changed.
    pub fn wheel(&mut self, delta_y: f64, offset: PointerPosition, client: Viewport, step: f64) -> bool {
        if delta_y == 0.0 || !delta_y.is_finite() || !client.is_valid() {
            return false;
        }
        let view = self.committed;
        let direction = delta_y.signum();
        let mut dw = view.width * direction * step;
        let mut dh = view.height * direction * step;

        let requested = client.width / (view.width - dw);
        let scale = requested.clamp(self.min_scale, self.max_scale);
        if scale == self.scale || !scale.is_finite() {
            return false;
        }
        if scale != requested {
            let width = client.width / scale;
            dh = view.height * (view.width - width) / view.width;
            dw = view.width - width;
        }

        let dx = dw * offset.x / client.width;
        let dy = dh * offset.y / client.height;
        self.scale = scale;
        self.committed = ViewBoxRect {
            x: view.x + dx,
            y: view.y + dy,
            width: view.width - dw,
            height: view.height - dh,
        };
        trace!(scale, "map wheel zoom");
        true
    }

    pub fn pan_start(&mut self, pointer: PointerPosition) {
        self.drag_start = Some(pointer);
        self.preview = None;
    }

    /// Previews the drag; no effect when no drag is in progress.
    pub fn pan_move(&mut self, pointer: PointerPosition) -> bool {
        let Some(start) = self.drag_start else {
            return false;
        };
        self.preview = Some(self.panned(start, pointer));
        true
    }

    /// Commits the drag.
    pub fn pan_end(&mut self, pointer: PointerPosition) -> bool {
        let Some(start) = self.drag_start.take() else {
            return false;
        };
        self.committed = self.panned(start, pointer);
        self.preview = None;
        true
    }

    /// Abandons the drag and restores the committed window.
    pub fn pan_cancel(&mut self) {
        self.drag_start = None;
        self.preview = None;
    }

    /// Zooms in by `step` of the window, keeping its top-left corner.
    pub fn zoom_in(&mut self, client: Viewport, step: f64) -> bool {
        self.zoom_by(client, step)
    }

    /// Inverse of [`Self::zoom_in`].
    pub fn zoom_out(&mut self, client: Viewport, step: f64) -> bool {
        self.zoom_by(client, -step)
    }

    /// Back to the full client area at minimum zoom.
    pub fn home(&mut self, client: Viewport) {
        self.pan_cancel();
        self.scale = self.min_scale;
        self.committed = ViewBoxRect {
            x: 0.0,
            y: 0.0,
            width: client.width,
            height: client.height,
        };
    }

    /// Projected map point → client point, fitting the window into `client`
    /// with a uniform scale and centring the leftover space.
    #[must_use]
    pub fn to_client(&self, x: f64, y: f64, client: Viewport) -> (f64, f64) {
        let (factor, offset_x, offset_y) = self.fit(client);
        let view = self.visible();
        (
            (x - view.x) * factor + offset_x,
            (y - view.y) * factor + offset_y,
        )
    }

    /// Client point → projected map point.
    #[must_use]
    pub fn to_map(&self, x: f64, y: f64, client: Viewport) -> (f64, f64) {
        let (factor, offset_x, offset_y) = self.fit(client);
        let view = self.visible();
        if factor == 0.0 {
            return (view.x, view.y);
        }
        (
            (x - offset_x) / factor + view.x,
            (y - offset_y) / factor + view.y,
        )
    }

    /// Client pixels per map pixel.
    #[must_use]
    pub fn zoom_factor(&self, client: Viewport) -> f64 {
        self.fit(client).0
    }

    fn fit(&self, client: Viewport) -> (f64, f64, f64) {
        let view = self.visible();
        if view.width <= 0.0 || view.height <= 0.0 || !client.is_valid() {
            return (0.0, 0.0, 0.0);
        }
        let factor = (client.width / view.width).min(client.height / view.height);
        (
            factor,
            (client.width - view.width * factor) / 2.0,
            (client.height - view.height * factor) / 2.0,
        )
    }

    fn panned(&self, start: PointerPosition, end: PointerPosition) -> ViewBoxRect {
        let dx = (start.x - end.x) / self.scale;
        let dy = (start.y - end.y) / self.scale;
        ViewBoxRect {
            x: self.committed.x + dx,
            y: self.committed.y + dy,
            ..self.committed
        }
    }

    fn zoom_by(&mut self, client: Viewport, step: f64) -> bool {
        if !client.is_valid() || !step.is_finite() {
            return false;
        }
        let view = self.committed;
        let dw = view.width * step;
        let dh = view.height * step;
        let scale = client.width / (view.width - dw);
        if !scale.is_finite() || scale < self.min_scale || scale > self.max_scale {
            return false;
        }
        self.scale = scale;
        self.committed = ViewBoxRect {
            width: view.width - dw,
            height: view.height - dh,
            ..view
        };
        trace!(scale, "map zoom");
        true
    }
}
