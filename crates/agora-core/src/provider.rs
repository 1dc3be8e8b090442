#![forbid(unsafe_code)]

//! Read-only seams onto the rendering environment.
//!
//! The panel state machine never touches `window` or `document` directly.
//! Each query goes through one of these traits so the same logic runs
//! against real DOM reads on `wasm32` and against plain values in tests.
//!
//! Geometry reads return `Option`: `None` means the element is not attached
//! (a null element reference), and callers treat that as "nothing to do".

use crate::error::ListenError;
use crate::event::EventKind;
use crate::geometry::{Rect, Size};
use crate::listener::{Handler, Listener};

/// Current inner dimensions of the window.
pub trait ViewportMetricsProvider {
    fn viewport(&self) -> Size;
}

/// Height of the fixed page header.
pub trait HeaderHeightProvider {
    fn header_height(&self) -> Option<f64>;
}

/// Bounding rectangles of the panel and the container it lives in.
pub trait PanelGeometryProvider {
    /// The panel's own bounding rectangle, relative to the viewport.
    fn panel_rect(&self) -> Option<Rect>;

    /// The parent container's bounding rectangle. Its width is the width a
    /// pinned panel takes.
    fn parent_rect(&self) -> Option<Rect>;
}

/// Registers handlers for scroll and resize events.
///
/// The returned [`Listener`] detaches the handler when dropped. A source
/// that cannot attach returns [`ListenError`] and keeps nothing registered.
pub trait ScrollEventSource {
    fn listen(&self, kind: EventKind, handler: Handler) -> Result<Listener, ListenError>;
}

impl<T: ViewportMetricsProvider + ?Sized> ViewportMetricsProvider for &T {
    fn viewport(&self) -> Size {
        (**self).viewport()
    }
}

impl<T: HeaderHeightProvider + ?Sized> HeaderHeightProvider for &T {
    fn header_height(&self) -> Option<f64> {
        (**self).header_height()
    }
}

impl<T: PanelGeometryProvider + ?Sized> PanelGeometryProvider for &T {
    fn panel_rect(&self) -> Option<Rect> {
        (**self).panel_rect()
    }

    fn parent_rect(&self) -> Option<Rect> {
        (**self).parent_rect()
    }
}
