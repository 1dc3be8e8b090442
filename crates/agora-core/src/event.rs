#![forbid(unsafe_code)]

//! Canonical viewport events.
//!
//! The host (JS or the `wasm-bindgen` layer) reads the document scroll offset
//! and window dimensions and forwards them as [`Event`] values. Handlers never
//! query the rendering environment for the values an event already carries.

use crate::geometry::Size;

/// Canonical viewport event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The document was scrolled.
    Scroll {
        /// Document scroll offset from the top, in pixels.
        top: f64,
    },

    /// The window was resized.
    Resize {
        /// New inner width in pixels.
        width: f64,
        /// New inner height in pixels.
        height: f64,
    },
}

impl Event {
    /// The listener kind this event is delivered to.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Scroll { .. } => EventKind::Scroll,
            Self::Resize { .. } => EventKind::Resize,
        }
    }

    /// Build a resize event from a [`Size`].
    #[must_use]
    pub const fn resize(size: Size) -> Self {
        Self::Resize {
            width: size.width,
            height: size.height,
        }
    }
}

/// Kind of event a listener is registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Scroll,
    Resize,
}

impl EventKind {
    /// DOM event type name.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::Resize => "resize",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dom_name())
    }
}
