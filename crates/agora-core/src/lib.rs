#![forbid(unsafe_code)]

//! Core: geometry, viewport events, and listener lifecycle.
//!
//! # Role in agora
//! `agora-core` is the input layer. It defines the values the host forwards
//! from the browser (scroll offsets, window sizes, bounding rectangles) and
//! the provider traits through which the panel and page logic read them.
//!
//! # Primary responsibilities
//! - **Event**: canonical viewport events (scroll, resize).
//! - **Listener**: RAII handler registration; drop detaches.
//! - **EventBus**: in-memory, host-driven [`provider::ScrollEventSource`].
//! - **Providers**: viewport, header, and panel geometry reads.

pub mod error;
pub mod event;
pub mod geometry;
pub mod listener;
pub mod provider;

pub use error::ListenError;
pub use event::{Event, EventKind};
pub use geometry::{Rect, Size};
pub use listener::{EventBus, Handler, Listener};
pub use provider::{
    HeaderHeightProvider, PanelGeometryProvider, ScrollEventSource, ViewportMetricsProvider,
};
