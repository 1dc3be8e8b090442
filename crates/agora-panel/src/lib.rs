#![forbid(unsafe_code)]

//! Sticky information panel for the proposal page.
//!
//! # Role in agora
//! `agora-panel` decides whether the proposal information panel flows with
//! the document or is pinned below the fixed header, and produces the style
//! the host applies. It reads the rendering environment only through the
//! `agora-core` provider traits.
//!
//! # Primary responsibilities
//! - **PanelPositionState**: pure `Flowing`/`Pinned` transitions.
//! - **StickyPanelController**: mount/unmount lifecycle and listener wiring.
//! - **PanelStyle**: inline style and class marker output.
//! - **StickyConfig**: tunables, loadable from TOML or JSON.

pub mod config;
pub mod error;
pub mod sticky;
pub mod style;

pub use config::StickyConfig;
pub use error::{ConfigError, PanelError};
pub use sticky::{
    PanelGeometry, PanelPhase, PanelPositionState, PinnedStyle, StickyPanelController,
};
pub use style::{PanelStyle, Position};
