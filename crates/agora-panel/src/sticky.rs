#![forbid(unsafe_code)]

//! Scroll-driven pinning of the proposal information panel.
//!
//! The panel sits in normal document flow until the user scrolls it up to
//! the fixed header. From then on it is pinned (fixed position) directly
//! below the header, with the width of its parent container, until the user
//! scrolls back above the offset at which pinning engaged.
//!
//! # Design
//!
//! - [`PanelPositionState`] is a plain `Copy` value. Every transition is a
//!   pure method that consumes the current state plus the geometry read for
//!   this event and returns the next state.
//! - [`PanelPhase`] makes the two states explicit. The scroll offset to
//!   return to only exists inside `Pinned`, so it is set exactly on
//!   `Flowing -> Pinned` and gone exactly on `Pinned -> Flowing`.
//! - [`StickyPanelController`] owns the shared state and the listener
//!   guards for one mount. Scroll and resize handlers run the same pure
//!   transitions as the public [`StickyPanelController::on_scroll`] and
//!   [`StickyPanelController::on_resize`].
//!
//! # Invariants
//!
//! 1. `Pinned` is only entered when `viewport.height > header_height + panel.height`.
//! 2. Resizing never changes the phase; it only re-sizes a pinned panel.
//! 3. A missing element (geometry `None`) makes scroll and resize no-ops
//!    for the phase.
//! 4. Listeners added at mount are exactly the listeners removed at unmount.

use std::cell::RefCell;
use std::rc::Rc;

use agora_core::{
    Event, EventKind, HeaderHeightProvider, Listener, PanelGeometryProvider, Rect,
    ScrollEventSource, Size, ViewportMetricsProvider,
};
use tracing::{debug, trace};

use crate::config::StickyConfig;
use crate::error::PanelError;
use crate::style::PanelStyle;

/// Geometry read for one scroll event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelGeometry {
    /// The panel's rectangle, relative to the viewport.
    pub panel: Rect,
    /// The parent container's rectangle.
    pub parent: Rect,
}

impl PanelGeometry {
    /// Read both rectangles; `None` if either element is missing.
    pub fn read<G: PanelGeometryProvider + ?Sized>(provider: &G) -> Option<Self> {
        Some(Self {
            panel: provider.panel_rect()?,
            parent: provider.parent_rect()?,
        })
    }
}

/// Geometry of a pinned panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinnedStyle {
    /// Width taken from the parent container.
    pub width: f64,
    /// Distance from the top of the viewport; the header height.
    pub top: f64,
    /// Viewport width `width` was measured for.
    pub viewport_width: f64,
}

/// The two states of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanelPhase {
    /// Normal document flow.
    #[default]
    Flowing,
    /// Fixed below the header.
    Pinned {
        /// Scrolling above this offset un-pins the panel.
        return_scroll_top: f64,
        style: PinnedStyle,
    },
}

/// Everything the panel remembers between events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelPositionState {
    /// Last observed document scroll offset.
    pub scroll_top: f64,
    /// Height of the fixed header, measured at mount.
    pub header_height: f64,
    /// Window inner dimensions.
    pub viewport: Size,
    pub phase: PanelPhase,
}

impl PanelPositionState {
    /// Fresh state for a newly mounted panel.
    #[must_use]
    pub fn mounted(header_height: f64, viewport: Size) -> Self {
        Self {
            header_height,
            viewport,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_pinned(&self) -> bool {
        matches!(self.phase, PanelPhase::Pinned { .. })
    }

    /// Pinned geometry, or `None` while flowing.
    #[must_use]
    pub fn pinned(&self) -> Option<PinnedStyle> {
        match self.phase {
            PanelPhase::Pinned { style, .. } => Some(style),
            PanelPhase::Flowing => None,
        }
    }

    /// Scroll offset at which pinning engaged, or `None` while flowing.
    #[must_use]
    pub fn return_scroll_top(&self) -> Option<f64> {
        match self.phase {
            PanelPhase::Pinned {
                return_scroll_top, ..
            } => Some(return_scroll_top),
            PanelPhase::Flowing => None,
        }
    }

    /// Whether a panel of `panel_height` fits between header and viewport bottom.
    #[must_use]
    pub fn has_room_for(&self, panel_height: f64) -> bool {
        self.viewport.height > self.header_height + panel_height
    }

    /// Apply a scroll to `scroll_top`.
    ///
    /// While flowing, pins when there is room and the panel top is within
    /// the anticipation margin of the header. While pinned, un-pins when the
    /// document is scrolled above the offset pinning engaged at.
    #[must_use]
    pub fn scrolled(
        self,
        scroll_top: f64,
        geometry: Option<PanelGeometry>,
        config: &StickyConfig,
    ) -> Self {
        let mut next = Self { scroll_top, ..self };
        let Some(geometry) = geometry else {
            return next;
        };

        match self.phase {
            PanelPhase::Flowing => {
                let threshold = self.header_height + config.anticipation_margin;
                if self.has_room_for(geometry.panel.height) && geometry.panel.top() < threshold {
                    next.phase = PanelPhase::Pinned {
                        return_scroll_top: scroll_top,
                        style: PinnedStyle {
                            width: geometry.parent.width,
                            top: self.header_height,
                            viewport_width: self.viewport.width,
                        },
                    };
                }
            }
            PanelPhase::Pinned {
                return_scroll_top, ..
            } => {
                if return_scroll_top > scroll_top {
                    next.phase = PanelPhase::Flowing;
                }
            }
        }
        next
    }

    /// Apply a viewport resize.
    ///
    /// A pinned panel takes the parent's current width when the viewport
    /// width changed since it was last sized. The phase never changes.
    #[must_use]
    pub fn resized(self, viewport: Size, parent: Option<Rect>) -> Self {
        let mut next = Self { viewport, ..self };
        if let PanelPhase::Pinned {
            return_scroll_top,
            style,
        } = self.phase
        {
            if style.viewport_width != viewport.width {
                if let Some(parent) = parent {
                    next.phase = PanelPhase::Pinned {
                        return_scroll_top,
                        style: PinnedStyle {
                            width: parent.width,
                            viewport_width: viewport.width,
                            ..style
                        },
                    };
                }
            }
        }
        next
    }

    /// Replace the header height; a pinned panel follows the new edge.
    #[must_use]
    pub fn with_header_height(self, header_height: f64) -> Self {
        let phase = match self.phase {
            PanelPhase::Pinned {
                return_scroll_top,
                style,
            } => PanelPhase::Pinned {
                return_scroll_top,
                style: PinnedStyle {
                    top: header_height,
                    ..style
                },
            },
            PanelPhase::Flowing => PanelPhase::Flowing,
        };
        Self {
            header_height,
            phase,
            ..self
        }
    }

    /// Style to apply; empty while flowing.
    #[must_use]
    pub fn style(&self, config: &StickyConfig) -> PanelStyle {
        match self.pinned() {
            Some(pinned) => PanelStyle::fixed(pinned.width, pinned.top, &config.fixed_class),
            None => PanelStyle::default(),
        }
    }
}

fn apply_scroll<G: PanelGeometryProvider + ?Sized>(
    state: &RefCell<PanelPositionState>,
    geometry: &G,
    config: &StickyConfig,
    scroll_top: f64,
) {
    let current = *state.borrow();
    let next = current.scrolled(scroll_top, PanelGeometry::read(geometry), config);
    match (current.is_pinned(), next.is_pinned()) {
        (false, true) => debug!(
            scroll_top,
            width = next.pinned().map(|p| p.width),
            top = next.header_height,
            "panel pinned"
        ),
        (true, false) => debug!(scroll_top, "panel unpinned"),
        _ => {}
    }
    *state.borrow_mut() = next;
}

fn apply_resize<G: PanelGeometryProvider + ?Sized>(
    state: &RefCell<PanelPositionState>,
    geometry: &G,
    header: Option<&dyn HeaderHeightProvider>,
    config: &StickyConfig,
    viewport: Size,
) {
    let mut current = *state.borrow();
    if config.remeasure_header_on_resize {
        if let Some(height) = header.and_then(|h| h.header_height()) {
            current = current.with_header_height(height);
        }
    }
    let next = current.resized(viewport, geometry.parent_rect());
    if current.pinned() != next.pinned() {
        trace!(
            width = next.pinned().map(|p| p.width),
            viewport_width = viewport.width,
            "pinned panel resized"
        );
    }
    *state.borrow_mut() = next;
}

/// Controller for one panel instance.
///
/// ```ignore
/// let mut panel = StickyPanelController::new(Rc::new(dom), StickyConfig::default());
/// panel.on_mount(Rc::new(header), &window, &events)?;
/// // ... events flow ...
/// let css = panel.style().to_css();
/// panel.on_unmount()?;
/// ```
pub struct StickyPanelController<G> {
    state: Rc<RefCell<PanelPositionState>>,
    geometry: Rc<G>,
    config: Rc<StickyConfig>,
    header: Option<Rc<dyn HeaderHeightProvider>>,
    listeners: Vec<Listener>,
}

impl<G: PanelGeometryProvider + 'static> StickyPanelController<G> {
    #[must_use]
    pub fn new(geometry: Rc<G>, config: StickyConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(PanelPositionState::default())),
            geometry,
            config: Rc::new(config),
            header: None,
            listeners: Vec::new(),
        }
    }

    /// Measure the header, read the viewport, and attach one scroll and one
    /// resize listener to `source`.
    pub fn on_mount<H, V, S>(
        &mut self,
        header: Rc<H>,
        viewport: &V,
        source: &S,
    ) -> Result<(), PanelError>
    where
        H: HeaderHeightProvider + 'static,
        V: ViewportMetricsProvider + ?Sized,
        S: ScrollEventSource + ?Sized,
    {
        if self.is_mounted() {
            return Err(PanelError::AlreadyMounted);
        }

        let header_height = header.header_height().unwrap_or_default();
        let size = viewport.viewport();
        let header: Rc<dyn HeaderHeightProvider> = header;

        // Both listeners attach before any state is committed; if the second
        // fails, the first guard drops on return.
        let scroll = {
            let state = Rc::clone(&self.state);
            let geometry = Rc::clone(&self.geometry);
            let config = Rc::clone(&self.config);
            source.listen(
                EventKind::Scroll,
                Box::new(move |event| {
                    if let Event::Scroll { top } = *event {
                        apply_scroll(&state, &*geometry, &config, top);
                    }
                }),
            )?
        };
        let resize = {
            let state = Rc::clone(&self.state);
            let geometry = Rc::clone(&self.geometry);
            let config = Rc::clone(&self.config);
            let header = Rc::clone(&header);
            source.listen(
                EventKind::Resize,
                Box::new(move |event| {
                    if let Event::Resize { width, height } = *event {
                        apply_resize(
                            &state,
                            &*geometry,
                            Some(&*header),
                            &config,
                            Size::new(width, height),
                        );
                    }
                }),
            )?
        };

        *self.state.borrow_mut() = PanelPositionState::mounted(header_height, size);
        self.header = Some(header);
        self.listeners = vec![scroll, resize];

        debug!(
            header_height,
            viewport_width = size.width,
            viewport_height = size.height,
            "panel mounted"
        );
        Ok(())
    }

    /// Detach the listeners added by [`Self::on_mount`] and reset state.
    pub fn on_unmount(&mut self) -> Result<(), PanelError> {
        if !self.is_mounted() {
            return Err(PanelError::NotMounted);
        }
        let released = self.listeners.len();
        self.listeners.clear();
        self.header = None;
        *self.state.borrow_mut() = PanelPositionState::default();
        debug!(released, "panel unmounted");
        Ok(())
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Apply a scroll directly, bypassing the event source.
    pub fn on_scroll(&mut self, scroll_top: f64) {
        apply_scroll(&self.state, &*self.geometry, &self.config, scroll_top);
    }

    /// Apply a resize directly, bypassing the event source.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        apply_resize(
            &self.state,
            &*self.geometry,
            self.header.as_deref(),
            &self.config,
            Size::new(width, height),
        );
    }

    /// Measure the header again. Returns the new height, or `None` when
    /// unmounted or the header is missing (state unchanged).
    pub fn remeasure_header(&mut self) -> Option<f64> {
        let height = self.header.as_ref()?.header_height()?;
        let next = self.state.borrow().with_header_height(height);
        *self.state.borrow_mut() = next;
        Some(height)
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> PanelPositionState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn config(&self) -> &StickyConfig {
        &self.config
    }

    /// Style for the panel root; empty while flowing.
    #[must_use]
    pub fn style(&self) -> PanelStyle {
        self.state.borrow().style(&self.config)
    }
}

impl<G> std::fmt::Debug for StickyPanelController<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StickyPanelController")
            .field("state", &*self.state.borrow())
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
