#![forbid(unsafe_code)]

//! Platform-independent proposal page core.
//!
//! The host forwards scroll offsets, window sizes, and element rectangles;
//! the core runs the sticky panel and the results state and hands back JSON
//! for the host to apply. The wasm exports and the native tests share this
//! module. No JS/WASM types here.

use std::cell::Cell;
use std::rc::Rc;

use agora_core::{
    Event, EventBus, HeaderHeightProvider, PanelGeometryProvider, Rect, Size,
    ViewportMetricsProvider,
};
use agora_panel::{PanelError, PanelStyle, StickyConfig, StickyPanelController};
use agora_proposal::{FetchError, InfoProps, InformationPanel, Proposal, VoteResultsState};
use chrono::{FixedOffset, Offset, Utc};
use thiserror::Error;
use tracing::debug;

/// Failures reported back to the host.
#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error(transparent)]
    Config(#[from] agora_panel::ConfigError),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no proposal loaded")]
    NoProposal,
    #[error("UTC offset out of range: {0} minutes")]
    InvalidOffset(i32),
}

/// Geometry the host last reported.
///
/// Rectangles are `None` until set, which the panel treats as "element not
/// attached".
#[derive(Debug, Default)]
pub struct HostGeometry {
    viewport: Cell<Size>,
    header_height: Cell<Option<f64>>,
    panel: Cell<Option<Rect>>,
    parent: Cell<Option<Rect>>,
}

impl HostGeometry {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: Cell::new(viewport),
            ..Self::default()
        }
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.viewport.set(viewport);
    }

    pub fn set_header_height(&self, height: Option<f64>) {
        self.header_height.set(height);
    }

    pub fn set_panel_rect(&self, rect: Option<Rect>) {
        self.panel.set(rect);
    }

    pub fn set_parent_rect(&self, rect: Option<Rect>) {
        self.parent.set(rect);
    }
}

impl ViewportMetricsProvider for HostGeometry {
    fn viewport(&self) -> Size {
        self.viewport.get()
    }
}

impl HeaderHeightProvider for HostGeometry {
    fn header_height(&self) -> Option<f64> {
        self.header_height.get()
    }
}

impl PanelGeometryProvider for HostGeometry {
    fn panel_rect(&self) -> Option<Rect> {
        self.panel.get()
    }

    fn parent_rect(&self) -> Option<Rect> {
        self.parent.get()
    }
}

/// Proposal page state driven entirely by host calls.
pub struct ProposalPageCore {
    bus: EventBus,
    geometry: Rc<HostGeometry>,
    panel: StickyPanelController<HostGeometry>,
    results: VoteResultsState,
    info: Option<InfoProps>,
    offset: FixedOffset,
}

impl ProposalPageCore {
    #[must_use]
    pub fn new(viewport: Size, config: StickyConfig) -> Self {
        let geometry = Rc::new(HostGeometry::new(viewport));
        Self {
            bus: EventBus::new(),
            panel: StickyPanelController::new(Rc::clone(&geometry), config),
            geometry,
            results: VoteResultsState::Loading,
            info: None,
            offset: Utc.fix(),
        }
    }

    /// Build with a [`StickyConfig`] given as JSON.
    pub fn with_config_json(viewport: Size, config_json: &str) -> Result<Self, WebError> {
        let config = StickyConfig::from_json_str(config_json)?;
        Ok(Self::new(viewport, config))
    }

    pub fn mount(&mut self) -> Result<(), WebError> {
        let geometry = Rc::clone(&self.geometry);
        self.panel.on_mount(geometry, &*self.geometry, &self.bus)?;
        Ok(())
    }

    pub fn unmount(&mut self) -> Result<(), WebError> {
        self.panel.on_unmount()?;
        Ok(())
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.panel.is_mounted()
    }

    /// Forward a document scroll. Returns whether the panel style changed.
    pub fn scroll(&mut self, top: f64) -> bool {
        self.dispatch(&Event::Scroll { top })
    }

    /// Forward a window resize. Returns whether the panel style changed.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        let size = Size::new(width, height);
        self.geometry.set_viewport(size);
        self.dispatch(&Event::resize(size))
    }

    fn dispatch(&mut self, event: &Event) -> bool {
        let before = self.panel.style();
        let handled = self.bus.dispatch(event);
        let after = self.panel.style();
        if handled == 0 {
            debug!(kind = %event.kind(), "event with no listeners");
        }
        before != after
    }

    pub fn set_panel_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.geometry.set_panel_rect(Some(Rect::new(x, y, width, height)));
    }

    pub fn set_parent_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.geometry.set_parent_rect(Some(Rect::new(x, y, width, height)));
    }

    /// Forget the panel and parent rectangles (element detached).
    pub fn clear_geometry(&mut self) {
        self.geometry.set_panel_rect(None);
        self.geometry.set_parent_rect(None);
    }

    /// Report the header height. While mounted it is only picked up again
    /// through [`Self::remeasure_header`] or, when configured, on resize.
    pub fn set_header_height(&mut self, height: Option<f64>) {
        self.geometry.set_header_height(height);
    }

    pub fn remeasure_header(&mut self) -> Option<f64> {
        self.panel.remeasure_header()
    }

    /// Feed the vote results response body.
    pub fn set_results_json(&mut self, body: &str) {
        self.results = VoteResultsState::from_response_json(body);
    }

    /// Record that the results request failed.
    pub fn set_results_failed(&mut self, message: &str) {
        self.results = VoteResultsState::Failed(FetchError::fetch_failed(message));
    }

    #[must_use]
    pub fn results(&self) -> &VoteResultsState {
        &self.results
    }

    /// Load the proposal shown in the information panel.
    pub fn set_proposal_json(
        &mut self,
        proposal_json: &str,
        is_core_creator: bool,
        ipfs_gateway: &str,
    ) -> Result<(), WebError> {
        let proposal = Proposal::from_json(proposal_json)?;
        self.info = Some(InfoProps::from_proposal(&proposal, is_core_creator, ipfs_gateway));
        Ok(())
    }

    /// Viewer's UTC offset for date display, in minutes east of UTC.
    pub fn set_utc_offset_minutes(&mut self, minutes: i32) -> Result<(), WebError> {
        self.offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(WebError::InvalidOffset(minutes))?;
        Ok(())
    }

    #[must_use]
    pub fn style(&self) -> PanelStyle {
        self.panel.style()
    }

    /// Panel style as JSON; `{}` while the panel flows.
    pub fn style_json(&self) -> Result<String, WebError> {
        Ok(serde_json::to_string(&self.panel.style())?)
    }

    pub fn info_panel(&self) -> Result<InformationPanel, WebError> {
        let props = self.info.as_ref().ok_or(WebError::NoProposal)?;
        Ok(InformationPanel::build(props, &self.results, self.offset))
    }

    pub fn info_json(&self) -> Result<String, WebError> {
        Ok(serde_json::to_string(&self.info_panel()?)?)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }
}

impl std::fmt::Debug for ProposalPageCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProposalPageCore")
            .field("panel", &self.panel)
            .field("results", &self.results)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}
