#![forbid(unsafe_code)]

//! `wasm-bindgen` exports.
//!
//! [`ProposalPageRunner`] wraps [`super::runner_core::ProposalPageCore`] for
//! hosts that forward events themselves. [`ProposalPanel`] binds a sticky
//! panel directly to the page: `scroll` on `document`, `resize` on `window`,
//! geometry from `getBoundingClientRect`, and the style written back to the
//! panel element. Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::{Rc, Weak};

use agora_core::{
    Event, EventKind, HeaderHeightProvider, Handler, ListenError, Listener, PanelGeometryProvider,
    Rect, ScrollEventSource, Size, ViewportMetricsProvider,
};
use agora_panel::{PanelStyle, StickyConfig, StickyPanelController};
use js_sys::Reflect;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{CssStyleDeclaration, Document, EventTarget, HtmlElement, Window};

use super::router::Route;
use super::runner_core::ProposalPageCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_config(config_json: Option<String>) -> Result<StickyConfig, JsValue> {
    match config_json {
        Some(json) => StickyConfig::from_json_str(&json).map_err(to_js),
        None => Ok(StickyConfig::default()),
    }
}

fn window_size(window: &Window) -> Size {
    let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or_default();
    Size::new(read(window.inner_width()), read(window.inner_height()))
}

fn dom_rect(element: &web_sys::Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect::new(r.x(), r.y(), r.width(), r.height())
}

// ---------------------------------------------------------------------------
// Host-driven runner
// ---------------------------------------------------------------------------

/// Proposal page driven by host calls.
#[wasm_bindgen]
pub struct ProposalPageRunner {
    inner: ProposalPageCore,
}

#[wasm_bindgen]
impl ProposalPageRunner {
    /// Create a runner for a `width` x `height` viewport. `config_json`
    /// overrides the sticky panel defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        width: f64,
        height: f64,
        config_json: Option<String>,
    ) -> Result<ProposalPageRunner, JsValue> {
        install_panic_hook();
        let config = parse_config(config_json)?;
        Ok(Self {
            inner: ProposalPageCore::new(Size::new(width, height), config),
        })
    }

    pub fn mount(&mut self) -> Result<(), JsValue> {
        self.inner.mount().map_err(to_js)
    }

    pub fn unmount(&mut self) -> Result<(), JsValue> {
        self.inner.unmount().map_err(to_js)
    }

    /// Returns `true` when the panel style changed.
    pub fn scroll(&mut self, top: f64) -> bool {
        self.inner.scroll(top)
    }

    /// Returns `true` when the panel style changed.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.inner.resize(width, height)
    }

    #[wasm_bindgen(js_name = setPanelRect)]
    pub fn set_panel_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.inner.set_panel_rect(x, y, width, height);
    }

    #[wasm_bindgen(js_name = setParentRect)]
    pub fn set_parent_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.inner.set_parent_rect(x, y, width, height);
    }

    #[wasm_bindgen(js_name = clearGeometry)]
    pub fn clear_geometry(&mut self) {
        self.inner.clear_geometry();
    }

    #[wasm_bindgen(js_name = setHeaderHeight)]
    pub fn set_header_height(&mut self, height: Option<f64>) {
        self.inner.set_header_height(height);
    }

    #[wasm_bindgen(js_name = remeasureHeader)]
    pub fn remeasure_header(&mut self) -> Option<f64> {
        self.inner.remeasure_header()
    }

    #[wasm_bindgen(js_name = setResultsJson)]
    pub fn set_results_json(&mut self, body: &str) {
        self.inner.set_results_json(body);
    }

    #[wasm_bindgen(js_name = setResultsFailed)]
    pub fn set_results_failed(&mut self, message: &str) {
        self.inner.set_results_failed(message);
    }

    #[wasm_bindgen(js_name = setProposalJson)]
    pub fn set_proposal_json(
        &mut self,
        proposal_json: &str,
        is_core_creator: bool,
        ipfs_gateway: &str,
    ) -> Result<(), JsValue> {
        self.inner
            .set_proposal_json(proposal_json, is_core_creator, ipfs_gateway)
            .map_err(to_js)
    }

    /// Minutes east of UTC; pass `-new Date().getTimezoneOffset()`.
    #[wasm_bindgen(js_name = setUtcOffsetMinutes)]
    pub fn set_utc_offset_minutes(&mut self, minutes: i32) -> Result<(), JsValue> {
        self.inner.set_utc_offset_minutes(minutes).map_err(to_js)
    }

    #[wasm_bindgen(js_name = styleJson)]
    pub fn style_json(&self) -> Result<String, JsValue> {
        self.inner.style_json().map_err(to_js)
    }

    #[wasm_bindgen(js_name = infoJson)]
    pub fn info_json(&self) -> Result<String, JsValue> {
        self.inner.info_json().map_err(to_js)
    }
}

/// Match `location` against the route table; JSON of the route, or
/// `undefined` when nothing matches.
#[wasm_bindgen(js_name = matchRoute)]
pub fn match_route(location: &str) -> Option<String> {
    let route = Route::parse(location)?;
    serde_json::to_string(&route).ok()
}

// ---------------------------------------------------------------------------
// DOM-bound panel
// ---------------------------------------------------------------------------

struct DomGeometry {
    window: Window,
    document: Document,
    panel: HtmlElement,
    header_selector: String,
}

impl ViewportMetricsProvider for DomGeometry {
    fn viewport(&self) -> Size {
        window_size(&self.window)
    }
}

impl HeaderHeightProvider for DomGeometry {
    fn header_height(&self) -> Option<f64> {
        let header = self
            .document
            .query_selector(&self.header_selector)
            .ok()
            .flatten()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        Some(f64::from(header.offset_height()))
    }
}

impl PanelGeometryProvider for DomGeometry {
    fn panel_rect(&self) -> Option<Rect> {
        self.panel.is_connected().then(|| dom_rect(&self.panel))
    }

    fn parent_rect(&self) -> Option<Rect> {
        self.panel.parent_element().map(|parent| dom_rect(&parent))
    }
}

/// Real DOM listeners. Each handler is followed by `after`, which writes the
/// resulting style to the panel element.
struct DomEvents {
    window: Window,
    document: Document,
    after: Rc<dyn Fn()>,
}

impl ScrollEventSource for DomEvents {
    fn listen(&self, kind: EventKind, mut handler: Handler) -> Result<Listener, ListenError> {
        let window = self.window.clone();
        let after = Rc::clone(&self.after);
        let callback = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let event = match kind {
                EventKind::Scroll => Event::Scroll {
                    top: window.scroll_y().unwrap_or_default(),
                },
                EventKind::Resize => Event::resize(window_size(&window)),
            };
            handler(&event);
            after();
        }) as Box<dyn FnMut(web_sys::Event)>);

        let target: EventTarget = match kind {
            EventKind::Scroll => self.document.clone().into(),
            EventKind::Resize => self.window.clone().into(),
        };
        if let Err(err) = target
            .add_event_listener_with_callback(kind.dom_name(), callback.as_ref().unchecked_ref())
        {
            warn!(kind = %kind, error = ?err, "addEventListener failed");
            return Err(ListenError::new(kind));
        }

        Ok(Listener::new(kind, move || {
            let _ = target.remove_event_listener_with_callback(
                kind.dom_name(),
                callback.as_ref().unchecked_ref(),
            );
            drop(callback);
        }))
    }
}

fn set_or_remove(css: &CssStyleDeclaration, property: &str, value: Option<String>) {
    let result = match value {
        Some(value) => css.set_property(property, &value),
        None => css.remove_property(property).map(|_| ()),
    };
    if let Err(err) = result {
        warn!(property, error = ?err, "panel style update failed");
    }
}

/// Write `style` inline and toggle `marker` in the class list. Other
/// classes on the element are left as they are.
fn apply_style(panel: &HtmlElement, marker: &str, style: &PanelStyle) {
    let css = panel.style();
    set_or_remove(&css, "position", style.position.map(|p| p.as_css().to_owned()));
    set_or_remove(&css, "width", style.width.map(|w| format!("{w}px")));
    set_or_remove(&css, "top", style.top.map(|t| format!("{t}px")));
    if let Err(err) = panel
        .class_list()
        .toggle_with_force(marker, style.class.is_some())
    {
        warn!(marker, error = ?err, "panel class update failed");
    }
}

type DomController = StickyPanelController<DomGeometry>;

/// Sticky information panel bound to a live element.
#[wasm_bindgen]
pub struct ProposalPanel {
    controller: Rc<RefCell<DomController>>,
    geometry: Rc<DomGeometry>,
    events: DomEvents,
    marker: String,
}

#[wasm_bindgen]
impl ProposalPanel {
    /// Bind to `panel`; the header is found with `header_selector`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        panel: HtmlElement,
        header_selector: String,
        config_json: Option<String>,
    ) -> Result<ProposalPanel, JsValue> {
        install_panic_hook();
        let config = parse_config(config_json)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let marker = config.fixed_class.clone();

        let geometry = Rc::new(DomGeometry {
            window: window.clone(),
            document: document.clone(),
            panel: panel.clone(),
            header_selector,
        });
        let controller = Rc::new(RefCell::new(StickyPanelController::new(
            Rc::clone(&geometry),
            config,
        )));

        let weak: Weak<RefCell<DomController>> = Rc::downgrade(&controller);
        let after_marker = marker.clone();
        let after: Rc<dyn Fn()> = Rc::new(move || {
            let Some(controller) = weak.upgrade() else {
                return;
            };
            let Ok(controller) = controller.try_borrow() else {
                return;
            };
            apply_style(&panel, &after_marker, &controller.style());
        });

        Ok(Self {
            controller,
            geometry,
            events: DomEvents {
                window,
                document,
                after,
            },
            marker,
        })
    }

    /// Measure the header and start listening.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        let mut controller = self.controller.borrow_mut();
        controller
            .on_mount(Rc::clone(&self.geometry), &*self.geometry, &self.events)
            .map_err(to_js)?;
        apply_style(&self.geometry.panel, &self.marker, &controller.style());
        Ok(())
    }

    /// Stop listening and restore the element's in-flow style.
    pub fn unmount(&mut self) -> Result<(), JsValue> {
        let mut controller = self.controller.borrow_mut();
        controller.on_unmount().map_err(to_js)?;
        apply_style(&self.geometry.panel, &self.marker, &controller.style());
        Ok(())
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.controller.borrow().is_mounted()
    }

    /// Measure the header again, e.g. after it changed height.
    #[wasm_bindgen(js_name = remeasureHeader)]
    pub fn remeasure_header(&mut self) -> Option<f64> {
        let mut controller = self.controller.borrow_mut();
        let height = controller.remeasure_header();
        apply_style(&self.geometry.panel, &self.marker, &controller.style());
        height
    }

    #[wasm_bindgen(js_name = styleJson)]
    pub fn style_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.controller.borrow().style()).map_err(to_js)
    }
}
