#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

//! `ProposalPanel` against a live document: real `scroll` listeners, real
//! bounding rectangles, inline style written back to the element.

use agora_web::ProposalPanel;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

const MARKER: &str = "is-panel-fixed";

fn document() -> Document {
    web_sys::window()
        .and_then(|w| w.document())
        .expect("test runs in a browser")
}

/// A 640px wide container pinned to the top of the page holding a 100px
/// panel. With no header the panel already sits inside the pin threshold,
/// so the first scroll event pins it.
fn fixture() -> (HtmlElement, HtmlElement) {
    let document = document();
    let container: HtmlElement = document
        .create_element("div")
        .unwrap()
        .dyn_into()
        .unwrap();
    container
        .set_attribute("style", "position: absolute; top: 0; left: 0; width: 640px;")
        .unwrap();
    let panel: HtmlElement = document
        .create_element("div")
        .unwrap()
        .dyn_into()
        .unwrap();
    panel.set_class_name("proposal-info rounded-sm");
    panel.set_attribute("style", "height: 100px;").unwrap();
    container.append_child(&panel).unwrap();
    document.body().unwrap().append_child(&container).unwrap();
    (container, panel)
}

fn scroll_page() {
    let event = web_sys::Event::new("scroll").unwrap();
    document().dispatch_event(&event).unwrap();
}

fn inline(panel: &HtmlElement, property: &str) -> String {
    panel.style().get_property_value(property).unwrap()
}

#[wasm_bindgen_test]
fn scroll_pins_panel_and_unmount_restores_it() {
    let (container, element) = fixture();
    let mut panel = ProposalPanel::new(element.clone(), "#no-header".to_owned(), None).unwrap();
    panel.mount().unwrap();
    assert_eq!(inline(&element, "position"), "");

    element.class_list().add_1("host-added").unwrap();
    scroll_page();
    assert_eq!(inline(&element, "position"), "fixed");
    assert_eq!(inline(&element, "width"), "640px");
    assert_eq!(inline(&element, "top"), "0px");
    let classes = element.class_list();
    assert!(classes.contains(MARKER));
    assert!(classes.contains("proposal-info"));
    assert!(classes.contains("host-added"));

    panel.unmount().unwrap();
    assert!(!panel.is_mounted());
    assert_eq!(inline(&element, "position"), "");
    assert_eq!(inline(&element, "width"), "");
    assert!(!element.class_list().contains(MARKER));
    assert!(element.class_list().contains("host-added"));

    // A listener left behind would pin the panel again.
    scroll_page();
    assert_eq!(inline(&element, "position"), "");
    assert!(!element.class_list().contains(MARKER));
    assert_eq!(panel.style_json().unwrap(), "{}");

    container.remove();
}

#[wasm_bindgen_test]
fn remount_after_unmount_listens_again() {
    let (container, element) = fixture();
    let mut panel = ProposalPanel::new(element.clone(), "#no-header".to_owned(), None).unwrap();
    panel.mount().unwrap();
    panel.unmount().unwrap();
    assert!(panel.unmount().is_err());

    panel.mount().unwrap();
    assert!(panel.mount().is_err());
    scroll_page();
    assert_eq!(inline(&element, "position"), "fixed");

    panel.unmount().unwrap();
    container.remove();
}

#[wasm_bindgen_test]
fn dropped_panel_stops_reacting() {
    let (container, element) = fixture();
    let mut panel = ProposalPanel::new(element.clone(), "#no-header".to_owned(), None).unwrap();
    panel.mount().unwrap();
    drop(panel);

    scroll_page();
    assert_eq!(inline(&element, "position"), "");
    assert!(!element.class_list().contains(MARKER));
    container.remove();
}
