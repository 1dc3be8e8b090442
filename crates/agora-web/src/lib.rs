#![forbid(unsafe_code)]

//! Browser surface of agora.
//!
//! # Role in agora
//! `agora-web` wires the panel and proposal crates to a page. The
//! [`runner_core::ProposalPageCore`] is driven entirely by host calls and
//! runs natively in tests; on `wasm32` the `ProposalPanel` export binds the
//! same controller to real DOM listeners.
//!
//! # Primary responsibilities
//! - **Route**: the top-level route table, first match wins.
//! - **PageRegistry**: lazily loaded pages with a loading fallback.
//! - **ProposalPageCore**: host-driven sticky panel, results, and info JSON.

pub mod router;
pub mod runner_core;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{ProposalPageRunner, ProposalPanel};

pub use router::{Navigation, Page, PageRegistry, Route};
pub use runner_core::{HostGeometry, ProposalPageCore, WebError};

#[cfg(test)]
mod tests {
    use crate::runner_core::{ProposalPageCore, WebError};
    use agora_core::Size;
    use agora_panel::{PanelError, StickyConfig};
    use pretty_assertions::assert_eq;

    const PROPOSAL: &str = r#"{
        "id": 42,
        "name": "Fund the community treasury",
        "communityId": 3,
        "choices": ["Yes", "No"],
        "creatorAddr": "0xf8d6e0586b0a20c7",
        "startTime": "2026-10-01T09:00:00Z",
        "endTime": "2026-10-31T21:30:00Z",
        "cid": "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG",
        "status": "published"
    }"#;

    /// Viewport 1280x900, header 64, an 800x400 panel 600px down.
    fn mounted_core() -> ProposalPageCore {
        let mut core = ProposalPageCore::new(Size::new(1280.0, 900.0), StickyConfig::default());
        core.set_header_height(Some(64.0));
        core.set_panel_rect(240.0, 600.0, 800.0, 400.0);
        core.set_parent_rect(240.0, 600.0, 800.0, 400.0);
        core.mount().unwrap();
        core
    }

    #[test]
    fn mount_registers_two_listeners() {
        let mut core = mounted_core();
        assert!(core.is_mounted());
        assert_eq!(core.listener_count(), 2);
        core.unmount().unwrap();
        assert_eq!(core.listener_count(), 0);
        assert!(matches!(
            core.unmount(),
            Err(WebError::Panel(PanelError::NotMounted))
        ));
    }

    #[test]
    fn double_mount_is_rejected() {
        let mut core = mounted_core();
        assert!(matches!(
            core.mount(),
            Err(WebError::Panel(PanelError::AlreadyMounted))
        ));
        assert_eq!(core.listener_count(), 2);
    }

    #[test]
    fn scroll_pins_resize_rewidths_scroll_back_unpins() {
        let mut core = mounted_core();
        assert!(!core.scroll(100.0));
        assert_eq!(core.style_json().unwrap(), "{}");

        core.set_panel_rect(240.0, 66.0, 800.0, 400.0);
        assert!(core.scroll(534.0));
        assert_eq!(
            core.style_json().unwrap(),
            r#"{"position":"fixed","width":800.0,"top":64.0,"class":"is-panel-fixed"}"#
        );

        core.set_parent_rect(200.0, 0.0, 600.0, 400.0);
        assert!(core.resize(1000.0, 900.0));
        assert_eq!(core.style().width, Some(600.0));
        assert!(!core.resize(1000.0, 700.0));

        assert!(!core.scroll(600.0));
        assert!(core.scroll(400.0));
        assert_eq!(core.style_json().unwrap(), "{}");
    }

    #[test]
    fn events_before_mount_change_nothing() {
        let mut core = ProposalPageCore::new(Size::new(1280.0, 900.0), StickyConfig::default());
        core.set_panel_rect(0.0, 0.0, 800.0, 100.0);
        core.set_parent_rect(0.0, 0.0, 800.0, 100.0);
        assert!(!core.scroll(500.0));
        assert!(core.style().is_empty());
    }

    #[test]
    fn detached_panel_is_ignored() {
        let mut core = mounted_core();
        core.clear_geometry();
        assert!(!core.scroll(900.0));
        assert!(core.style().is_empty());
    }

    #[test]
    fn header_change_needs_remeasure() {
        let mut core = mounted_core();
        core.set_panel_rect(240.0, 10.0, 800.0, 400.0);
        assert!(core.scroll(700.0));
        core.set_header_height(Some(48.0));
        assert_eq!(core.style().top, Some(64.0));
        assert_eq!(core.remeasure_header(), Some(48.0));
        assert_eq!(core.style().top, Some(48.0));
    }

    #[test]
    fn header_remeasured_on_resize_when_configured() {
        let mut core = ProposalPageCore::with_config_json(
            Size::new(1280.0, 900.0),
            r#"{"remeasure_header_on_resize": true}"#,
        )
        .unwrap();
        core.set_header_height(Some(64.0));
        core.set_panel_rect(240.0, 10.0, 800.0, 400.0);
        core.set_parent_rect(240.0, 10.0, 800.0, 400.0);
        core.mount().unwrap();
        assert!(core.scroll(700.0));

        core.set_header_height(Some(56.0));
        assert!(core.resize(1280.0, 880.0));
        assert_eq!(core.style().top, Some(56.0));
    }

    #[test]
    fn bad_config_is_rejected() {
        let err = ProposalPageCore::with_config_json(Size::new(800.0, 600.0), r#"{"margin": 4}"#)
            .unwrap_err();
        assert!(matches!(err, WebError::Config(_)));
    }

    #[test]
    fn info_json_reflects_results() {
        let mut core = mounted_core();
        assert!(matches!(core.info_json(), Err(WebError::NoProposal)));

        core.set_proposal_json(PROPOSAL, true, "https://ipfs.io/ipfs").unwrap();
        let info: serde_json::Value = serde_json::from_str(&core.info_json().unwrap()).unwrap();
        assert_eq!(info["results"]["state"], "loading");
        assert_eq!(info["blocks"][1]["content"]["label"], "QmYwAPJz");
        assert_eq!(info["blocks"][2]["content"]["text"], "Oct 1, 2026, 9:00 AM");

        core.set_results_json(r#"{"results": {"Yes": 3, "No": 1}}"#);
        let info: serde_json::Value = serde_json::from_str(&core.info_json().unwrap()).unwrap();
        assert_eq!(info["results"]["rows"][0]["percent_label"], "75.00%");
        assert_eq!(info["results"]["rows"][1]["percent_label"], "25.00%");

        core.set_results_failed("HTTP 500");
        let info: serde_json::Value = serde_json::from_str(&core.info_json().unwrap()).unwrap();
        assert_eq!(info["results"]["state"], "failed");
    }

    #[test]
    fn dates_follow_viewer_offset() {
        let mut core = mounted_core();
        core.set_proposal_json(PROPOSAL, false, "https://ipfs.io/ipfs").unwrap();
        core.set_utc_offset_minutes(-4 * 60).unwrap();
        let info = core.info_panel().unwrap();
        let end = serde_json::to_value(&info.blocks[3].content).unwrap();
        assert_eq!(end["text"], "Oct 31, 2026, 5:30 PM");
        assert!(matches!(
            core.set_utc_offset_minutes(24 * 60),
            Err(WebError::InvalidOffset(1440))
        ));
    }
}
