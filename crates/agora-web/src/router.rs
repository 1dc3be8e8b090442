#![forbid(unsafe_code)]

//! Top-level route table and lazily resolved pages.
//!
//! Routes are tried in table order and the first match wins. Exact routes
//! need every segment to match; prefix routes accept extra trailing
//! segments. Literal segments compare ASCII case-insensitively.
//!
//! Pages are resolved through a [`PageRegistry`]. A page's loader runs at
//! most once, on the first navigation to it; until it has run the registry
//! reports [`Navigation::Loading`] so the host can show its fallback.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

/// Top-level pages of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Home,
    About,
    Community,
    ProposalCreate,
    Proposal,
    Debug,
}

impl Page {
    pub const ALL: [Self; 6] = [
        Self::Home,
        Self::About,
        Self::Community,
        Self::ProposalCreate,
        Self::Proposal,
        Self::Debug,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Community => "community",
            Self::ProposalCreate => "proposal_create",
            Self::Proposal => "proposal",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
struct RouteDef {
    pattern: &'static str,
    exact: bool,
    page: Page,
}

const ROUTES: [RouteDef; 6] = [
    RouteDef {
        pattern: "/",
        exact: true,
        page: Page::Home,
    },
    RouteDef {
        pattern: "/about",
        exact: true,
        page: Page::About,
    },
    RouteDef {
        pattern: "/community/:communityId",
        exact: false,
        page: Page::Community,
    },
    RouteDef {
        pattern: "/proposal/create",
        exact: true,
        page: Page::ProposalCreate,
    },
    RouteDef {
        pattern: "/proposal/:proposalId",
        exact: false,
        page: Page::Proposal,
    },
    RouteDef {
        pattern: "/debug-contract",
        exact: true,
        page: Page::Debug,
    },
];

/// A matched route with its path parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Route {
    Home,
    About,
    Community {
        #[serde(rename = "communityId")]
        community_id: String,
    },
    ProposalCreate,
    Proposal {
        #[serde(rename = "proposalId")]
        proposal_id: String,
    },
    Debug,
}

impl Route {
    /// Match a location (path, optionally with query and fragment).
    #[must_use]
    pub fn parse(location: &str) -> Option<Self> {
        let path = normalize_path(location);
        let segments: Vec<&str> = split_segments(&path).collect();

        for def in &ROUTES {
            if let Some(param) = match_pattern(def, &segments) {
                return Some(Self::from_match(def.page, param));
            }
        }
        trace!(path = %path, "no route matched");
        None
    }

    fn from_match(page: Page, param: Option<&str>) -> Self {
        let param = param.unwrap_or_default().to_owned();
        match page {
            Page::Home => Self::Home,
            Page::About => Self::About,
            Page::Community => Self::Community {
                community_id: param,
            },
            Page::ProposalCreate => Self::ProposalCreate,
            Page::Proposal => Self::Proposal { proposal_id: param },
            Page::Debug => Self::Debug,
        }
    }

    #[must_use]
    pub const fn page(&self) -> Page {
        match self {
            Self::Home => Page::Home,
            Self::About => Page::About,
            Self::Community { .. } => Page::Community,
            Self::ProposalCreate => Page::ProposalCreate,
            Self::Proposal { .. } => Page::Proposal,
            Self::Debug => Page::Debug,
        }
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::About => "/about".to_owned(),
            Self::Community { community_id } => format!("/community/{community_id}"),
            Self::ProposalCreate => "/proposal/create".to_owned(),
            Self::Proposal { proposal_id } => format!("/proposal/{proposal_id}"),
            Self::Debug => "/debug-contract".to_owned(),
        }
    }
}

/// Strip query and fragment, ensure a leading slash, and drop trailing
/// slashes (the root stays `/`).
#[must_use]
pub fn normalize_path(location: &str) -> String {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    let trimmed = location[..end].trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// `Some(param)` when `def` matches; `param` is the value of the route's
/// `:name` segment, if it has one.
fn match_pattern<'a>(def: &RouteDef, segments: &[&'a str]) -> Option<Option<&'a str>> {
    let pattern: Vec<&str> = split_segments(def.pattern).collect();
    if segments.len() < pattern.len() || (def.exact && segments.len() != pattern.len()) {
        return None;
    }

    let mut param = None;
    for (want, got) in pattern.iter().zip(segments) {
        if want.starts_with(':') {
            param = Some(*got);
        } else if !want.eq_ignore_ascii_case(got) {
            return None;
        }
    }
    Some(param)
}

/// Result of a navigation.
#[derive(Debug, PartialEq)]
pub enum Navigation<'a, T> {
    /// Nothing matched the location.
    NotFound,
    /// Page matched but its content is not loaded yet; show the fallback.
    Loading(Route),
    Ready(Route, &'a T),
}

type Loader<T> = Box<dyn FnOnce() -> T>;

enum Slot<T> {
    Unloaded(Loader<T>),
    Requested(Loader<T>),
    Loaded(T),
}

/// Lazily loaded page content, keyed by [`Page`].
pub struct PageRegistry<T> {
    slots: HashMap<Page, Slot<T>>,
}

impl<T> Default for PageRegistry<T> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<T> PageRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the loader for `page`, replacing any earlier registration.
    pub fn register(&mut self, page: Page, loader: impl FnOnce() -> T + 'static) {
        self.slots.insert(page, Slot::Unloaded(Box::new(loader)));
    }

    /// Resolve `location`. The first navigation to an unloaded page queues
    /// its loader and returns [`Navigation::Loading`].
    pub fn navigate(&mut self, location: &str) -> Navigation<'_, T> {
        let Some(route) = Route::parse(location) else {
            return Navigation::NotFound;
        };
        let page = route.page();

        if let Some(slot) = self.slots.remove(&page) {
            let slot = match slot {
                Slot::Unloaded(loader) => {
                    debug!(page = %page, "page requested");
                    Slot::Requested(loader)
                }
                other => other,
            };
            self.slots.insert(page, slot);
        }

        match self.slots.get(&page) {
            Some(Slot::Loaded(content)) => Navigation::Ready(route, content),
            Some(Slot::Unloaded(_) | Slot::Requested(_)) => Navigation::Loading(route),
            None => Navigation::NotFound,
        }
    }

    /// Run every queued loader. Returns how many pages finished loading.
    pub fn load_pending(&mut self) -> usize {
        let requested: Vec<Page> = self
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Requested(_)))
            .map(|(page, _)| *page)
            .collect();

        for page in &requested {
            if let Some(Slot::Requested(loader)) = self.slots.remove(page) {
                self.slots.insert(*page, Slot::Loaded(loader()));
                debug!(page = %page, "page loaded");
            }
        }
        requested.len()
    }

    #[must_use]
    pub fn is_loaded(&self, page: Page) -> bool {
        matches!(self.slots.get(&page), Some(Slot::Loaded(_)))
    }
}

impl<T> fmt::Debug for PageRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut loaded: Vec<&str> = self
            .slots
            .iter()
            .filter(|(_, slot)| matches!(slot, Slot::Loaded(_)))
            .map(|(page, _)| page.as_str())
            .collect();
        loaded.sort_unstable();
        f.debug_struct("PageRegistry")
            .field("registered", &self.slots.len())
            .field("loaded", &loaded)
            .finish()
    }
}
