#![forbid(unsafe_code)]

//! Content of the proposal information panel.
//!
//! The panel lists the author, the IPFS document (when there is one), and
//! the voting window, followed by the current results. This module decides
//! what goes in each row; markup and styling belong to the host.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;

use crate::date::{DateFormat, parse_server_date};
use crate::error::FetchError;
use crate::proposal::Proposal;
use crate::results::{VoteResultsState, VoteShare};

/// Characters of the IPFS CID shown as the link label.
pub const IPFS_LABEL_CHARS: usize = 8;

/// What a browser shows for a date it could not parse.
pub const INVALID_DATE: &str = "Invalid Date";

/// Inputs of the information panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InfoProps {
    pub proposal_id: String,
    pub creator_addr: String,
    pub is_core_creator: bool,
    /// IPFS CID; empty when the proposal has no pinned document.
    pub ipfs: String,
    pub ipfs_url: String,
    /// Start of voting, as the server sent it.
    pub start_time: String,
    /// End of voting, as the server sent it.
    pub end_time: String,
}

impl InfoProps {
    /// Props for `proposal`, linking its CID under `ipfs_gateway`.
    #[must_use]
    pub fn from_proposal(proposal: &Proposal, is_core_creator: bool, ipfs_gateway: &str) -> Self {
        let ipfs = proposal.cid.clone().unwrap_or_default();
        let ipfs_url = if ipfs.is_empty() {
            String::new()
        } else {
            format!("{}/{ipfs}", ipfs_gateway.trim_end_matches('/'))
        };
        Self {
            proposal_id: proposal.id.map(|id| id.to_string()).unwrap_or_default(),
            creator_addr: proposal.creator_addr.clone(),
            is_core_creator,
            ipfs,
            ipfs_url,
            start_time: to_server_string(proposal.start_time),
            end_time: to_server_string(proposal.end_time),
        }
    }
}

fn to_server_string(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Right-hand side of an information row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfoContent {
    /// Author address; `core` adds the "Core" badge.
    Author { address: String, core: bool },
    /// External link opened in a new tab.
    Link {
        label: String,
        href: String,
        tooltip: String,
    },
    Text { text: String },
}

/// One titled row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoBlock {
    pub title: &'static str,
    pub content: InfoContent,
}

/// The "Current Results" section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResultsSection {
    Loading,
    Ready { rows: Vec<ResultRow> },
    Failed { error: String },
}

/// A result row with its display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub label: String,
    pub percentage: f64,
    /// Shown next to the label and used as the bar width.
    pub percent_label: String,
}

impl From<VoteShare> for ResultRow {
    fn from(share: VoteShare) -> Self {
        let percent_label = share.percent_label();
        Self {
            label: share.label,
            percentage: share.percentage,
            percent_label,
        }
    }
}

impl ResultsSection {
    fn from_state(state: &VoteResultsState) -> Self {
        match state {
            VoteResultsState::Loading => Self::Loading,
            VoteResultsState::Ready(results) => Self::Ready {
                rows: results.shares().into_iter().map(ResultRow::from).collect(),
            },
            VoteResultsState::Failed(err) => Self::failed(err),
        }
    }

    fn failed(err: &FetchError) -> Self {
        Self::Failed {
            error: err.to_string(),
        }
    }
}

/// Everything the information panel displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InformationPanel {
    pub blocks: Vec<InfoBlock>,
    pub results: ResultsSection,
}

impl InformationPanel {
    /// Build the panel; dates render in the viewer's `offset`.
    #[must_use]
    pub fn build(props: &InfoProps, results: &VoteResultsState, offset: FixedOffset) -> Self {
        let mut blocks = Vec::with_capacity(4);
        blocks.push(InfoBlock {
            title: "Author",
            content: InfoContent::Author {
                address: props.creator_addr.clone(),
                core: props.is_core_creator,
            },
        });
        if !props.ipfs.is_empty() {
            blocks.push(InfoBlock {
                title: "IPFS",
                content: InfoContent::Link {
                    label: abbreviate_cid(&props.ipfs),
                    href: props.ipfs_url.clone(),
                    tooltip: "Open Ipfs link".to_owned(),
                },
            });
        }
        blocks.push(InfoBlock {
            title: "Start date",
            content: InfoContent::Text {
                text: display_date(&props.start_time, offset),
            },
        });
        blocks.push(InfoBlock {
            title: "End date",
            content: InfoContent::Text {
                text: display_date(&props.end_time, offset),
            },
        });

        Self {
            blocks,
            results: ResultsSection::from_state(results),
        }
    }

    #[must_use]
    pub fn block(&self, title: &str) -> Option<&InfoBlock> {
        self.blocks.iter().find(|b| b.title == title)
    }
}

/// First [`IPFS_LABEL_CHARS`] characters of a CID.
#[must_use]
pub fn abbreviate_cid(cid: &str) -> String {
    cid.chars().take(IPFS_LABEL_CHARS).collect()
}

fn display_date(raw: &str, offset: FixedOffset) -> String {
    match parse_server_date(raw) {
        Ok(at) => DateFormat::PROPOSAL.format(at, offset),
        Err(err) => {
            warn!(error = %err, "unparseable proposal date");
            INVALID_DATE.to_owned()
        }
    }
}
