#![forbid(unsafe_code)]

//! Proposal data and the information panel's content.
//!
//! # Role in agora
//! `agora-proposal` holds everything the proposal page shows beside the
//! proposal body: the proposal record and its computed status, server date
//! handling, vote-result percentage shares, and the rows of the information
//! panel. It has no notion of layout; `agora-panel` decides where the panel
//! sits.
//!
//! # Primary responsibilities
//! - **Proposal**: server record and voter-facing status.
//! - **VoteResults**: ordered counts and two-decimal percentage shares.
//! - **DateFormat**: server date parsing and display.
//! - **InformationPanel**: author, IPFS, dates, and current results.

pub mod date;
pub mod error;
pub mod info;
pub mod proposal;
pub mod results;

pub use date::{DateFormat, parse_server_date};
pub use error::{DateError, ErrorKind, FetchError, ResultsError};
pub use info::{InfoBlock, InfoContent, InfoProps, InformationPanel, ResultRow, ResultsSection};
pub use proposal::{CompositeSignature, ComputedStatus, Proposal, ProposalStatus};
pub use results::{VoteResults, VoteResultsResponse, VoteResultsState, VoteShare, percentage};
