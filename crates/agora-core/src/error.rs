#![forbid(unsafe_code)]

use thiserror::Error;

use crate::event::EventKind;

/// An event source refused to attach a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("could not attach {kind} listener")]
pub struct ListenError {
    pub kind: EventKind,
}

impl ListenError {
    #[must_use]
    pub const fn new(kind: EventKind) -> Self {
        Self { kind }
    }
}
