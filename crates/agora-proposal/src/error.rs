#![forbid(unsafe_code)]

use thiserror::Error;

/// Rejected vote-results input.
#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("vote count for {label:?} must be a finite, non-negative number, got {count}")]
    InvalidCount { label: String, count: f64 },
    #[error("vote count {count} for {label:?} makes the total overflow")]
    TotalOverflow { label: String, count: f64 },
    #[error("invalid vote results payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// A server date that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("unrecognized date {0:?}")]
    Unparseable(String),
}

/// Why vote results are unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request for results failed.
    FetchFailed,
    /// The response arrived but could not be read.
    InvalidPayload,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FetchFailed => "fetch_failed",
            Self::InvalidPayload => "invalid_payload",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure surfaced to the UI in place of vote results.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FetchError {
    #[must_use]
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::FetchFailed,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidPayload,
            message: message.into(),
        }
    }
}
