#![forbid(unsafe_code)]

//! Server date parsing and the proposal page's date display format.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::error::DateError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a date as the server sends it.
///
/// Accepts RFC 3339 (`2026-10-17T15:05:00Z`, with any offset) and naive
/// timestamps (`2026-10-17 15:05:00`), which are taken as UTC.
pub fn parse_server_date(raw: &str) -> Result<DateTime<Utc>, DateError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DateError::Unparseable(raw.to_owned()))
}

/// Display configuration: numeric day, short month, numeric year, and
/// hour/minute, e.g. `Oct 17, 2026, 3:05 PM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormat {
    /// 12-hour clock with AM/PM; otherwise 24-hour.
    pub hour12: bool,
}

impl DateFormat {
    /// The format used for proposal start and end dates.
    pub const PROPOSAL: Self = Self { hour12: true };

    const fn pattern(self) -> &'static str {
        if self.hour12 {
            "%b %-d, %Y, %-I:%M %p"
        } else {
            "%b %-d, %Y, %H:%M"
        }
    }

    /// Render `at` in the viewer's UTC offset.
    #[must_use]
    pub fn format(self, at: DateTime<Utc>, offset: FixedOffset) -> String {
        at.with_timezone(&offset).format(self.pattern()).to_string()
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::PROPOSAL
    }
}
