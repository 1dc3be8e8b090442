#![forbid(unsafe_code)]

//! Vote results and their percentage shares.
//!
//! [`VoteResults`] keeps options in the order the server listed them; rows
//! are rendered in that order with no sorting or tie-breaking.
//!
//! Shares are `count / total * 100` rounded to two decimals. An option with
//! no votes, or a proposal with no votes at all, shows exactly `0`. The
//! total of a [`VoteResults`] is always finite, so shares stay finite even
//! for counts near `f64::MAX`.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::error::{FetchError, ResultsError};

/// Round to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Share of `total` held by `count`, in percent with two decimals.
#[must_use]
pub fn percentage(count: f64, total: f64) -> f64 {
    if total == 0.0 || count == 0.0 {
        0.0
    } else {
        round2(count / total * 100.0)
    }
}

fn check_count(label: &str, count: f64) -> Result<(), ResultsError> {
    if count.is_finite() && count >= 0.0 {
        Ok(())
    } else {
        Err(ResultsError::InvalidCount {
            label: label.to_owned(),
            count,
        })
    }
}

/// Insertion-ordered mapping from option label to vote count.
///
/// Counts are weights and need not be integers (token-weighted strategies
/// produce fractional tallies), but are always finite and non-negative, and
/// so is their sum.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VoteResults {
    entries: Vec<(String, f64)>,
}

impl VoteResults {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(label, count)` pairs, keeping their order.
    pub fn from_entries<I, L>(entries: I) -> Result<Self, ResultsError>
    where
        I: IntoIterator<Item = (L, f64)>,
        L: Into<String>,
    {
        let mut results = Self::new();
        for (label, count) in entries {
            results.insert(label, count)?;
        }
        Ok(results)
    }

    /// Set the count for `label`. An existing label keeps its position.
    ///
    /// Rejects a count that would push the total past `f64::MAX`.
    pub fn insert(&mut self, label: impl Into<String>, count: f64) -> Result<(), ResultsError> {
        let label = label.into();
        check_count(&label, count)?;
        let others: f64 = self
            .entries
            .iter()
            .filter(|(l, _)| *l != label)
            .map(|&(_, c)| c)
            .sum();
        if !(others + count).is_finite() {
            return Err(ResultsError::TotalOverflow { label, count });
        }
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, slot)) => *slot = count,
            None => self.entries.push((label, count)),
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, count)| count)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|&(_, count)| count).sum()
    }

    /// One share per option, in mapping order.
    #[must_use]
    pub fn shares(&self) -> Vec<VoteShare> {
        let total = self.total();
        self.entries
            .iter()
            .map(|(label, count)| VoteShare {
                label: label.clone(),
                count: *count,
                percentage: percentage(*count, total),
            })
            .collect()
    }
}

impl Serialize for VoteResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, count) in &self.entries {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for VoteResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = VoteResults;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of option label to vote count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut results = VoteResults {
                    entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
                };
                while let Some((label, count)) = access.next_entry::<String, f64>()? {
                    results.insert(label, count).map_err(de::Error::custom)?;
                }
                Ok(results)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// One rendered result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteShare {
    pub label: String,
    pub count: f64,
    /// Percent of all votes, two decimals.
    pub percentage: f64,
}

impl VoteShare {
    /// Percentage as displayed: `"75.00%"`, or `"0%"` for an option with no
    /// votes. Also used as the CSS width of the result bar.
    #[must_use]
    pub fn percent_label(&self) -> String {
        if self.count == 0.0 {
            "0%".to_owned()
        } else {
            format!("{:.2}%", self.percentage)
        }
    }
}

/// Vote results response body: `{ "results": { "<label>": <count>, ... } }`.
///
/// A body without `results` reads as no options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VoteResultsResponse {
    #[serde(default)]
    pub results: VoteResults,
}

impl VoteResultsResponse {
    pub fn from_json(s: &str) -> Result<Self, ResultsError> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Where the results for a proposal are in their lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum VoteResultsState {
    /// Waiting on the results source. Nothing is rendered.
    #[default]
    Loading,
    Ready(VoteResults),
    /// The results could not be obtained.
    Failed(FetchError),
}

impl VoteResultsState {
    /// State for a raw response body; an unreadable body is a failure.
    #[must_use]
    pub fn from_response_json(body: &str) -> Self {
        match VoteResultsResponse::from_json(body) {
            Ok(response) => Self::Ready(response.results),
            Err(err) => {
                warn!(error = %err, "rejected vote results payload");
                Self::Failed(FetchError::invalid_payload(err.to_string()))
            }
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Rows to render; `None` unless results are ready.
    #[must_use]
    pub fn shares(&self) -> Option<Vec<VoteShare>> {
        match self {
            Self::Ready(results) => Some(results.shares()),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Loading | Self::Ready(_) => None,
        }
    }
}
