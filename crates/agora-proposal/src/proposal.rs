#![forbid(unsafe_code)]

//! Governance proposals as the server describes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status stored with the proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Published,
    Cancelled,
    Closed,
    /// Any status this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Status as shown to voters, derived from the stored status and the
/// voting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputedStatus {
    Pending,
    Active,
    Closed,
    Cancelled,
}

impl ComputedStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Account signature over a proposal submission, in the wallet's
/// composite-signature shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeSignature {
    #[serde(rename = "f_type", default, skip_serializing_if = "Option::is_none")]
    pub f_type: Option<String>,
    #[serde(rename = "f_vsn", default, skip_serializing_if = "Option::is_none")]
    pub f_vsn: Option<String>,
    pub addr: String,
    pub key_id: u32,
    pub signature: String,
}

/// A proposal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub community_id: u64,
    pub choices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_balance: Option<u64>,
    pub creator_addr: String,
    pub start_time: DateTime<Utc>,
    /// Outcome recorded once the proposal is closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// IPFS content id of the pinned proposal document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProposalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(rename = "block_height", default)]
    pub block_height: u64,
    #[serde(rename = "total_votes", default)]
    pub total_votes: u64,
    /// Signed message timestamp that accompanied the submission.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub composite_signatures: Option<Vec<CompositeSignature>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_status: Option<ComputedStatus>,
}

impl Proposal {
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Derive the voter-facing status at `now`.
    ///
    /// A published proposal exactly at its start or end instant has no
    /// computed status.
    #[must_use]
    pub fn computed_status_at(&self, now: DateTime<Utc>) -> Option<ComputedStatus> {
        match self.status? {
            ProposalStatus::Published if self.start_time > now => Some(ComputedStatus::Pending),
            ProposalStatus::Published if self.start_time < now && self.end_time > now => {
                Some(ComputedStatus::Active)
            }
            ProposalStatus::Published if self.end_time < now => Some(ComputedStatus::Closed),
            ProposalStatus::Published | ProposalStatus::Unknown => None,
            ProposalStatus::Cancelled => Some(ComputedStatus::Cancelled),
            ProposalStatus::Closed => Some(ComputedStatus::Closed),
        }
    }

    /// Whether `now` falls strictly inside the voting window.
    #[must_use]
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now > self.start_time && now < self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    const PAYLOAD: &str = r#"{
        "id": 42,
        "name": "Fund the community treasury",
        "communityId": 3,
        "choices": ["Yes", "No"],
        "strategy": "token-weighted-default",
        "creatorAddr": "0xf8d6e0586b0a20c7",
        "startTime": "2026-10-01T00:00:00Z",
        "endTime": "2026-10-31T00:00:00Z",
        "cid": "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG",
        "status": "published",
        "body": "<p>Proposal text</p>",
        "block_height": 1024,
        "total_votes": 17,
        "timestamp": "1665000000",
        "compositeSignatures": [
            {
                "f_type": "CompositeSignature",
                "f_vsn": "1.0.0",
                "addr": "0xf8d6e0586b0a20c7",
                "keyId": 0,
                "signature": "9a3f0c"
            }
        ]
    }"#;

    fn proposal() -> Proposal {
        Proposal::from_json(PAYLOAD).unwrap()
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn decodes_server_payload() {
        let p = proposal();
        assert_eq!(p.id, Some(42));
        assert_eq!(p.community_id, 3);
        assert_eq!(p.choices, vec!["Yes", "No"]);
        assert_eq!(p.status, Some(ProposalStatus::Published));
        assert_eq!(p.total_votes, 17);
        assert_eq!(p.block_height, 1024);
        assert_eq!(p.min_balance, None);
        assert_eq!(p.timestamp, "1665000000");
        assert_eq!(p.result, None);
    }

    #[test]
    fn signatures_survive_reserialization() {
        let p = proposal();
        let signatures = p.composite_signatures.as_deref().unwrap();
        assert_eq!(signatures.len(), 1);
        assert_eq!(signatures[0].key_id, 0);
        assert_eq!(signatures[0].f_type.as_deref(), Some("CompositeSignature"));

        let mut closed = p.clone();
        closed.result = Some("Yes".to_owned());
        let value = serde_json::to_value(&closed).unwrap();
        assert_eq!(value["timestamp"], "1665000000");
        assert_eq!(value["result"], "Yes");
        assert_eq!(value["compositeSignatures"][0]["keyId"], 0);
        assert_eq!(value["compositeSignatures"][0]["f_vsn"], "1.0.0");
        assert_eq!(Proposal::from_json(&value.to_string()).unwrap(), closed);
    }

    #[test]
    fn published_status_follows_window() {
        let p = proposal();
        let before = p.start_time - Duration::hours(1);
        assert_eq!(p.computed_status_at(before), Some(ComputedStatus::Pending));
        assert_eq!(p.computed_status_at(at(15)), Some(ComputedStatus::Active));
        let after = p.end_time + Duration::seconds(1);
        assert_eq!(p.computed_status_at(after), Some(ComputedStatus::Closed));
        assert_eq!(p.computed_status_at(p.start_time), None);
    }

    #[test]
    fn stored_terminal_statuses_win() {
        let mut p = proposal();
        p.status = Some(ProposalStatus::Cancelled);
        assert_eq!(p.computed_status_at(at(15)), Some(ComputedStatus::Cancelled));
        p.status = Some(ProposalStatus::Closed);
        assert_eq!(p.computed_status_at(at(15)), Some(ComputedStatus::Closed));
        p.status = None;
        assert_eq!(p.computed_status_at(at(15)), None);
    }

    #[test]
    fn unknown_status_decodes() {
        let json = PAYLOAD.replace("\"published\"", "\"draft\"");
        let p = Proposal::from_json(&json).unwrap();
        assert_eq!(p.status, Some(ProposalStatus::Unknown));
        assert_eq!(p.computed_status_at(at(15)), None);
    }

    #[test]
    fn live_is_strictly_inside_window() {
        let p = proposal();
        assert!(p.is_live_at(at(15)));
        assert!(!p.is_live_at(p.start_time));
        assert!(!p.is_live_at(p.end_time));
    }

    #[test]
    fn computed_status_strings() {
        assert_eq!(ComputedStatus::Active.as_str(), "active");
        assert_eq!(
            serde_json::to_string(&ComputedStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }
}
