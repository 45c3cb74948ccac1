//! Retroactive audit trail
//!
//! Every mutation executed while a session is concluded is mirrored into
//! an append-only [`AuditEntry`] before the caller sees success. Entries
//! are immutable once written.

use crate::core::ids::{LegislatorId, ProposalId, SessionId};
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};

/// Kind of retroactive mutation an audit entry records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditAction {
    /// A batch of ballots recorded against a concluded session
    RetroactiveBallots {
        proposal: ProposalId,
        round: u8,
        ballots: u32,
    },
    /// A presence mark written against a concluded session
    RetroactivePresence { legislator: LegislatorId },
    /// An aggregation written against a concluded session; carries the
    /// revision it replaced when re-finalizing
    RetroactiveAggregation {
        proposal: ProposalId,
        round: u8,
        superseded_revision: Option<u32>,
    },
}

/// Immutable record of one retroactive mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor: String,
    pub session: SessionId,
    pub timestamp: u64,
    pub action: AuditAction,
    /// Mandatory free-text justification for the retroactive mutation
    pub justification: String,
    /// Snapshot of the replaced state, if any
    pub before: Option<serde_json::Value>,
    /// Snapshot of the written state
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    pub fn new(
        actor: impl Into<String>,
        session: impl Into<SessionId>,
        action: AuditAction,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            actor: actor.into(),
            session: session.into(),
            timestamp: current_timestamp(),
            action,
            justification: justification.into(),
            before: None,
            after: None,
        }
    }

    pub fn with_snapshots(
        mut self,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> Self {
        self.before = before;
        self.after = after;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_with_action_kind() {
        let entry = AuditEntry::new(
            "pres.rocha",
            "s-1",
            AuditAction::RetroactiveBallots {
                proposal: "plc-12".into(),
                round: 1,
                ballots: 9,
            },
            "clerical correction after the minutes were contested",
        );

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["action"]["kind"], "retroactive_ballots");
        assert_eq!(value["action"]["ballots"], 9);
        assert_eq!(value["actor"], "pres.rocha");
    }

    #[test]
    fn test_snapshots_round_trip() {
        let entry = AuditEntry::new(
            "pres.rocha",
            "s-1",
            AuditAction::RetroactiveAggregation {
                proposal: "plc-12".into(),
                round: 1,
                superseded_revision: Some(1),
            },
            "recount",
        )
        .with_snapshots(
            Some(serde_json::json!({"yes": 5})),
            Some(serde_json::json!({"yes": 6})),
        );

        let json = serde_json::to_string(&entry).unwrap();
        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
