//! Vote aggregation records
//!
//! The aggregation is the at-most-once, auditable record of a resolved
//! voting round. Re-finalization supersedes the stored record and bumps
//! its revision, so downstream consumers can always tell the canonical
//! verdict from a superseded one.

use super::tally::Tally;
use crate::core::ids::{ProposalId, SessionId};
use crate::quorum::QuorumType;
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};

/// Resolved outcome of a voting round
///
/// This is what the proposal-status collaborator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Approved,
    Rejected,
}

impl RoundOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, RoundOutcome::Approved)
    }

    pub fn from_approved(approved: bool) -> Self {
        if approved {
            RoundOutcome::Approved
        } else {
            RoundOutcome::Rejected
        }
    }
}

impl std::fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundOutcome::Approved => write!(f, "Approved"),
            RoundOutcome::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Immutable aggregation of one voting round (Entity)
///
/// At most one exists per (proposal, session, round). A re-finalization
/// replaces it wholesale with `revision + 1` rather than editing in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteAggregation {
    pub proposal: ProposalId,
    pub session: SessionId,
    pub round: u8,
    pub tally: Tally,
    pub outcome: RoundOutcome,
    /// Quorum formula the verdict was resolved under, snapshotted so later
    /// rule edits never rewrite a recorded verdict
    pub quorum_type: QuorumType,
    pub finalized_at: u64,
    pub finalized_by: String,
    /// 1 for the original aggregation, incremented on each supersede
    pub revision: u32,
    pub retroactive_note: Option<String>,
}

impl VoteAggregation {
    pub fn new(
        proposal: impl Into<ProposalId>,
        session: impl Into<SessionId>,
        round: u8,
        tally: Tally,
        outcome: RoundOutcome,
        quorum_type: QuorumType,
        finalized_by: impl Into<String>,
    ) -> Self {
        Self {
            proposal: proposal.into(),
            session: session.into(),
            round,
            tally,
            outcome,
            quorum_type,
            finalized_at: current_timestamp(),
            finalized_by: finalized_by.into(),
            revision: 1,
            retroactive_note: None,
        }
    }

    /// Mark this aggregation as superseding `prior` (revision bump).
    pub fn superseding(mut self, prior: &VoteAggregation) -> Self {
        self.revision = prior.revision + 1;
        self
    }

    pub fn with_retroactive_note(mut self, note: impl Into<String>) -> Self {
        self.retroactive_note = Some(note.into());
        self
    }

    /// The unique key guarding the at-most-once invariant
    pub fn key(&self) -> (ProposalId, SessionId, u8) {
        (self.proposal.clone(), self.session.clone(), self.round)
    }
}
