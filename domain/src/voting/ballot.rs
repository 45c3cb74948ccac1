//! Ballot types for roll-call voting

use crate::core::ids::{LegislatorId, ProposalId, SessionId};
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};

/// A single legislator's choice in a voting round
///
/// `Absent` is informational: it may appear in a submitted batch but is
/// never persisted as a ballot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallotChoice {
    Yes,
    No,
    Abstain,
    Absent,
}

impl BallotChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            BallotChoice::Yes => "yes",
            BallotChoice::No => "no",
            BallotChoice::Abstain => "abstain",
            BallotChoice::Absent => "absent",
        }
    }

    /// Check if this choice produces a persisted ballot
    pub fn is_countable(&self) -> bool {
        !matches!(self, BallotChoice::Absent)
    }
}

impl std::fmt::Display for BallotChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BallotChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yes" | "y" => Ok(BallotChoice::Yes),
            "no" | "n" => Ok(BallotChoice::No),
            "abstain" => Ok(BallotChoice::Abstain),
            "absent" => Ok(BallotChoice::Absent),
            _ => Err(format!(
                "Unknown ballot choice: {}. Valid: yes, no, abstain, absent",
                s
            )),
        }
    }
}

/// One entry of a submitted ballot batch, before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotSlip {
    pub legislator: LegislatorId,
    pub choice: BallotChoice,
}

impl BallotSlip {
    pub fn new(legislator: impl Into<LegislatorId>, choice: BallotChoice) -> Self {
        Self {
            legislator: legislator.into(),
            choice,
        }
    }
}

/// A persisted ballot (Entity)
///
/// Keyed by (proposal, legislator, round); at most one exists per key and
/// re-submission supersedes the stored choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ballot {
    pub proposal: ProposalId,
    pub legislator: LegislatorId,
    pub round: u8,
    pub session: SessionId,
    pub choice: BallotChoice,
    pub cast_at: u64,
}

impl Ballot {
    pub fn new(
        proposal: impl Into<ProposalId>,
        legislator: impl Into<LegislatorId>,
        round: u8,
        session: impl Into<SessionId>,
        choice: BallotChoice,
    ) -> Self {
        Self {
            proposal: proposal.into(),
            legislator: legislator.into(),
            round,
            session: session.into(),
            choice,
            cast_at: current_timestamp(),
        }
    }

    /// The upsert key for this ballot
    pub fn key(&self) -> (ProposalId, LegislatorId, u8) {
        (self.proposal.clone(), self.legislator.clone(), self.round)
    }
}

/// Outcome of one slip in a recorded batch
///
/// `was_update` distinguishes "replaced an existing ballot" from "first
/// ballot this round"; callers may use it to warn about vote changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallotOutcome {
    pub legislator: LegislatorId,
    pub choice: BallotChoice,
    pub was_update: bool,
}
