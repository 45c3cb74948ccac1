//! Domain error types

use crate::core::ids::LegislatorId;
use crate::quorum::VoteApplication;
use crate::session::SessionState;
use thiserror::Error;

/// Domain-level errors
///
/// Every variant is caller-recoverable: the surrounding layer surfaces them
/// as validation messages rather than retrying.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Operation is not legal while the session is {state}")]
    InvalidSessionState { state: SessionState },

    #[error("Illegal session transition: {from} -> {to}")]
    IllegalTransition {
        from: SessionState,
        to: SessionState,
    },

    #[error("Legislator {legislator} is not marked present in this session")]
    LegislatorNotPresent { legislator: LegislatorId },

    #[error("A retroactive mutation requires a non-empty justification")]
    MissingRetroactiveJustification,

    #[error("Actor {actor} is not authorized to perform retroactive mutations")]
    RetroactiveNotAuthorized { actor: String },

    #[error("Only {votes_cast} ballots cast, {required} needed to close the round")]
    InsufficientQuorumToClose { votes_cast: u32, required: u32 },

    #[error("No quorum rule bound for application {application}")]
    UnknownQuorumRule { application: VoteApplication },
}

impl DomainError {
    /// Check if this error is a retroactive-mode gating failure
    pub fn is_retroactive_gating(&self) -> bool {
        matches!(
            self,
            DomainError::MissingRetroactiveJustification
                | DomainError::RetroactiveNotAuthorized { .. }
        )
    }
}
