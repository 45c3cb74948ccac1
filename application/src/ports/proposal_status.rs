//! Proposal-status port.
//!
//! The vote aggregator signals the proposal subsystem after a successful
//! finalization. The proposal's own status state machine is out of scope;
//! this core only delivers the round outcome.

use super::sitting_store::StoreError;
use async_trait::async_trait;
use plenary_domain::{ProposalId, RoundOutcome};

/// Port for the proposal-status collaborator.
#[async_trait]
pub trait ProposalStatusPort: Send + Sync {
    /// Apply a finalized round outcome to the proposal's status.
    async fn apply_vote_outcome(
        &self,
        proposal: &ProposalId,
        outcome: RoundOutcome,
    ) -> Result<(), StoreError>;
}
