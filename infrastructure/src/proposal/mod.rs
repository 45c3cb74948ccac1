//! Proposal-status adapters.
//!
//! The proposal subsystem lives outside this core; these adapters stand
//! at the boundary. `TracingProposalStatus` logs the signal for
//! deployments where the proposal system is wired elsewhere;
//! `RecordingProposalStatus` captures signals for tests and the CLI
//! summary.

use async_trait::async_trait;
use plenary_application::ports::proposal_status::ProposalStatusPort;
use plenary_application::ports::sitting_store::StoreError;
use plenary_domain::{ProposalId, RoundOutcome};
use tokio::sync::Mutex;
use tracing::info;

/// Adapter that logs each outcome signal
#[derive(Default)]
pub struct TracingProposalStatus;

#[async_trait]
impl ProposalStatusPort for TracingProposalStatus {
    async fn apply_vote_outcome(
        &self,
        proposal: &ProposalId,
        outcome: RoundOutcome,
    ) -> Result<(), StoreError> {
        info!(proposal = %proposal, outcome = %outcome, "Vote outcome applied to proposal");
        Ok(())
    }
}

/// Adapter that records every outcome signal
#[derive(Default)]
pub struct RecordingProposalStatus {
    outcomes: Mutex<Vec<(ProposalId, RoundOutcome)>>,
}

impl RecordingProposalStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn outcomes(&self) -> Vec<(ProposalId, RoundOutcome)> {
        self.outcomes.lock().await.clone()
    }
}

#[async_trait]
impl ProposalStatusPort for RecordingProposalStatus {
    async fn apply_vote_outcome(
        &self,
        proposal: &ProposalId,
        outcome: RoundOutcome,
    ) -> Result<(), StoreError> {
        self.outcomes
            .lock()
            .await
            .push((proposal.clone(), outcome));
        Ok(())
    }
}
