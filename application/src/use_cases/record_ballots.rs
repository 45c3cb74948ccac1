//! Record Ballots use case
//!
//! Records one or many ballots for a proposal within a voting round,
//! enforcing presence and retroactive-mode preconditions. Batches are
//! all-or-nothing: one failing precondition rejects the whole batch
//! before any write.

use crate::ports::sitting_store::{SittingStore, StoreError};
use crate::use_cases::shared::retroactive_justification;
use plenary_domain::{
    Actor, AuditAction, AuditEntry, Ballot, BallotOutcome, BallotSlip, DomainError, ProposalId,
    SessionId,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while recording ballots
#[derive(Error, Debug)]
pub enum RecordBallotsError {
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for the RecordBallots use case
#[derive(Debug, Clone)]
pub struct RecordBallotsInput {
    pub session: SessionId,
    pub proposal: ProposalId,
    pub round: u8,
    pub slips: Vec<BallotSlip>,
    pub actor: Actor,
    /// Required when the session is concluded (retroactive mode)
    pub justification: Option<String>,
}

impl RecordBallotsInput {
    pub fn new(
        session: impl Into<SessionId>,
        proposal: impl Into<ProposalId>,
        round: u8,
        slips: Vec<BallotSlip>,
        actor: Actor,
    ) -> Self {
        Self {
            session: session.into(),
            proposal: proposal.into(),
            round,
            slips,
            actor,
            justification: None,
        }
    }

    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }
}

/// Use case for recording a batch of ballots
pub struct RecordBallotsUseCase<S: SittingStore> {
    store: Arc<S>,
}

impl<S: SittingStore> RecordBallotsUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Execute the use case.
    ///
    /// Returns one outcome per slip: the persisted ballots first (input
    /// order), then the informational `Absent` slips, which are never
    /// persisted.
    pub async fn execute(
        &self,
        input: RecordBallotsInput,
    ) -> Result<Vec<BallotOutcome>, RecordBallotsError> {
        let session = self
            .store
            .session(&input.session)
            .await?
            .ok_or_else(|| RecordBallotsError::SessionNotFound(input.session.clone()))?;

        session.ensure_votable()?;

        let retroactive = session.is_retroactive();
        let justification = if retroactive {
            Some(retroactive_justification(
                &input.actor,
                input.justification.as_deref(),
            )?)
        } else {
            None
        };

        // Presence precondition for every countable slip. Checked before
        // any write so a failing slip rejects the batch atomically.
        let sheet = self.store.presence_sheet(&input.session).await?;
        for slip in &input.slips {
            if slip.choice.is_countable() && !sheet.is_present(&slip.legislator) {
                return Err(DomainError::LegislatorNotPresent {
                    legislator: slip.legislator.clone(),
                }
                .into());
            }
        }

        let ballots: Vec<Ballot> = input
            .slips
            .iter()
            .filter(|slip| slip.choice.is_countable())
            .map(|slip| {
                Ballot::new(
                    input.proposal.clone(),
                    slip.legislator.clone(),
                    input.round,
                    input.session.clone(),
                    slip.choice,
                )
            })
            .collect();

        let audit = if retroactive {
            let justification = justification.unwrap_or_default();
            info!(
                session = %input.session,
                proposal = %input.proposal,
                round = input.round,
                "Recording retroactive ballot batch"
            );
            Some(
                AuditEntry::new(
                    input.actor.id(),
                    input.session.clone(),
                    AuditAction::RetroactiveBallots {
                        proposal: input.proposal.clone(),
                        round: input.round,
                        ballots: ballots.len() as u32,
                    },
                    justification,
                )
                .with_snapshots(None, serde_json::to_value(&input.slips).ok()),
            )
        } else {
            None
        };

        let mut outcomes = self.store.commit_ballots(ballots, audit).await?;

        // Absent slips are informational only: reported back, never stored.
        outcomes.extend(
            input
                .slips
                .iter()
                .filter(|slip| !slip.choice.is_countable())
                .map(|slip| BallotOutcome {
                    legislator: slip.legislator.clone(),
                    choice: slip.choice,
                    was_update: false,
                }),
        );

        debug!(
            session = %input.session,
            proposal = %input.proposal,
            round = input.round,
            recorded = outcomes.len(),
            "Ballot batch recorded"
        );

        Ok(outcomes)
    }
}
