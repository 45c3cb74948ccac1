//! Mark Presence use case
//!
//! Idempotent upsert of a legislator's presence mark. Legal in every
//! session state except `Cancelled`; against a concluded session the
//! mark is retroactive and must be justified and audit-trailed.

use crate::ports::sitting_store::{SittingStore, StoreError};
use crate::use_cases::shared::retroactive_justification;
use plenary_domain::{
    Actor, AuditAction, AuditEntry, DomainError, LegislatorId, PresenceRecord, SessionId,
    SessionState,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while marking presence
#[derive(Error, Debug)]
pub enum MarkPresenceError {
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for the MarkPresence use case
#[derive(Debug, Clone)]
pub struct MarkPresenceInput {
    pub session: SessionId,
    pub legislator: LegislatorId,
    pub present: bool,
    /// Absence reason, or the mandatory note in retroactive mode
    pub justification: Option<String>,
    pub actor: Actor,
}

impl MarkPresenceInput {
    pub fn new(
        session: impl Into<SessionId>,
        legislator: impl Into<LegislatorId>,
        present: bool,
        actor: Actor,
    ) -> Self {
        Self {
            session: session.into(),
            legislator: legislator.into(),
            present,
            justification: None,
            actor,
        }
    }

    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }
}

/// Use case for recording a presence mark
pub struct MarkPresenceUseCase<S: SittingStore> {
    store: Arc<S>,
}

impl<S: SittingStore> MarkPresenceUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, input: MarkPresenceInput) -> Result<(), MarkPresenceError> {
        let session = self
            .store
            .session(&input.session)
            .await?
            .ok_or_else(|| MarkPresenceError::SessionNotFound(input.session.clone()))?;

        if session.state() == SessionState::Cancelled {
            return Err(DomainError::InvalidSessionState {
                state: session.state(),
            }
            .into());
        }

        let audit = if session.is_retroactive() {
            let justification =
                retroactive_justification(&input.actor, input.justification.as_deref())?;
            Some(AuditEntry::new(
                input.actor.id(),
                input.session.clone(),
                AuditAction::RetroactivePresence {
                    legislator: input.legislator.clone(),
                },
                justification,
            ))
        } else {
            None
        };

        let mut record = if input.present {
            PresenceRecord::present(input.session.clone(), input.legislator.clone())
        } else {
            PresenceRecord::absent(input.session.clone(), input.legislator.clone())
        };
        if let Some(justification) = &input.justification {
            record = record.with_justification(justification.clone());
        }

        self.store.upsert_presence(record, audit).await?;

        debug!(
            session = %input.session,
            legislator = %input.legislator,
            present = input.present,
            "Presence recorded"
        );

        Ok(())
    }
}
