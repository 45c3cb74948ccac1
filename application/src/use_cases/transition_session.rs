//! Transition Session use case
//!
//! Applies lifecycle commands to a persisted session. The transition
//! rules themselves live on the domain entity; this use case only loads,
//! applies, and saves.

use crate::ports::sitting_store::{SittingStore, StoreError};
use plenary_domain::{DomainError, Session, SessionId, SessionState};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Lifecycle command for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Open,
    Conclude,
    Cancel,
}

impl SessionCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionCommand::Open => "open",
            SessionCommand::Conclude => "conclude",
            SessionCommand::Cancel => "cancel",
        }
    }
}

/// Errors that can occur while transitioning a session
#[derive(Error, Debug)]
pub enum TransitionSessionError {
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Use case for scheduling and transitioning sessions
pub struct TransitionSessionUseCase<S: SittingStore> {
    store: Arc<S>,
}

impl<S: SittingStore> TransitionSessionUseCase<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a session in the `Scheduled` state.
    pub async fn schedule(
        &self,
        id: impl Into<SessionId> + Send,
        scheduled_at: u64,
    ) -> Result<Session, TransitionSessionError> {
        let session = Session::schedule(id, scheduled_at);
        self.store.save_session(session.clone()).await?;
        info!(session = %session.id(), "Session scheduled");
        Ok(session)
    }

    /// Apply a lifecycle command and persist the new state.
    pub async fn execute(
        &self,
        id: &SessionId,
        command: SessionCommand,
    ) -> Result<SessionState, TransitionSessionError> {
        let mut session = self
            .store
            .session(id)
            .await?
            .ok_or_else(|| TransitionSessionError::SessionNotFound(id.clone()))?;

        match command {
            SessionCommand::Open => session.open()?,
            SessionCommand::Conclude => session.conclude()?,
            SessionCommand::Cancel => session.cancel()?,
        }

        let state = session.state();
        self.store.save_session(session).await?;
        info!(session = %id, command = command.as_str(), state = state.as_str(), "Session transitioned");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::MemoryStore;

    #[tokio::test]
    async fn test_schedule_open_conclude() {
        let store = Arc::new(MemoryStore::default());
        let use_case = TransitionSessionUseCase::new(store.clone());

        use_case.schedule("s-1", 100).await.unwrap();
        assert_eq!(
            use_case
                .execute(&"s-1".into(), SessionCommand::Open)
                .await
                .unwrap(),
            SessionState::InProgress
        );
        assert_eq!(
            use_case
                .execute(&"s-1".into(), SessionCommand::Conclude)
                .await
                .unwrap(),
            SessionState::Concluded
        );

        // The persisted session reflects the terminal state
        let session = store.session(&"s-1".into()).await.unwrap().unwrap();
        assert_eq!(session.state(), SessionState::Concluded);
    }

    #[tokio::test]
    async fn test_unconcluding_fails_and_does_not_persist() {
        let store = Arc::new(MemoryStore::default());
        let use_case = TransitionSessionUseCase::new(store.clone());

        use_case.schedule("s-1", 100).await.unwrap();
        use_case
            .execute(&"s-1".into(), SessionCommand::Open)
            .await
            .unwrap();
        use_case
            .execute(&"s-1".into(), SessionCommand::Conclude)
            .await
            .unwrap();

        let err = use_case
            .execute(&"s-1".into(), SessionCommand::Open)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TransitionSessionError::Domain(DomainError::IllegalTransition { .. })
        ));

        let session = store.session(&"s-1".into()).await.unwrap().unwrap();
        assert_eq!(session.state(), SessionState::Concluded);
    }

    #[tokio::test]
    async fn test_missing_session() {
        let store = Arc::new(MemoryStore::default());
        let use_case = TransitionSessionUseCase::new(store);

        let err = use_case
            .execute(&"ghost".into(), SessionCommand::Open)
            .await
            .unwrap_err();
        assert!(matches!(err, TransitionSessionError::SessionNotFound(_)));
    }
}
