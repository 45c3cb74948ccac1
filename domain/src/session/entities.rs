//! Session domain entities

use crate::core::error::DomainError;
use crate::core::ids::SessionId;
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a plenary session
///
/// `Scheduled -> InProgress -> Concluded`, with `Cancelled` reachable from
/// `Scheduled` or `InProgress`. `Concluded` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Scheduled,
    InProgress,
    Concluded,
    Cancelled,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Scheduled => "scheduled",
            SessionState::InProgress => "in_progress",
            SessionState::Concluded => "concluded",
            SessionState::Cancelled => "cancelled",
        }
    }

    /// Check if this state admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Concluded | SessionState::Cancelled)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A sitting of the legislative body (Entity)
///
/// The session owns its lifecycle state and answers whether vote and
/// presence mutations are currently legal. Once `Concluded`, the session
/// never returns to `InProgress`; mutations against a concluded session run
/// in *retroactive* mode and must be audit-trailed by the caller.
///
/// # Example
///
/// ```
/// use plenary_domain::Session;
///
/// let mut session = Session::schedule("2026-03-12-ordinary", 1773500400000);
/// assert!(!session.can_record_vote());
///
/// session.open().unwrap();
/// assert!(session.can_record_vote());
/// assert!(!session.is_retroactive());
///
/// session.conclude().unwrap();
/// assert!(session.can_record_vote());
/// assert!(session.is_retroactive());
/// assert!(session.open().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    state: SessionState,
    scheduled_at: u64,
    opened_at: Option<u64>,
    closed_at: Option<u64>,
}

impl Session {
    /// Create a session in the `Scheduled` state.
    ///
    /// `scheduled_at` is the planned sitting time in epoch milliseconds.
    pub fn schedule(id: impl Into<SessionId>, scheduled_at: u64) -> Self {
        Self {
            id: id.into(),
            state: SessionState::Scheduled,
            scheduled_at,
            opened_at: None,
            closed_at: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn scheduled_at(&self) -> u64 {
        self.scheduled_at
    }

    pub fn opened_at(&self) -> Option<u64> {
        self.opened_at
    }

    /// Conclusion or cancellation time, if the session is terminal.
    pub fn closed_at(&self) -> Option<u64> {
        self.closed_at
    }

    /// Open the sitting: `Scheduled -> InProgress`.
    pub fn open(&mut self) -> Result<(), DomainError> {
        self.transition(SessionState::InProgress)?;
        self.opened_at = Some(current_timestamp());
        Ok(())
    }

    /// Conclude the sitting: `InProgress -> Concluded`. One-way.
    pub fn conclude(&mut self) -> Result<(), DomainError> {
        self.transition(SessionState::Concluded)?;
        self.closed_at = Some(current_timestamp());
        Ok(())
    }

    /// Cancel the sitting from `Scheduled` or `InProgress`.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        self.transition(SessionState::Cancelled)?;
        self.closed_at = Some(current_timestamp());
        Ok(())
    }

    fn transition(&mut self, to: SessionState) -> Result<(), DomainError> {
        let legal = match (self.state, to) {
            (SessionState::Scheduled, SessionState::InProgress) => true,
            (SessionState::InProgress, SessionState::Concluded) => true,
            (SessionState::Scheduled | SessionState::InProgress, SessionState::Cancelled) => true,
            _ => false,
        };

        if !legal {
            return Err(DomainError::IllegalTransition {
                from: self.state,
                to,
            });
        }

        self.state = to;
        Ok(())
    }

    /// Check if vote recording is legal in the current state.
    ///
    /// Legal while `InProgress` (normal mode) and `Concluded` (retroactive
    /// mode); illegal while `Scheduled` or `Cancelled`.
    pub fn can_record_vote(&self) -> bool {
        matches!(
            self.state,
            SessionState::InProgress | SessionState::Concluded
        )
    }

    /// Fail with `InvalidSessionState` unless vote recording is legal.
    pub fn ensure_votable(&self) -> Result<(), DomainError> {
        if self.can_record_vote() {
            Ok(())
        } else {
            Err(DomainError::InvalidSessionState { state: self.state })
        }
    }

    /// Check if mutations are running in retroactive mode.
    ///
    /// True iff the session is `Concluded`. Gates the audit-trail and
    /// mandatory-justification requirements.
    pub fn is_retroactive(&self) -> bool {
        self.state == SessionState::Concluded
    }
}
