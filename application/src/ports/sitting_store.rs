//! Persistence port for sessions, presence, ballots, and aggregations.
//!
//! The store owns the transaction boundary: the composite commit methods
//! accept the optional audit entry alongside the mutation so that a
//! ballots-persisted-but-audit-lost state cannot be expressed. Unique-key
//! upserts serialize concurrent writers to last-committed-wins.

use async_trait::async_trait;
use plenary_domain::{
    AuditEntry, Ballot, BallotOutcome, PresenceRecord, PresenceSheet, ProposalId, Session,
    SessionId, VoteAggregation,
};
use thiserror::Error;

/// Errors surfaced by the persistence collaborator
///
/// Backend failures are propagated unchanged to the caller, who owns
/// retry policy; the core never retries.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    #[error("Storage backend failure: {0}")]
    Backend(String),
}

/// Port for the persistence collaborator.
///
/// Requirements on implementations:
/// - `commit_ballots` and `commit_aggregation` are atomic: either every
///   write in the call (including the audit entry) is applied, or none is.
/// - Ballots upsert on (proposal, legislator, round); aggregations upsert
///   on (proposal, session, round). The latest committed write wins.
#[async_trait]
pub trait SittingStore: Send + Sync {
    /// Fetch a session by id.
    async fn session(&self, id: &SessionId) -> Result<Option<Session>, StoreError>;

    /// Create or replace a session record.
    async fn save_session(&self, session: Session) -> Result<(), StoreError>;

    /// The presence sheet of a session (empty if nothing recorded).
    async fn presence_sheet(&self, session: &SessionId) -> Result<PresenceSheet, StoreError>;

    /// Upsert one presence record, appending the audit entry (if any) in
    /// the same transaction.
    async fn upsert_presence(
        &self,
        record: PresenceRecord,
        audit: Option<AuditEntry>,
    ) -> Result<(), StoreError>;

    /// All persisted ballots of a (proposal, round).
    async fn ballots(&self, proposal: &ProposalId, round: u8) -> Result<Vec<Ballot>, StoreError>;

    /// Upsert a batch of ballots atomically, appending the audit entry (if
    /// any) in the same transaction.
    ///
    /// Returns one outcome per ballot, in input order, with `was_update`
    /// set when a prior ballot existed for the key.
    async fn commit_ballots(
        &self,
        ballots: Vec<Ballot>,
        audit: Option<AuditEntry>,
    ) -> Result<Vec<BallotOutcome>, StoreError>;

    /// Fetch the aggregation for a (proposal, session, round), if any.
    async fn aggregation(
        &self,
        proposal: &ProposalId,
        session: &SessionId,
        round: u8,
    ) -> Result<Option<VoteAggregation>, StoreError>;

    /// Upsert the aggregation for its key, appending the audit entry (if
    /// any) in the same transaction.
    async fn commit_aggregation(
        &self,
        aggregation: VoteAggregation,
        audit: Option<AuditEntry>,
    ) -> Result<(), StoreError>;

    /// Audit entries recorded against a session, oldest first.
    async fn audit_entries(&self, session: &SessionId) -> Result<Vec<AuditEntry>, StoreError>;
}
