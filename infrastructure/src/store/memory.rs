//! In-memory sitting store.
//!
//! Backs the CLI and tests. Keyed maps give the unique-key upsert
//! semantics the port requires; the composite commit methods hold the
//! write lock for the whole call, so ballots and their audit entry land
//! together or not at all.

use crate::audit::AuditAppend;
use async_trait::async_trait;
use plenary_application::ports::sitting_store::{SittingStore, StoreError};
use plenary_domain::{
    AuditEntry, Ballot, BallotOutcome, LegislatorId, PresenceRecord, PresenceSheet, ProposalId,
    Session, SessionId, VoteAggregation,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct Tables {
    sessions: HashMap<SessionId, Session>,
    presence: HashMap<(SessionId, LegislatorId), PresenceRecord>,
    ballots: HashMap<(ProposalId, LegislatorId, u8), Ballot>,
    aggregations: HashMap<(ProposalId, SessionId, u8), VoteAggregation>,
    audit: Vec<AuditEntry>,
}

/// In-memory implementation of [`SittingStore`]
///
/// Accepted audit entries can additionally be mirrored to a durable sink
/// (e.g. the JSONL log); the mirror is written inside the same critical
/// section as the triggering mutation.
#[derive(Default)]
pub struct MemorySittingStore {
    tables: RwLock<Tables>,
    audit_mirror: Option<Arc<dyn AuditAppend>>,
}

impl MemorySittingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mirror accepted audit entries to a durable sink.
    pub fn with_audit_mirror(mut self, mirror: Arc<dyn AuditAppend>) -> Self {
        self.audit_mirror = Some(mirror);
        self
    }

    fn record_audit(&self, tables: &mut Tables, entry: AuditEntry) {
        if let Some(mirror) = &self.audit_mirror {
            mirror.append(&entry);
        }
        tables.audit.push(entry);
    }
}

#[async_trait]
impl SittingStore for MemorySittingStore {
    async fn session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.tables.read().await.sessions.get(id).cloned())
    }

    async fn save_session(&self, session: Session) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .sessions
            .insert(session.id().clone(), session);
        Ok(())
    }

    async fn presence_sheet(&self, session: &SessionId) -> Result<PresenceSheet, StoreError> {
        let tables = self.tables.read().await;
        let records = tables
            .presence
            .values()
            .filter(|r| &r.session == session)
            .cloned()
            .collect();
        Ok(PresenceSheet::from_records(records))
    }

    async fn upsert_presence(
        &self,
        record: PresenceRecord,
        audit: Option<AuditEntry>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .presence
            .insert((record.session.clone(), record.legislator.clone()), record);
        if let Some(entry) = audit {
            self.record_audit(&mut tables, entry);
        }
        Ok(())
    }

    async fn ballots(&self, proposal: &ProposalId, round: u8) -> Result<Vec<Ballot>, StoreError> {
        let tables = self.tables.read().await;
        let mut ballots: Vec<Ballot> = tables
            .ballots
            .values()
            .filter(|b| &b.proposal == proposal && b.round == round)
            .cloned()
            .collect();
        // Deterministic order for tallies and displays
        ballots.sort_by(|a, b| a.legislator.cmp(&b.legislator));
        Ok(ballots)
    }

    async fn commit_ballots(
        &self,
        ballots: Vec<Ballot>,
        audit: Option<AuditEntry>,
    ) -> Result<Vec<BallotOutcome>, StoreError> {
        let mut tables = self.tables.write().await;
        let mut outcomes = Vec::with_capacity(ballots.len());
        for ballot in ballots {
            let legislator = ballot.legislator.clone();
            let choice = ballot.choice;
            let prior = tables.ballots.insert(ballot.key(), ballot);
            outcomes.push(BallotOutcome {
                legislator,
                choice,
                was_update: prior.is_some(),
            });
        }
        if let Some(entry) = audit {
            self.record_audit(&mut tables, entry);
        }
        debug!(committed = outcomes.len(), "Ballot batch committed");
        Ok(outcomes)
    }

    async fn aggregation(
        &self,
        proposal: &ProposalId,
        session: &SessionId,
        round: u8,
    ) -> Result<Option<VoteAggregation>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .aggregations
            .get(&(proposal.clone(), session.clone(), round))
            .cloned())
    }

    async fn commit_aggregation(
        &self,
        aggregation: VoteAggregation,
        audit: Option<AuditEntry>,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .aggregations
            .insert(aggregation.key(), aggregation);
        if let Some(entry) = audit {
            self.record_audit(&mut tables, entry);
        }
        Ok(())
    }

    async fn audit_entries(&self, session: &SessionId) -> Result<Vec<AuditEntry>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .audit
            .iter()
            .filter(|e| &e.session == session)
            .cloned()
            .collect())
    }
}
