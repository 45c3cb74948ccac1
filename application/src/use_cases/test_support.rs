//! In-memory test doubles for the collaborator ports.

use crate::ports::proposal_status::ProposalStatusPort;
use crate::ports::rule_repository::QuorumRuleRepository;
use crate::ports::sitting_store::{SittingStore, StoreError};
use async_trait::async_trait;
use plenary_domain::{
    AuditEntry, Ballot, BallotOutcome, ChamberComposition, LegislatorId, PresenceRecord,
    PresenceSheet, ProposalId, QuorumRule, RoundOutcome, Session, SessionId, VoteAggregation,
    VoteApplication,
};
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
struct StoreState {
    sessions: HashMap<SessionId, Session>,
    presence: HashMap<(SessionId, LegislatorId), PresenceRecord>,
    ballots: HashMap<(ProposalId, LegislatorId, u8), Ballot>,
    aggregations: HashMap<(ProposalId, SessionId, u8), VoteAggregation>,
    audit: Vec<AuditEntry>,
}

/// Minimal store double with the same upsert semantics the port requires.
#[derive(Default)]
pub(crate) struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub(crate) async fn seed_session(&self, session: Session) {
        self.state
            .lock()
            .await
            .sessions
            .insert(session.id().clone(), session);
    }

    pub(crate) async fn seed_presence(&self, session: &str, legislators: &[&str]) {
        let mut state = self.state.lock().await;
        for legislator in legislators {
            let record = PresenceRecord::present(session, *legislator);
            state
                .presence
                .insert((record.session.clone(), record.legislator.clone()), record);
        }
    }

    pub(crate) async fn seed_ballot(&self, ballot: Ballot) {
        self.state.lock().await.ballots.insert(ballot.key(), ballot);
    }

    pub(crate) async fn ballot_count(&self) -> usize {
        self.state.lock().await.ballots.len()
    }

    pub(crate) async fn audit_count(&self, session: &str) -> usize {
        let session: SessionId = session.into();
        self.state
            .lock()
            .await
            .audit
            .iter()
            .filter(|e| e.session == session)
            .count()
    }
}

#[async_trait]
impl SittingStore for MemoryStore {
    async fn session(&self, id: &SessionId) -> Result<Option<Session>, StoreError> {
        Ok(self.state.lock().await.sessions.get(id).cloned())
    }

    async fn save_session(&self, session: Session) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .sessions
            .insert(session.id().clone(), session);
        Ok(())
    }

    async fn presence_sheet(&self, session: &SessionId) -> Result<PresenceSheet, StoreError> {
        let state = self.state.lock().await;
        let records = state
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
        let mut state = self.state.lock().await;
        state
            .presence
            .insert((record.session.clone(), record.legislator.clone()), record);
        if let Some(entry) = audit {
            state.audit.push(entry);
        }
        Ok(())
    }

    async fn ballots(&self, proposal: &ProposalId, round: u8) -> Result<Vec<Ballot>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .ballots
            .values()
            .filter(|b| &b.proposal == proposal && b.round == round)
            .cloned()
            .collect())
    }

    async fn commit_ballots(
        &self,
        ballots: Vec<Ballot>,
        audit: Option<AuditEntry>,
    ) -> Result<Vec<BallotOutcome>, StoreError> {
        let mut state = self.state.lock().await;
        let mut outcomes = Vec::with_capacity(ballots.len());
        for ballot in ballots {
            let legislator = ballot.legislator.clone();
            let choice = ballot.choice;
            let prior = state.ballots.insert(ballot.key(), ballot);
            outcomes.push(BallotOutcome {
                legislator,
                choice,
                was_update: prior.is_some(),
            });
        }
        if let Some(entry) = audit {
            state.audit.push(entry);
        }
        Ok(outcomes)
    }

    async fn aggregation(
        &self,
        proposal: &ProposalId,
        session: &SessionId,
        round: u8,
    ) -> Result<Option<VoteAggregation>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .aggregations
            .get(&(proposal.clone(), session.clone(), round))
            .cloned())
    }

    async fn commit_aggregation(
        &self,
        aggregation: VoteAggregation,
        audit: Option<AuditEntry>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state
            .aggregations
            .insert(aggregation.key(), aggregation);
        if let Some(entry) = audit {
            state.audit.push(entry);
        }
        Ok(())
    }

    async fn audit_entries(&self, session: &SessionId) -> Result<Vec<AuditEntry>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .audit
            .iter()
            .filter(|e| &e.session == session)
            .cloned()
            .collect())
    }
}

/// Fixed rule repository backed by a map.
pub(crate) struct StaticRules {
    rules: HashMap<VoteApplication, QuorumRule>,
    chamber: ChamberComposition,
}

impl StaticRules {
    /// Every application bound to its statutory default.
    pub(crate) fn statutory(chamber: ChamberComposition) -> Self {
        let rules = VoteApplication::ALL
            .into_iter()
            .map(|a| (a, QuorumRule::statutory_default(a)))
            .collect();
        Self { rules, chamber }
    }

    /// No rules bound at all.
    pub(crate) fn empty(chamber: ChamberComposition) -> Self {
        Self {
            rules: HashMap::new(),
            chamber,
        }
    }
}

#[async_trait]
impl QuorumRuleRepository for StaticRules {
    async fn rule_for(
        &self,
        application: VoteApplication,
    ) -> Result<Option<QuorumRule>, StoreError> {
        Ok(self.rules.get(&application).cloned())
    }

    async fn chamber(&self) -> Result<ChamberComposition, StoreError> {
        Ok(self.chamber)
    }
}

/// Proposal-status double that records every signal.
#[derive(Default)]
pub(crate) struct RecordingProposalStatus {
    outcomes: Mutex<Vec<(ProposalId, RoundOutcome)>>,
}

impl RecordingProposalStatus {
    pub(crate) async fn outcomes(&self) -> Vec<(ProposalId, RoundOutcome)> {
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

/// A session opened for business.
pub(crate) fn open_session(id: &str) -> Session {
    let mut session = Session::schedule(id, 0);
    session.open().unwrap();
    session
}

/// A session that has been opened and concluded (retroactive mode).
pub(crate) fn concluded_session(id: &str) -> Session {
    let mut session = open_session(id);
    session.conclude().unwrap();
    session
}
