//! Finalize Round use case
//!
//! Aggregates the ballots of a voting round into the at-most-once
//! aggregation record: tallies, resolves the quorum rule bound to the
//! proposal's application, persists the aggregation, and signals the
//! proposal-status collaborator.

use crate::ports::proposal_status::ProposalStatusPort;
use crate::ports::rule_repository::QuorumRuleRepository;
use crate::ports::sitting_store::{SittingStore, StoreError};
use crate::use_cases::shared::retroactive_justification;
use plenary_domain::{
    Actor, AuditAction, AuditEntry, DomainError, ProposalId, RoundOutcome, SessionId, Tally,
    Verdict, VoteAggregation, VoteApplication,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while finalizing a round
#[derive(Error, Debug)]
pub enum FinalizeRoundError {
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for the FinalizeRound use case
#[derive(Debug, Clone)]
pub struct FinalizeRoundInput {
    pub session: SessionId,
    pub proposal: ProposalId,
    pub round: u8,
    /// The voting application the proposal is bound to; selects the rule
    pub application: VoteApplication,
    pub actor: Actor,
    /// Required when finalizing against a concluded session
    pub retroactive_note: Option<String>,
}

impl FinalizeRoundInput {
    pub fn new(
        session: impl Into<SessionId>,
        proposal: impl Into<ProposalId>,
        round: u8,
        application: VoteApplication,
        actor: Actor,
    ) -> Self {
        Self {
            session: session.into(),
            proposal: proposal.into(),
            round,
            application,
            actor,
            retroactive_note: None,
        }
    }

    pub fn with_retroactive_note(mut self, note: impl Into<String>) -> Self {
        self.retroactive_note = Some(note.into());
        self
    }
}

/// Result of a successful finalization
#[derive(Debug, Clone)]
pub struct FinalizeRoundOutput {
    pub verdict: Verdict,
    pub tally: Tally,
    pub aggregation: VoteAggregation,
}

/// Use case for finalizing a voting round
pub struct FinalizeRoundUseCase<S, R, P>
where
    S: SittingStore,
    R: QuorumRuleRepository,
    P: ProposalStatusPort,
{
    store: Arc<S>,
    rules: Arc<R>,
    proposals: Arc<P>,
}

impl<S, R, P> FinalizeRoundUseCase<S, R, P>
where
    S: SittingStore,
    R: QuorumRuleRepository,
    P: ProposalStatusPort,
{
    pub fn new(store: Arc<S>, rules: Arc<R>, proposals: Arc<P>) -> Self {
        Self {
            store,
            rules,
            proposals,
        }
    }

    pub async fn execute(
        &self,
        input: FinalizeRoundInput,
    ) -> Result<FinalizeRoundOutput, FinalizeRoundError> {
        let session = self
            .store
            .session(&input.session)
            .await?
            .ok_or_else(|| FinalizeRoundError::SessionNotFound(input.session.clone()))?;

        // Finalization is itself a voting-round operation
        session.ensure_votable()?;

        let retroactive = session.is_retroactive();
        let note = if retroactive {
            Some(retroactive_justification(
                &input.actor,
                input.retroactive_note.as_deref(),
            )?)
        } else {
            None
        };

        let sheet = self.store.presence_sheet(&input.session).await?;
        let present_members = sheet.present_count();

        let ballots = self.store.ballots(&input.proposal, input.round).await?;
        let tally = Tally::from_ballots(&ballots);

        // Enough ballots must be cast to reach quorum at all: a simple
        // majority of the members present.
        let required = present_members / 2 + 1;
        if tally.votes_cast() < required {
            return Err(DomainError::InsufficientQuorumToClose {
                votes_cast: tally.votes_cast(),
                required,
            }
            .into());
        }

        let rule = self
            .rules
            .rule_for(input.application)
            .await?
            .ok_or(DomainError::UnknownQuorumRule {
                application: input.application,
            })?;

        let chamber = self.rules.chamber().await?;
        let total_members = chamber.total_for(rule.base);

        let verdict = rule.resolve(tally, total_members, present_members);
        let outcome = RoundOutcome::from_approved(verdict.approved);

        let prior = self
            .store
            .aggregation(&input.proposal, &input.session, input.round)
            .await?;

        let mut aggregation = VoteAggregation::new(
            input.proposal.clone(),
            input.session.clone(),
            input.round,
            tally,
            outcome,
            rule.quorum_type,
            input.actor.id(),
        );
        if let Some(prior) = &prior {
            aggregation = aggregation.superseding(prior);
        }
        if let Some(note) = &note {
            aggregation = aggregation.with_retroactive_note(note.clone());
        }

        let audit = match note {
            Some(note) => Some(
                AuditEntry::new(
                    input.actor.id(),
                    input.session.clone(),
                    AuditAction::RetroactiveAggregation {
                        proposal: input.proposal.clone(),
                        round: input.round,
                        superseded_revision: prior.as_ref().map(|p| p.revision),
                    },
                    note,
                )
                .with_snapshots(
                    prior.as_ref().and_then(|p| serde_json::to_value(p).ok()),
                    serde_json::to_value(&aggregation).ok(),
                ),
            ),
            None => None,
        };

        self.store
            .commit_aggregation(aggregation.clone(), audit)
            .await?;

        info!(
            proposal = %input.proposal,
            round = input.round,
            approved = verdict.approved,
            revision = aggregation.revision,
            "Voting round finalized"
        );

        self.proposals
            .apply_vote_outcome(&input.proposal, outcome)
            .await?;

        debug!(proposal = %input.proposal, outcome = %outcome, "Proposal status signaled");

        Ok(FinalizeRoundOutput {
            verdict,
            tally,
            aggregation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{
        concluded_session, open_session, MemoryStore, RecordingProposalStatus, StaticRules,
    };
    use plenary_domain::{Ballot, BallotChoice, ChamberComposition};

    fn harness(
        chamber: ChamberComposition,
    ) -> (
        Arc<MemoryStore>,
        Arc<StaticRules>,
        Arc<RecordingProposalStatus>,
        FinalizeRoundUseCase<MemoryStore, StaticRules, RecordingProposalStatus>,
    ) {
        let store = Arc::new(MemoryStore::default());
        let rules = Arc::new(StaticRules::statutory(chamber));
        let proposals = Arc::new(RecordingProposalStatus::default());
        let use_case =
            FinalizeRoundUseCase::new(store.clone(), rules.clone(), proposals.clone());
        (store, rules, proposals, use_case)
    }

    async fn seed_round(store: &MemoryStore, choices: &[(&str, BallotChoice)]) {
        store.seed_session(open_session("s-1")).await;
        let names: Vec<&str> = choices.iter().map(|(n, _)| *n).collect();
        store.seed_presence("s-1", &names).await;
        for (name, choice) in choices {
            store
                .seed_ballot(Ballot::new("plc-12", *name, 1, "s-1", *choice))
                .await;
        }
    }

    #[tokio::test]
    async fn test_finalize_approves_absolute_majority() {
        let (store, _, proposals, use_case) = harness(ChamberComposition::new(11, 11));
        seed_round(
            &store,
            &[
                ("a", BallotChoice::Yes),
                ("b", BallotChoice::Yes),
                ("c", BallotChoice::Yes),
                ("d", BallotChoice::Yes),
                ("e", BallotChoice::Yes),
                ("f", BallotChoice::Yes),
                ("g", BallotChoice::No),
                ("h", BallotChoice::No),
                ("i", BallotChoice::No),
                ("j", BallotChoice::Abstain),
            ],
        )
        .await;

        let output = use_case
            .execute(FinalizeRoundInput::new(
                "s-1",
                "plc-12",
                1,
                VoteApplication::AbsoluteMajorityVote,
                Actor::new("pres"),
            ))
            .await
            .unwrap();

        // threshold floor(11/2)+1 = 6
        assert!(output.verdict.approved);
        assert_eq!(output.tally, Tally::new(6, 3, 1));
        assert_eq!(output.aggregation.revision, 1);
        assert_eq!(
            proposals.outcomes().await,
            vec![("plc-12".into(), RoundOutcome::Approved)]
        );
    }

    #[tokio::test]
    async fn test_insufficient_quorum_to_close() {
        let (store, _, proposals, use_case) = harness(ChamberComposition::new(11, 11));
        store.seed_session(open_session("s-1")).await;
        store
            .seed_presence("s-1", &["a", "b", "c", "d", "e", "f", "g"])
            .await;
        // Only 3 of 7 present voted; closing needs floor(7/2)+1 = 4
        for name in ["a", "b", "c"] {
            store
                .seed_ballot(Ballot::new("plc-12", name, 1, "s-1", BallotChoice::Yes))
                .await;
        }

        let err = use_case
            .execute(FinalizeRoundInput::new(
                "s-1",
                "plc-12",
                1,
                VoteApplication::SimpleMajorityVote,
                Actor::new("pres"),
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FinalizeRoundError::Domain(DomainError::InsufficientQuorumToClose {
                votes_cast: 3,
                required: 4
            })
        ));
        // No mutation on failure
        assert!(store
            .aggregation(&"plc-12".into(), &"s-1".into(), 1)
            .await
            .unwrap()
            .is_none());
        assert!(proposals.outcomes().await.is_empty());
    }

    #[tokio::test]
    async fn test_refinalize_supersedes_with_bumped_revision() {
        let (store, _, proposals, use_case) = harness(ChamberComposition::new(5, 5));
        seed_round(
            &store,
            &[
                ("a", BallotChoice::Yes),
                ("b", BallotChoice::Yes),
                ("c", BallotChoice::No),
            ],
        )
        .await;

        let input = FinalizeRoundInput::new(
            "s-1",
            "plc-12",
            1,
            VoteApplication::SimpleMajorityVote,
            Actor::new("pres"),
        );
        let first = use_case.execute(input.clone()).await.unwrap();
        assert_eq!(first.aggregation.revision, 1);

        // A late ballot arrives, the round is finalized again
        store.seed_presence("s-1", &["a", "b", "c", "d"]).await;
        store
            .seed_ballot(Ballot::new("plc-12", "d", 1, "s-1", BallotChoice::No))
            .await;
        let second = use_case.execute(input).await.unwrap();

        assert_eq!(second.aggregation.revision, 2);
        let stored = store
            .aggregation(&"plc-12".into(), &"s-1".into(), 1)
            .await
            .unwrap()
            .unwrap();
        // Exactly one aggregation per key, reflecting the latest tally
        assert_eq!(stored.revision, 2);
        assert_eq!(stored.tally, Tally::new(2, 2, 0));
        assert_eq!(proposals.outcomes().await.len(), 2);
    }

    #[tokio::test]
    async fn test_retroactive_finalize_requires_note_and_audits() {
        let (store, _, _, use_case) = harness(ChamberComposition::new(5, 5));
        store.seed_session(concluded_session("s-1")).await;
        store.seed_presence("s-1", &["a", "b", "c"]).await;
        for (name, choice) in [
            ("a", BallotChoice::Yes),
            ("b", BallotChoice::Yes),
            ("c", BallotChoice::No),
        ] {
            store
                .seed_ballot(Ballot::new("plc-12", name, 1, "s-1", choice))
                .await;
        }

        let actor = Actor::new("pres").with_retroactive_grant();
        let bare = FinalizeRoundInput::new(
            "s-1",
            "plc-12",
            1,
            VoteApplication::SimpleMajorityVote,
            actor.clone(),
        );
        let err = use_case.execute(bare.clone()).await.unwrap_err();
        assert!(matches!(
            err,
            FinalizeRoundError::Domain(DomainError::MissingRetroactiveJustification)
        ));

        let output = use_case
            .execute(bare.with_retroactive_note("session minutes approved late"))
            .await
            .unwrap();
        assert_eq!(
            output.aggregation.retroactive_note.as_deref(),
            Some("session minutes approved late")
        );
        assert_eq!(store.audit_count("s-1").await, 1);
    }

    #[tokio::test]
    async fn test_unknown_rule_is_an_error() {
        let store = Arc::new(MemoryStore::default());
        let rules = Arc::new(StaticRules::empty(ChamberComposition::new(5, 5)));
        let proposals = Arc::new(RecordingProposalStatus::default());
        let use_case = FinalizeRoundUseCase::new(store.clone(), rules, proposals);

        seed_round(
            &store,
            &[("a", BallotChoice::Yes), ("b", BallotChoice::Yes)],
        )
        .await;

        let err = use_case
            .execute(FinalizeRoundInput::new(
                "s-1",
                "plc-12",
                1,
                VoteApplication::VetoOverride,
                Actor::new("pres"),
            ))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FinalizeRoundError::Domain(DomainError::UnknownQuorumRule {
                application: VoteApplication::VetoOverride
            })
        ));
    }
}
