//! Scripted sitting replay.
//!
//! A sitting script drives the full stack from a TOML file: schedule and
//! open a session, mark presence, record ballot batches, finalize rounds.
//! Votes marked `retroactive` run after the session is concluded and must
//! carry a justification, exercising the audit trail.
//!
//! ```toml
//! session = "2026-03-12-ordinary"
//! presence = ["ana", "bruno", "carla", "davi", "eva"]
//!
//! [[votes]]
//! proposal = "plc-12-2026"
//! application = "simple-majority-vote"
//! round = 1
//! finalize = true
//!
//! [votes.ballots]
//! ana = "yes"
//! bruno = "yes"
//! carla = "no"
//! davi = "abstain"
//! eva = "absent"
//! ```

use anyhow::{Context, Result, bail};
use plenary_application::{
    FinalizeRoundInput, FinalizeRoundUseCase, MarkPresenceInput, MarkPresenceUseCase,
    RecordBallotsInput, RecordBallotsUseCase, SessionCommand, SittingStore,
    TransitionSessionUseCase,
};
use plenary_domain::{Actor, BallotChoice, BallotSlip, SessionState, VoteApplication};
use plenary_infrastructure::{
    ConfigRuleRepository, JsonlAuditLog, MemorySittingStore, RecordingProposalStatus,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

fn default_round() -> u8 {
    1
}

fn default_operator() -> String {
    "operator".to_string()
}

/// One voting round in a sitting script
#[derive(Debug, Deserialize)]
pub struct VoteSection {
    pub proposal: String,
    pub application: String,
    #[serde(default = "default_round")]
    pub round: u8,
    /// Finalize the round after recording the ballots
    #[serde(default)]
    pub finalize: bool,
    /// Record this vote after the session is concluded
    #[serde(default)]
    pub retroactive: bool,
    /// Justification for a retroactive vote
    #[serde(default)]
    pub justification: Option<String>,
    /// legislator -> choice ("yes", "no", "abstain", "absent")
    pub ballots: BTreeMap<String, String>,
}

/// A scripted sitting
#[derive(Debug, Deserialize)]
pub struct SittingScript {
    pub session: String,
    #[serde(default = "default_operator")]
    pub operator: String,
    #[serde(default)]
    pub presence: Vec<String>,
    #[serde(default)]
    pub votes: Vec<VoteSection>,
}

impl SittingScript {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("could not read sitting script {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("invalid sitting script {}", path.display()))
    }
}

/// Replay a sitting script against a fresh in-memory store.
pub async fn run(
    path: &Path,
    audit_log: Option<&Path>,
    rules: ConfigRuleRepository,
) -> Result<()> {
    let script = SittingScript::from_path(path)?;

    // === Dependency Injection ===
    let mut store = MemorySittingStore::new();
    if let Some(audit_path) = audit_log {
        let Some(log) = JsonlAuditLog::open(audit_path) else {
            bail!("could not open audit log {}", audit_path.display());
        };
        store = store.with_audit_mirror(Arc::new(log));
    }
    let store = Arc::new(store);
    let rules = Arc::new(rules);
    let proposals = Arc::new(RecordingProposalStatus::new());

    let sessions = TransitionSessionUseCase::new(store.clone());
    let presence = MarkPresenceUseCase::new(store.clone());
    let ballots = RecordBallotsUseCase::new(store.clone());
    let finalize = FinalizeRoundUseCase::new(store.clone(), rules, proposals.clone());

    let operator = Actor::new(script.operator.clone());
    let session_id = script.session.clone();

    println!();
    println!("Sitting {}", session_id);

    sessions
        .schedule(session_id.as_str(), plenary_domain::util::current_timestamp())
        .await?;
    sessions
        .execute(&session_id.as_str().into(), SessionCommand::Open)
        .await?;

    for legislator in &script.presence {
        presence
            .execute(MarkPresenceInput::new(
                session_id.as_str(),
                legislator.as_str(),
                true,
                operator.clone(),
            ))
            .await?;
    }
    println!("Present: {}", script.presence.len());

    for vote in &script.votes {
        let application: VoteApplication = match vote.application.parse() {
            Ok(a) => a,
            Err(e) => bail!("{}", e),
        };

        // Retroactive votes run against the concluded session
        if vote.retroactive {
            let state = store
                .session(&session_id.as_str().into())
                .await?
                .map(|s| s.state());
            if state == Some(SessionState::InProgress) {
                sessions
                    .execute(&session_id.as_str().into(), SessionCommand::Conclude)
                    .await?;
                println!();
                println!("Session concluded; remaining votes are retroactive");
            }
        }

        let mut slips = Vec::with_capacity(vote.ballots.len());
        for (legislator, choice) in &vote.ballots {
            let choice: BallotChoice = match choice.parse() {
                Ok(c) => c,
                Err(e) => bail!("{}", e),
            };
            slips.push(BallotSlip::new(legislator.as_str(), choice));
        }

        let actor = if vote.retroactive {
            operator.clone().with_retroactive_grant()
        } else {
            operator.clone()
        };

        let mut input = RecordBallotsInput::new(
            session_id.as_str(),
            vote.proposal.as_str(),
            vote.round,
            slips,
            actor.clone(),
        );
        if let Some(justification) = &vote.justification {
            input = input.with_justification(justification.clone());
        }
        let outcomes = ballots.execute(input).await?;

        let changed = outcomes.iter().filter(|o| o.was_update).count();
        println!();
        println!(
            "Proposal {} round {}: {} ballots recorded ({} changed)",
            vote.proposal,
            vote.round,
            outcomes.len(),
            changed
        );

        if vote.finalize {
            let mut input = FinalizeRoundInput::new(
                session_id.as_str(),
                vote.proposal.as_str(),
                vote.round,
                application,
                actor,
            );
            if let Some(justification) = &vote.justification {
                input = input.with_retroactive_note(justification.clone());
            }
            let output = finalize.execute(input).await?;
            println!(
                "  {} - {} (revision {})",
                output.verdict.message, output.verdict.detail, output.aggregation.revision
            );
        }
    }

    // Conclude an unconcluded sitting so the record is terminal
    let state = store
        .session(&session_id.as_str().into())
        .await?
        .map(|s| s.state());
    if state == Some(SessionState::InProgress) {
        sessions
            .execute(&session_id.as_str().into(), SessionCommand::Conclude)
            .await?;
    }

    let audit = store.audit_entries(&session_id.as_str().into()).await?;
    println!();
    println!("Outcomes signaled: {}", proposals.outcomes().await.len());
    println!("Audit entries:     {}", audit.len());

    Ok(())
}
