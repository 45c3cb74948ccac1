//! Domain layer for plenary
//!
//! This crate contains the core business logic of the legislative voting
//! and quorum resolution engine. It has no dependencies on infrastructure
//! or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Session lifecycle
//!
//! A plenary [`Session`] moves through `Scheduled -> InProgress -> Concluded`,
//! with `Cancelled` reachable before conclusion. Votes are legal while the
//! session is in progress, and again after conclusion in *retroactive* mode,
//! where every mutation is audit-trailed.
//!
//! ## Quorum resolution
//!
//! A [`QuorumRule`] binds a [`QuorumType`] formula to a calculation base and
//! optional overrides. [`QuorumRule::resolve`] is a pure function from a
//! [`Tally`] and member counts to a [`Verdict`].

pub mod audit;
pub mod core;
pub mod presence;
pub mod quorum;
pub mod session;
pub mod util;
pub mod voting;

// Re-export commonly used types
pub use audit::{AuditAction, AuditEntry};
pub use core::{
    actor::Actor,
    error::DomainError,
    ids::{LegislatorId, ProposalId, SessionId},
};
pub use presence::{PresenceRecord, PresenceSheet};
pub use quorum::{
    CalculationBase, ChamberComposition, QuorumRule, QuorumType, Verdict, VoteApplication,
};
pub use session::{Session, SessionState};
pub use voting::{
    aggregation::{RoundOutcome, VoteAggregation},
    ballot::{Ballot, BallotChoice, BallotOutcome, BallotSlip},
    tally::Tally,
};
