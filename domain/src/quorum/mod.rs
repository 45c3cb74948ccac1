//! Quorum rules and resolution
//!
//! A [`QuorumRule`] binds a numeric formula ([`QuorumType`]) to a
//! calculation base and optional overrides, keyed by the voting
//! [`VoteApplication`] it governs. [`QuorumRule::resolve`] turns a tally
//! and member counts into a [`Verdict`] with no side effects.

pub mod resolver;
pub mod rule;

pub use resolver::Verdict;
pub use rule::{CalculationBase, ChamberComposition, QuorumRule, QuorumType, VoteApplication};
