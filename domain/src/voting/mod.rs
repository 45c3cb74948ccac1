//! Ballots, tallies, and vote aggregations
//!
//! One [`ballot::Ballot`] per (proposal, legislator, round); re-submission
//! replaces the prior choice. A [`tally::Tally`] snapshots the counts, and
//! a [`aggregation::VoteAggregation`] is the at-most-once record of the
//! resolved outcome for a (proposal, session, round).

pub mod aggregation;
pub mod ballot;
pub mod tally;

pub use aggregation::{RoundOutcome, VoteAggregation};
pub use ballot::{Ballot, BallotChoice, BallotOutcome, BallotSlip};
pub use tally::Tally;
