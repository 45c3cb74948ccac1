//! Vote tally for a (proposal, round)

use super::ballot::{Ballot, BallotChoice};
use serde::{Deserialize, Serialize};

/// Yes/no/abstain counts for one voting round
///
/// # Example
///
/// ```
/// use plenary_domain::Tally;
///
/// let tally = Tally::new(6, 3, 1);
/// assert_eq!(tally.votes_cast(), 10);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: u32,
    pub no: u32,
    pub abstain: u32,
}

impl Tally {
    pub fn new(yes: u32, no: u32, abstain: u32) -> Self {
        Self { yes, no, abstain }
    }

    /// Count the persisted ballots of a round.
    pub fn from_ballots(ballots: &[Ballot]) -> Self {
        let mut tally = Self::default();
        for ballot in ballots {
            tally.record(ballot.choice);
        }
        tally
    }

    /// Add one choice to the counts. `Absent` is ignored.
    pub fn record(&mut self, choice: BallotChoice) {
        match choice {
            BallotChoice::Yes => self.yes += 1,
            BallotChoice::No => self.no += 1,
            BallotChoice::Abstain => self.abstain += 1,
            BallotChoice::Absent => {}
        }
    }

    /// Total ballots cast (yes + no + abstain)
    pub fn votes_cast(&self) -> u32 {
        self.yes + self.no + self.abstain
    }
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} yes / {} no / {} abstain",
            self.yes, self.no, self.abstain
        )
    }
}
