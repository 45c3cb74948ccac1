//! Quorum rule configuration
//!
//! Rules are looked up by the application they govern (session opening,
//! simple-majority vote, veto override, ...). Exactly one rule is bound
//! per application at a time; the repository enforces that, this module
//! only models the rule itself.

use serde::{Deserialize, Serialize};

/// Numeric quorum formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuorumType {
    /// More yes than against votes
    SimpleMajority,
    /// yes >= floor(base / 2) + 1
    AbsoluteMajority,
    /// yes >= ceil(base * 2 / 3)
    TwoThirds,
    /// yes >= ceil(base * 3 / 5)
    ThreeFifths,
    /// Every present member voted yes
    Unanimity,
}

impl QuorumType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuorumType::SimpleMajority => "simple-majority",
            QuorumType::AbsoluteMajority => "absolute-majority",
            QuorumType::TwoThirds => "two-thirds",
            QuorumType::ThreeFifths => "three-fifths",
            QuorumType::Unanimity => "unanimity",
        }
    }

    /// Human-readable name used in verdict breakdowns
    pub fn label(&self) -> &'static str {
        match self {
            QuorumType::SimpleMajority => "simple majority",
            QuorumType::AbsoluteMajority => "absolute majority",
            QuorumType::TwoThirds => "two thirds",
            QuorumType::ThreeFifths => "three fifths",
            QuorumType::Unanimity => "unanimity",
        }
    }
}

impl std::fmt::Display for QuorumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for QuorumType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple-majority" | "simple_majority" => Ok(QuorumType::SimpleMajority),
            "absolute-majority" | "absolute_majority" => Ok(QuorumType::AbsoluteMajority),
            "two-thirds" | "two_thirds" => Ok(QuorumType::TwoThirds),
            "three-fifths" | "three_fifths" => Ok(QuorumType::ThreeFifths),
            "unanimity" => Ok(QuorumType::Unanimity),
            _ => Err(format!(
                "Unknown quorum type: {}. Valid: simple-majority, absolute-majority, two-thirds, three-fifths, unanimity",
                s
            )),
        }
    }
}

/// Which member count thresholds are computed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationBase {
    /// Members marked present in the session
    PresentMembers,
    /// Sitting members of the chamber
    TotalMembers,
    /// Statutory seat count, including vacant seats
    TotalMandates,
}

impl CalculationBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationBase::PresentMembers => "present-members",
            CalculationBase::TotalMembers => "total-members",
            CalculationBase::TotalMandates => "total-mandates",
        }
    }
}

impl std::fmt::Display for CalculationBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CalculationBase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "present-members" | "present_members" => Ok(CalculationBase::PresentMembers),
            "total-members" | "total_members" => Ok(CalculationBase::TotalMembers),
            "total-mandates" | "total_mandates" => Ok(CalculationBase::TotalMandates),
            _ => Err(format!(
                "Unknown calculation base: {}. Valid: present-members, total-members, total-mandates",
                s
            )),
        }
    }
}

/// The voting application a quorum rule is bound to
///
/// A closed enumeration: unknown application keys are configuration
/// errors, never silent defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoteApplication {
    SessionOpening,
    SimpleMajorityVote,
    AbsoluteMajorityVote,
    TwoThirdsVote,
    ThreeFifthsVote,
    UnanimityVote,
    VetoOverride,
    CommitteeVote,
}

impl VoteApplication {
    /// All applications, in rule-listing order
    pub const ALL: [VoteApplication; 8] = [
        VoteApplication::SessionOpening,
        VoteApplication::SimpleMajorityVote,
        VoteApplication::AbsoluteMajorityVote,
        VoteApplication::TwoThirdsVote,
        VoteApplication::ThreeFifthsVote,
        VoteApplication::UnanimityVote,
        VoteApplication::VetoOverride,
        VoteApplication::CommitteeVote,
    ];

    /// The kebab-case key used in configuration files
    pub fn key(&self) -> &'static str {
        match self {
            VoteApplication::SessionOpening => "session-opening",
            VoteApplication::SimpleMajorityVote => "simple-majority-vote",
            VoteApplication::AbsoluteMajorityVote => "absolute-majority-vote",
            VoteApplication::TwoThirdsVote => "two-thirds-vote",
            VoteApplication::ThreeFifthsVote => "three-fifths-vote",
            VoteApplication::UnanimityVote => "unanimity-vote",
            VoteApplication::VetoOverride => "veto-override",
            VoteApplication::CommitteeVote => "committee-vote",
        }
    }
}

impl std::fmt::Display for VoteApplication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for VoteApplication {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|a| a.key() == s.to_lowercase())
            .copied()
            .ok_or_else(|| format!("Unknown voting application: {}", s))
    }
}

/// Chamber sizes used as threshold bases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChamberComposition {
    /// Sitting members
    pub total_members: u32,
    /// Statutory seats, including vacancies
    pub total_mandates: u32,
}

impl ChamberComposition {
    pub fn new(total_members: u32, total_mandates: u32) -> Self {
        Self {
            total_members,
            total_mandates,
        }
    }

    /// The figure a rule's base resolves against, for the non-present bases.
    pub fn total_for(&self, base: CalculationBase) -> u32 {
        match base {
            CalculationBase::TotalMandates => self.total_mandates,
            _ => self.total_members,
        }
    }
}

/// Quorum configuration for one voting application
///
/// The formula in `quorum_type` is primary; `minimum_percentage` and
/// `minimum_count` are independent overrides OR'd with it, each able to
/// flip a rejection to an approval but never the reverse.
///
/// # Example
///
/// ```
/// use plenary_domain::{CalculationBase, QuorumRule, QuorumType, Tally};
///
/// let rule = QuorumRule::new(QuorumType::AbsoluteMajority, CalculationBase::TotalMembers);
/// let verdict = rule.resolve(Tally::new(6, 3, 1), 11, 10);
/// assert!(verdict.approved); // threshold floor(11/2)+1 = 6
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuorumRule {
    pub quorum_type: QuorumType,
    pub base: CalculationBase,
    /// Override: approve when yes votes reach this percentage of the base
    pub minimum_percentage: Option<u8>,
    /// Override: approve when this many raw yes votes are reached
    pub minimum_count: Option<u32>,
    /// Count abstentions as rejecting votes
    pub abstention_counts_against: bool,
    /// Whether the rule requires a named (roll-call) vote
    pub named_vote: bool,
    pub approval_message: Option<String>,
    pub rejection_message: Option<String>,
}

impl QuorumRule {
    pub fn new(quorum_type: QuorumType, base: CalculationBase) -> Self {
        Self {
            quorum_type,
            base,
            minimum_percentage: None,
            minimum_count: None,
            abstention_counts_against: false,
            named_vote: false,
            approval_message: None,
            rejection_message: None,
        }
    }

    pub fn with_minimum_percentage(mut self, percentage: u8) -> Self {
        self.minimum_percentage = Some(percentage);
        self
    }

    pub fn with_minimum_count(mut self, count: u32) -> Self {
        self.minimum_count = Some(count);
        self
    }

    pub fn counting_abstentions_against(mut self) -> Self {
        self.abstention_counts_against = true;
        self
    }

    pub fn named(mut self) -> Self {
        self.named_vote = true;
        self
    }

    pub fn with_messages(
        mut self,
        approval: impl Into<String>,
        rejection: impl Into<String>,
    ) -> Self {
        self.approval_message = Some(approval.into());
        self.rejection_message = Some(rejection.into());
        self
    }

    /// The statutory default rule for an application.
    ///
    /// Used when the configuration file binds nothing for the key.
    pub fn statutory_default(application: VoteApplication) -> Self {
        match application {
            VoteApplication::SessionOpening => Self::new(
                QuorumType::AbsoluteMajority,
                CalculationBase::TotalMembers,
            )
            .with_messages(
                "Opening quorum reached",
                "Opening quorum not reached",
            ),
            VoteApplication::SimpleMajorityVote => {
                Self::new(QuorumType::SimpleMajority, CalculationBase::PresentMembers)
            }
            VoteApplication::AbsoluteMajorityVote => {
                Self::new(QuorumType::AbsoluteMajority, CalculationBase::TotalMembers).named()
            }
            VoteApplication::TwoThirdsVote => {
                Self::new(QuorumType::TwoThirds, CalculationBase::TotalMembers).named()
            }
            VoteApplication::ThreeFifthsVote => {
                Self::new(QuorumType::ThreeFifths, CalculationBase::TotalMembers).named()
            }
            VoteApplication::UnanimityVote => {
                Self::new(QuorumType::Unanimity, CalculationBase::PresentMembers)
            }
            VoteApplication::VetoOverride => {
                Self::new(QuorumType::AbsoluteMajority, CalculationBase::TotalMembers).named()
            }
            VoteApplication::CommitteeVote => {
                Self::new(QuorumType::SimpleMajority, CalculationBase::PresentMembers)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quorum_type_parse() {
        assert_eq!(
            "absolute-majority".parse::<QuorumType>().ok(),
            Some(QuorumType::AbsoluteMajority)
        );
        assert_eq!(
            "two_thirds".parse::<QuorumType>().ok(),
            Some(QuorumType::TwoThirds)
        );
        assert!("plurality".parse::<QuorumType>().is_err());
    }

    #[test]
    fn test_application_key_round_trip() {
        for application in VoteApplication::ALL {
            let parsed: VoteApplication = application.key().parse().unwrap();
            assert_eq!(parsed, application);
        }
        assert!("secret-vote".parse::<VoteApplication>().is_err());
    }

    #[test]
    fn test_chamber_total_for() {
        let chamber = ChamberComposition::new(19, 21);
        assert_eq!(chamber.total_for(CalculationBase::TotalMembers), 19);
        assert_eq!(chamber.total_for(CalculationBase::TotalMandates), 21);
        assert_eq!(chamber.total_for(CalculationBase::PresentMembers), 19);
    }

    #[test]
    fn test_statutory_defaults_cover_every_application() {
        for application in VoteApplication::ALL {
            // Must not panic; named votes are required for qualified majorities
            let rule = QuorumRule::statutory_default(application);
            if matches!(
                application,
                VoteApplication::TwoThirdsVote | VoteApplication::ThreeFifthsVote
            ) {
                assert!(rule.named_vote);
            }
        }
    }
}
