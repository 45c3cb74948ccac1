//! Quorum resolution
//!
//! [`QuorumRule::resolve`] is the pure core of the voting engine: no I/O,
//! no clock, integer arithmetic only. Thresholds use exact ceiling/floor
//! math so a one-vote margin never depends on float rounding.

use super::rule::{CalculationBase, QuorumRule, QuorumType};
use crate::voting::tally::Tally;
use serde::{Deserialize, Serialize};

/// Result of resolving a quorum rule against a tally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub approved: bool,
    /// The rule's configured template, or a generic fallback
    pub message: String,
    /// Breakdown of the numbers the verdict rests on
    pub detail: String,
}

impl Verdict {
    pub fn is_approved(&self) -> bool {
        self.approved
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.detail)
    }
}

/// ceil(base * num / den) without leaving integer arithmetic
fn ceil_ratio(base: u32, num: u32, den: u32) -> u32 {
    let n = u64::from(base) * u64::from(num);
    ((n + u64::from(den) - 1) / u64::from(den)) as u32
}

impl QuorumRule {
    /// Resolve this rule against a tally.
    ///
    /// `total_members` is the eligible-member figure for the rule's base
    /// (`TotalMembers` and `TotalMandates` both resolve against it);
    /// `present_members` is the session's presence count.
    ///
    /// The quorum-type formula decides first; the minimum-percentage and
    /// minimum-count overrides are then OR'd in, each able to turn a
    /// rejection into an approval but never the reverse.
    ///
    /// # Example
    ///
    /// ```
    /// use plenary_domain::{CalculationBase, QuorumRule, QuorumType, Tally};
    ///
    /// let rule = QuorumRule::new(QuorumType::TwoThirds, CalculationBase::TotalMembers);
    /// let verdict = rule.resolve(Tally::new(5, 4, 0), 9, 9);
    /// assert!(!verdict.approved); // threshold ceil(9 * 2 / 3) = 6
    /// ```
    pub fn resolve(&self, tally: Tally, total_members: u32, present_members: u32) -> Verdict {
        let base = match self.base {
            CalculationBase::PresentMembers => present_members,
            CalculationBase::TotalMembers | CalculationBase::TotalMandates => total_members,
        };

        let against = tally.no
            + if self.abstention_counts_against {
                tally.abstain
            } else {
                0
            };

        let formula_approved = base > 0
            && match self.quorum_type {
                QuorumType::SimpleMajority => tally.yes > against,
                QuorumType::AbsoluteMajority => tally.yes >= base / 2 + 1,
                QuorumType::TwoThirds => tally.yes >= ceil_ratio(base, 2, 3),
                QuorumType::ThreeFifths => tally.yes >= ceil_ratio(base, 3, 5),
                QuorumType::Unanimity => {
                    tally.yes == present_members && tally.no == 0 && tally.abstain == 0
                }
            };

        // Overrides are evaluated independently of the formula and of each
        // other; they only ever add approvals.
        let percentage_override = self
            .minimum_percentage
            .is_some_and(|pct| base > 0 && tally.yes >= ceil_ratio(base, u32::from(pct), 100));
        let count_override = self.minimum_count.is_some_and(|count| tally.yes >= count);

        let approved = formula_approved || percentage_override || count_override;

        Verdict {
            approved,
            message: self.verdict_message(approved),
            detail: self.verdict_detail(tally, base, against),
        }
    }

    fn verdict_message(&self, approved: bool) -> String {
        if approved {
            self.approval_message
                .clone()
                .unwrap_or_else(|| "Approved".to_string())
        } else {
            self.rejection_message
                .clone()
                .unwrap_or_else(|| "Rejected by insufficient quorum".to_string())
        }
    }

    fn verdict_detail(&self, tally: Tally, base: u32, against: u32) -> String {
        match self.quorum_type {
            QuorumType::SimpleMajority => format!(
                "{} in favor vs {} against ({})",
                tally.yes,
                against,
                self.quorum_type.label()
            ),
            QuorumType::AbsoluteMajority => format!(
                "{} in favor, threshold {} of {} ({})",
                tally.yes,
                base / 2 + 1,
                base,
                self.quorum_type.label()
            ),
            QuorumType::TwoThirds => format!(
                "{} in favor, threshold {} of {} ({})",
                tally.yes,
                ceil_ratio(base, 2, 3),
                base,
                self.quorum_type.label()
            ),
            QuorumType::ThreeFifths => format!(
                "{} in favor, threshold {} of {} ({})",
                tally.yes,
                ceil_ratio(base, 3, 5),
                base,
                self.quorum_type.label()
            ),
            QuorumType::Unanimity => format!(
                "{} in favor of {} voting ({})",
                tally.yes,
                tally.votes_cast(),
                self.quorum_type.label()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(quorum_type: QuorumType, base: CalculationBase) -> QuorumRule {
        QuorumRule::new(quorum_type, base)
    }

    #[test]
    fn test_simple_majority() {
        let r = rule(QuorumType::SimpleMajority, CalculationBase::PresentMembers);
        assert!(r.resolve(Tally::new(7, 3, 0), 11, 10).approved);
        assert!(!r.resolve(Tally::new(3, 3, 4), 11, 10).approved);
        // Abstentions do not count against by default
        assert!(r.resolve(Tally::new(2, 1, 7), 11, 10).approved);
    }

    #[test]
    fn test_simple_majority_abstentions_against() {
        let r = rule(QuorumType::SimpleMajority, CalculationBase::PresentMembers)
            .counting_abstentions_against();
        // against = 1 + 2 = 3; yes(3) > against(3) is false
        let verdict = r.resolve(Tally::new(3, 1, 2), 6, 6);
        assert!(!verdict.approved);
        assert_eq!(verdict.detail, "3 in favor vs 3 against (simple majority)");
    }

    #[test]
    fn test_absolute_majority_threshold() {
        let r = rule(QuorumType::AbsoluteMajority, CalculationBase::TotalMembers);
        // base 11: threshold floor(11/2)+1 = 6
        assert!(r.resolve(Tally::new(6, 3, 1), 11, 10).approved);
        assert!(!r.resolve(Tally::new(5, 3, 2), 11, 10).approved);
        // base 10: threshold 6 as well
        assert!(!r.resolve(Tally::new(5, 5, 0), 10, 10).approved);
        assert!(r.resolve(Tally::new(6, 4, 0), 10, 10).approved);
    }

    #[test]
    fn test_two_thirds_threshold() {
        let r = rule(QuorumType::TwoThirds, CalculationBase::TotalMembers);
        // base 9: threshold ceil(18/3) = 6
        assert!(!r.resolve(Tally::new(5, 4, 0), 9, 9).approved);
        assert!(r.resolve(Tally::new(6, 3, 0), 9, 9).approved);
        // base 10: threshold ceil(20/3) = 7
        assert!(!r.resolve(Tally::new(6, 4, 0), 10, 10).approved);
        assert!(r.resolve(Tally::new(7, 3, 0), 10, 10).approved);
    }

    #[test]
    fn test_three_fifths_threshold() {
        let r = rule(QuorumType::ThreeFifths, CalculationBase::TotalMembers);
        // base 21: threshold ceil(63/5) = 13
        assert!(!r.resolve(Tally::new(12, 9, 0), 21, 21).approved);
        assert!(r.resolve(Tally::new(13, 8, 0), 21, 21).approved);
    }

    #[test]
    fn test_unanimity() {
        let r = rule(QuorumType::Unanimity, CalculationBase::PresentMembers);
        assert!(r.resolve(Tally::new(5, 0, 0), 5, 5).approved);
        // An abstention breaks unanimity even with zero no votes
        assert!(!r.resolve(Tally::new(5, 0, 1), 6, 6).approved);
        assert!(!r.resolve(Tally::new(4, 1, 0), 5, 5).approved);
        // Yes votes must cover every present member
        assert!(!r.resolve(Tally::new(4, 0, 0), 5, 5).approved);
    }

    #[test]
    fn test_percentage_override_flips_rejection() {
        // Absolute majority of 20 needs 11; a 40% floor override approves at 8
        let r = rule(QuorumType::AbsoluteMajority, CalculationBase::TotalMembers)
            .with_minimum_percentage(40);
        assert!(r.resolve(Tally::new(8, 12, 0), 20, 20).approved);
        assert!(!r.resolve(Tally::new(7, 13, 0), 20, 20).approved);
    }

    #[test]
    fn test_count_override_flips_rejection() {
        let r = rule(QuorumType::TwoThirds, CalculationBase::TotalMembers).with_minimum_count(5);
        // threshold ceil(12*2/3)=8, but 5 raw yes votes suffice via override
        assert!(r.resolve(Tally::new(5, 7, 0), 12, 12).approved);
        assert!(!r.resolve(Tally::new(4, 8, 0), 12, 12).approved);
    }

    #[test]
    fn test_overrides_never_reject_an_approval() {
        let r = rule(QuorumType::SimpleMajority, CalculationBase::PresentMembers)
            .with_minimum_percentage(90)
            .with_minimum_count(50);
        // Formula approves; unreached overrides must not revoke it
        assert!(r.resolve(Tally::new(6, 4, 0), 10, 10).approved);
    }

    #[test]
    fn test_empty_base_rejects() {
        let r = rule(QuorumType::AbsoluteMajority, CalculationBase::PresentMembers);
        assert!(!r.resolve(Tally::default(), 0, 0).approved);
    }

    #[test]
    fn test_messages_fall_back_to_generic() {
        let r = rule(QuorumType::SimpleMajority, CalculationBase::PresentMembers);
        assert_eq!(r.resolve(Tally::new(2, 1, 0), 5, 5).message, "Approved");
        assert_eq!(
            r.resolve(Tally::new(1, 2, 0), 5, 5).message,
            "Rejected by insufficient quorum"
        );

        let custom = r.with_messages("Carried", "Fell short");
        assert_eq!(custom.resolve(Tally::new(2, 1, 0), 5, 5).message, "Carried");
        assert_eq!(
            custom.resolve(Tally::new(1, 2, 0), 5, 5).message,
            "Fell short"
        );
    }

    #[test]
    fn test_resolution_is_monotonic_in_yes_votes() {
        // Once approved, adding yes votes (everything else fixed) never
        // flips the verdict back to rejected.
        let rules = [
            rule(QuorumType::SimpleMajority, CalculationBase::PresentMembers),
            rule(QuorumType::AbsoluteMajority, CalculationBase::TotalMembers),
            rule(QuorumType::TwoThirds, CalculationBase::TotalMembers),
            rule(QuorumType::ThreeFifths, CalculationBase::TotalMembers),
        ];
        for r in rules {
            let mut approved_seen = false;
            for yes in 0..=15u32 {
                let verdict = r.resolve(Tally::new(yes, 3, 1), 15, 12);
                if approved_seen {
                    assert!(verdict.approved, "{:?} lost approval at yes={}", r, yes);
                }
                approved_seen |= verdict.approved;
            }
        }
    }

    #[test]
    fn test_ceil_ratio_exactness() {
        assert_eq!(ceil_ratio(9, 2, 3), 6);
        assert_eq!(ceil_ratio(10, 2, 3), 7);
        assert_eq!(ceil_ratio(12, 2, 3), 8);
        assert_eq!(ceil_ratio(21, 3, 5), 13);
        assert_eq!(ceil_ratio(20, 3, 5), 12);
        assert_eq!(ceil_ratio(20, 40, 100), 8);
    }
}
