//! Quorum rule repository port.

use super::sitting_store::StoreError;
use async_trait::async_trait;
use plenary_domain::{ChamberComposition, QuorumRule, VoteApplication};

/// Port for looking up the quorum rule bound to a voting application.
///
/// At most one rule is bound per application. Absence is reported as
/// `None` and must surface as an `UnknownQuorumRule` error in the caller,
/// never as a silent default.
#[async_trait]
pub trait QuorumRuleRepository: Send + Sync {
    /// The rule currently bound to an application.
    async fn rule_for(
        &self,
        application: VoteApplication,
    ) -> Result<Option<QuorumRule>, StoreError>;

    /// The chamber sizes thresholds are computed against.
    async fn chamber(&self) -> Result<ChamberComposition, StoreError>;
}
