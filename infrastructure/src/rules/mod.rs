//! Config-backed quorum rule repository.
//!
//! Statutory defaults overlaid with the rule tables of the configuration
//! file. Exactly one rule ends up bound per application; unknown
//! application keys in the file are load-time errors, never silently
//! ignored.

use crate::config::{ConfigValidationError, FileConfig};
use async_trait::async_trait;
use plenary_application::ports::rule_repository::QuorumRuleRepository;
use plenary_application::ports::sitting_store::StoreError;
use plenary_domain::{ChamberComposition, QuorumRule, VoteApplication};
use std::collections::HashMap;
use tracing::debug;

/// Quorum rule repository resolved from [`FileConfig`]
pub struct ConfigRuleRepository {
    rules: HashMap<VoteApplication, QuorumRule>,
    chamber: ChamberComposition,
}

impl ConfigRuleRepository {
    /// Every application bound to its statutory default.
    pub fn with_defaults(chamber: ChamberComposition) -> Self {
        let rules = VoteApplication::ALL
            .into_iter()
            .map(|a| (a, QuorumRule::statutory_default(a)))
            .collect();
        Self { rules, chamber }
    }

    /// Statutory defaults overlaid with the file's rule tables.
    pub fn from_config(config: &FileConfig) -> Result<Self, ConfigValidationError> {
        let mut repository = Self::with_defaults(config.chamber.to_chamber());

        for (key, file_rule) in &config.rules {
            let application: VoteApplication = key
                .parse()
                .map_err(|_| ConfigValidationError::UnknownApplication(key.clone()))?;
            let rule = file_rule.to_rule(key)?;
            debug!(application = %application, "Quorum rule overridden from config");
            repository.rules.insert(application, rule);
        }

        Ok(repository)
    }

    /// Iterate the bound rules in application order (for listings).
    pub fn bound_rules(&self) -> impl Iterator<Item = (VoteApplication, &QuorumRule)> {
        VoteApplication::ALL
            .into_iter()
            .filter_map(|a| self.rules.get(&a).map(|r| (a, r)))
    }

    pub fn chamber_composition(&self) -> ChamberComposition {
        self.chamber
    }
}

#[async_trait]
impl QuorumRuleRepository for ConfigRuleRepository {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileRuleConfig;
    use plenary_domain::QuorumType;

    #[tokio::test]
    async fn test_defaults_bind_every_application() {
        let repo = ConfigRuleRepository::with_defaults(ChamberComposition::new(11, 11));
        for application in VoteApplication::ALL {
            assert!(repo.rule_for(application).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_file_rule_overrides_default() {
        let mut config = FileConfig::default();
        config.rules.insert(
            "committee-vote".to_string(),
            FileRuleConfig {
                quorum: "two-thirds".to_string(),
                base: "present-members".to_string(),
                ..Default::default()
            },
        );

        let repo = ConfigRuleRepository::from_config(&config).unwrap();
        let rule = repo
            .rule_for(VoteApplication::CommitteeVote)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(rule.quorum_type, QuorumType::TwoThirds);

        // Untouched applications keep their statutory default
        let simple = repo
            .rule_for(VoteApplication::SimpleMajorityVote)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(simple.quorum_type, QuorumType::SimpleMajority);
    }

    #[test]
    fn test_unknown_application_key_fails_loading() {
        let mut config = FileConfig::default();
        config
            .rules
            .insert("secret-vote".to_string(), FileRuleConfig::default());

        assert!(matches!(
            ConfigRuleRepository::from_config(&config),
            Err(ConfigValidationError::UnknownApplication(key)) if key == "secret-vote"
        ));
    }
}
