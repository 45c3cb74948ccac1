//! Configuration file support
//!
//! `plenary.toml` carries the chamber composition and per-application
//! quorum rule overrides:
//!
//! ```toml
//! [chamber]
//! total_members = 21
//! total_mandates = 21
//!
//! [rules.absolute-majority-vote]
//! quorum = "absolute-majority"
//! base = "total-members"
//! named_vote = true
//! approval_message = "Approved by absolute majority"
//! ```
//!
//! Applications with no table fall back to their statutory default rule.

pub mod loader;

pub use loader::ConfigLoader;

use plenary_domain::{CalculationBase, ChamberComposition, QuorumRule, QuorumType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors found while turning file values into domain rules
#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("Unknown voting application key: {0}")]
    UnknownApplication(String),

    #[error("Rule for {application}: {message}")]
    InvalidRule {
        application: String,
        message: String,
    },
}

/// Chamber composition from TOML (`[chamber]` section)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChamberConfig {
    /// Sitting members of the chamber
    pub total_members: u32,
    /// Statutory seats, including vacancies
    pub total_mandates: u32,
}

impl Default for FileChamberConfig {
    fn default() -> Self {
        Self {
            total_members: 21,
            total_mandates: 21,
        }
    }
}

impl FileChamberConfig {
    pub fn to_chamber(self) -> ChamberComposition {
        ChamberComposition::new(self.total_members, self.total_mandates)
    }
}

/// One quorum rule from TOML (`[rules.<application>]` table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRuleConfig {
    /// Quorum formula: "simple-majority", "absolute-majority",
    /// "two-thirds", "three-fifths", "unanimity"
    pub quorum: String,
    /// Calculation base: "present-members", "total-members", "total-mandates"
    pub base: String,
    pub minimum_percentage: Option<u8>,
    pub minimum_count: Option<u32>,
    pub abstentions_count_against: bool,
    pub named_vote: bool,
    pub approval_message: Option<String>,
    pub rejection_message: Option<String>,
}

impl Default for FileRuleConfig {
    fn default() -> Self {
        Self {
            quorum: "simple-majority".to_string(),
            base: "present-members".to_string(),
            minimum_percentage: None,
            minimum_count: None,
            abstentions_count_against: false,
            named_vote: false,
            approval_message: None,
            rejection_message: None,
        }
    }
}

impl FileRuleConfig {
    /// Parse the file values into a domain rule.
    pub fn to_rule(&self, application: &str) -> Result<QuorumRule, ConfigValidationError> {
        let invalid = |message: String| ConfigValidationError::InvalidRule {
            application: application.to_string(),
            message,
        };

        let quorum_type: QuorumType = self.quorum.parse().map_err(&invalid)?;
        let base: CalculationBase = self.base.parse().map_err(&invalid)?;

        if let Some(pct) = self.minimum_percentage
            && pct > 100
        {
            return Err(invalid(format!(
                "minimum_percentage must be 0-100, got {}",
                pct
            )));
        }

        let mut rule = QuorumRule::new(quorum_type, base);
        rule.minimum_percentage = self.minimum_percentage;
        rule.minimum_count = self.minimum_count;
        rule.abstention_counts_against = self.abstentions_count_against;
        rule.named_vote = self.named_vote;
        rule.approval_message = self.approval_message.clone();
        rule.rejection_message = self.rejection_message.clone();
        Ok(rule)
    }
}

/// Root configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub chamber: FileChamberConfig,
    /// Rule overrides keyed by application (kebab-case keys)
    pub rules: BTreeMap<String, FileRuleConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.chamber.total_members, 21);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_deserialize_rule_table() {
        let toml_str = r#"
[chamber]
total_members = 11
total_mandates = 13

[rules.two-thirds-vote]
quorum = "two-thirds"
base = "total-mandates"
named_vote = true
rejection_message = "Qualified majority not reached"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chamber.total_members, 11);

        let rule = config.rules["two-thirds-vote"]
            .to_rule("two-thirds-vote")
            .unwrap();
        assert_eq!(rule.quorum_type, QuorumType::TwoThirds);
        assert_eq!(rule.base, CalculationBase::TotalMandates);
        assert!(rule.named_vote);
        assert_eq!(
            rule.rejection_message.as_deref(),
            Some("Qualified majority not reached")
        );
    }

    #[test]
    fn test_invalid_quorum_string() {
        let file_rule = FileRuleConfig {
            quorum: "plurality".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            file_rule.to_rule("committee-vote"),
            Err(ConfigValidationError::InvalidRule { .. })
        ));
    }

    #[test]
    fn test_percentage_out_of_range() {
        let file_rule = FileRuleConfig {
            minimum_percentage: Some(150),
            ..Default::default()
        };
        assert!(file_rule.to_rule("committee-vote").is_err());
    }
}
