//! Infrastructure layer for plenary
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the in-memory sitting store, the configuration
//! file loader, the config-backed quorum-rule repository, the JSONL
//! audit log, and the proposal-status adapters.

pub mod audit;
pub mod config;
pub mod proposal;
pub mod rules;
pub mod store;

// Re-export commonly used types
pub use audit::{AuditAppend, JsonlAuditLog};
pub use config::{ConfigLoader, ConfigValidationError, FileChamberConfig, FileConfig, FileRuleConfig};
pub use proposal::{RecordingProposalStatus, TracingProposalStatus};
pub use rules::ConfigRuleRepository;
pub use store::MemorySittingStore;
