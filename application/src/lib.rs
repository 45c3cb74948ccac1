//! Application layer for plenary
//!
//! This crate contains the voting use cases and the port definitions for
//! the collaborators the core depends on: the persistence store, the
//! quorum-rule repository, and the proposal-status consumer. It depends
//! only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    proposal_status::ProposalStatusPort,
    rule_repository::QuorumRuleRepository,
    sitting_store::{SittingStore, StoreError},
};
pub use use_cases::finalize_round::{
    FinalizeRoundError, FinalizeRoundInput, FinalizeRoundOutput, FinalizeRoundUseCase,
};
pub use use_cases::mark_presence::{MarkPresenceError, MarkPresenceInput, MarkPresenceUseCase};
pub use use_cases::record_ballots::{
    RecordBallotsError, RecordBallotsInput, RecordBallotsUseCase,
};
pub use use_cases::transition_session::{
    SessionCommand, TransitionSessionError, TransitionSessionUseCase,
};
