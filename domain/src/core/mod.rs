//! Core domain building blocks: identifiers, actors, and errors.

pub mod actor;
pub mod error;
pub mod ids;

pub use actor::Actor;
pub use error::DomainError;
pub use ids::{LegislatorId, ProposalId, SessionId};
