//! Plenary session lifecycle
//!
//! The session state machine owns the per-state legality of presence and
//! vote recording, including the retroactive mode a session enters once
//! concluded.

pub mod entities;

pub use entities::{Session, SessionState};
