//! Presence ledger types
//!
//! Presence is recorded per (session, legislator). Absence is the default:
//! a legislator with no record is treated as not present, and the vote
//! recorder refuses their ballots.

use crate::core::ids::{LegislatorId, SessionId};
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Presence mark for one legislator in one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceRecord {
    pub session: SessionId,
    pub legislator: LegislatorId,
    pub present: bool,
    /// Optional note, e.g. the reason for a justified absence
    pub justification: Option<String>,
    pub recorded_at: u64,
}

impl PresenceRecord {
    pub fn present(session: impl Into<SessionId>, legislator: impl Into<LegislatorId>) -> Self {
        Self::new(session, legislator, true)
    }

    pub fn absent(session: impl Into<SessionId>, legislator: impl Into<LegislatorId>) -> Self {
        Self::new(session, legislator, false)
    }

    fn new(
        session: impl Into<SessionId>,
        legislator: impl Into<LegislatorId>,
        present: bool,
    ) -> Self {
        Self {
            session: session.into(),
            legislator: legislator.into(),
            present,
            justification: None,
            recorded_at: current_timestamp(),
        }
    }

    pub fn with_justification(mut self, justification: impl Into<String>) -> Self {
        self.justification = Some(justification.into());
        self
    }
}

/// Read-only view of a session's presence records
///
/// Built from the persisted records of a single session; consulted by the
/// vote recorder as a precondition check.
///
/// # Example
///
/// ```
/// use plenary_domain::{PresenceRecord, PresenceSheet};
///
/// let sheet = PresenceSheet::from_records(vec![
///     PresenceRecord::present("s-1", "ana"),
///     PresenceRecord::absent("s-1", "bruno"),
/// ]);
///
/// assert!(sheet.is_present(&"ana".into()));
/// assert!(!sheet.is_present(&"bruno".into()));
/// assert!(!sheet.is_present(&"carla".into())); // no record: absent
/// assert_eq!(sheet.present_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PresenceSheet {
    marks: HashMap<LegislatorId, bool>,
}

impl PresenceSheet {
    pub fn from_records(records: Vec<PresenceRecord>) -> Self {
        let marks = records
            .into_iter()
            .map(|r| (r.legislator, r.present))
            .collect();
        Self { marks }
    }

    pub fn is_present(&self, legislator: &LegislatorId) -> bool {
        self.marks.get(legislator).copied().unwrap_or(false)
    }

    /// Number of legislators marked present
    pub fn present_count(&self) -> u32 {
        self.marks.values().filter(|p| **p).count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absence_is_the_default() {
        let sheet = PresenceSheet::from_records(vec![]);
        assert!(!sheet.is_present(&"ana".into()));
        assert_eq!(sheet.present_count(), 0);
    }

    #[test]
    fn test_present_count_ignores_justified_absences() {
        let sheet = PresenceSheet::from_records(vec![
            PresenceRecord::present("s-1", "ana"),
            PresenceRecord::present("s-1", "bruno"),
            PresenceRecord::absent("s-1", "carla").with_justification("medical leave"),
        ]);
        assert_eq!(sheet.present_count(), 2);
        assert!(!sheet.is_present(&"carla".into()));
    }

    #[test]
    fn test_later_record_wins() {
        // Upsert semantics: the sheet is built from the latest record per
        // legislator, so a duplicate in input order overrides.
        let sheet = PresenceSheet::from_records(vec![
            PresenceRecord::absent("s-1", "ana"),
            PresenceRecord::present("s-1", "ana"),
        ]);
        assert!(sheet.is_present(&"ana".into()));
    }
}
