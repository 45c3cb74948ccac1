//! Acting-user value object.
//!
//! The identity collaborator resolves who is calling and whether they hold
//! the retroactive-mutation grant. The core never consults ambient request
//! state; every operation receives an explicit [`Actor`].

use serde::{Deserialize, Serialize};

/// The user performing a core operation.
///
/// # Example
///
/// ```
/// use plenary_domain::Actor;
///
/// let clerk = Actor::new("clerk.silva");
/// assert!(!clerk.may_act_retroactively());
///
/// let president = Actor::new("pres.rocha").with_retroactive_grant();
/// assert!(president.may_act_retroactively());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    id: String,
    may_act_retroactively: bool,
}

impl Actor {
    /// Create an actor without the retroactive-mutation grant.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            may_act_retroactively: false,
        }
    }

    /// Grant this actor permission for retroactive mutations.
    ///
    /// The grant itself is computed by the identity collaborator; the core
    /// only checks the boolean.
    pub fn with_retroactive_grant(mut self) -> Self {
        self.may_act_retroactively = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn may_act_retroactively(&self) -> bool {
        self.may_act_retroactively
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_grant() {
        let actor = Actor::new("clerk");
        assert_eq!(actor.id(), "clerk");
        assert!(!actor.may_act_retroactively());
        assert!(actor.with_retroactive_grant().may_act_retroactively());
    }
}
