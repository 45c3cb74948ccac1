//! Preconditions shared across use cases.

use plenary_domain::{Actor, DomainError};

/// Validate the retroactive-mode gate: a non-empty justification and an
/// actor holding the retroactive grant.
///
/// Returns the trimmed justification on success.
pub(crate) fn retroactive_justification(
    actor: &Actor,
    justification: Option<&str>,
) -> Result<String, DomainError> {
    let text = justification
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(DomainError::MissingRetroactiveJustification)?;

    if !actor.may_act_retroactively() {
        return Err(DomainError::RetroactiveNotAuthorized {
            actor: actor.id().to_string(),
        });
    }

    Ok(text.to_string())
}
