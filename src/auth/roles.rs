use std::collections::BTreeSet;
use tracing::warn;

use crate::db::RoleName;

/// Role assigned when none is requested or the request names an unknown role.
pub const DEFAULT_ROLE: RoleName = RoleName::User;

/// Request strings that select a non-default role. Closed: anything not
/// listed resolves to [`DEFAULT_ROLE`].
const REQUESTABLE_ROLES: [(&str, RoleName); 2] = [
    ("admin", RoleName::Admin),
    ("mod", RoleName::Moderator),
];

pub fn role_for_request(requested: &str) -> Option<RoleName> {
    REQUESTABLE_ROLES
        .iter()
        .find(|(key, _)| *key == requested)
        .map(|(_, name)| *name)
}

/// Maps the requested role strings of a registration to the set of roles to assign.
///
/// The result is never empty.
pub fn resolve_requested_roles<'a, I>(requested: Option<I>) -> BTreeSet<RoleName>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut resolved: BTreeSet<RoleName> = requested
        .into_iter()
        .flatten()
        .map(|role| {
            role_for_request(role).unwrap_or_else(|| {
                // Unknown strings are not rejected, only downgraded
                warn!("Unrecognized role {:?} requested, assigning {}", role, DEFAULT_ROLE);
                DEFAULT_ROLE
            })
        })
        .collect();

    if resolved.is_empty() {
        resolved.insert(DEFAULT_ROLE);
    }

    resolved
}
