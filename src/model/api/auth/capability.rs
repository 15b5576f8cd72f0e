use std::fmt::Display;

use crate::model::common::role::{can_manage_concerns, can_manage_elections, Role};

/// Something a route requires of its caller, checked against the caller's role.
pub trait Capability {
    /// Human-readable name, used in error messages.
    const NAME: &'static str;

    /// Does the given role have this capability?
    fn permits(role: Role) -> bool;
}

/// Any authenticated user.
pub struct Member;

/// May create elections.
pub struct ElectionManager;

/// May see every concern and change their status.
pub struct ConcernManager;

impl Capability for Member {
    const NAME: &'static str = "member";

    fn permits(_role: Role) -> bool {
        true
    }
}

impl Capability for ElectionManager {
    const NAME: &'static str = "election manager";

    fn permits(role: Role) -> bool {
        can_manage_elections(role)
    }
}

impl Capability for ConcernManager {
    const NAME: &'static str = "concern manager";

    fn permits(role: Role) -> bool {
        can_manage_concerns(role)
    }
}

/// Describe a refusal for the given role.
pub(super) fn refusal<C: Capability>(role: impl Display) -> String {
    format!("Role '{role}' is not permitted to act as {}", C::NAME)
}
