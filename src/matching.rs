//! Match page candidates
//!
//! Candidates are picked by role alone: performers are shown venues,
//! venues are shown performers, and locals see both. There is no scoring.

use crate::account::{Account, Role};

/// Roles shown on the match page for a viewer of `role`
pub fn counterpart_roles(role: Role) -> &'static [Role] {
    match role {
        Role::Performer => &[Role::Venue],
        Role::Venue => &[Role::Performer],
        Role::Local => &[Role::Performer, Role::Venue],
    }
}

/// Accounts the viewer may match with, in registration order
pub fn match_candidates<'a>(viewer: &Account, accounts: &'a [Account]) -> Vec<&'a Account> {
    let wanted = counterpart_roles(viewer.role);
    accounts
        .iter()
        .filter(|a| wanted.contains(&a.role) && a.username != viewer.username)
        .collect()
}
