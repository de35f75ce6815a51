//! Role types for review-workflow access control.
//!
//! Roles are authored in the admin backend and referenced by identifier from
//! the `view_roles`/`edit_roles` lists on workflow nodes. The engine treats
//! role identifiers as opaque strings and only ever compares them for
//! equality, with one exception: the well-known admin role, which bypasses
//! node-level restrictions.

use serde::{Deserialize, Serialize};

/// Role identifier carried by administrators.
///
/// Admins can view and act on every node regardless of its role lists.
pub const ADMIN_ROLE: &str = "admin";

/// Set of role identifiers granted to an actor.
///
/// Role sets are assembled by the embedding application from its own user
/// directory. Identifiers are kept in grant order with duplicates removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSet {
    roles: Vec<String>,
}

impl RoleSet {
    /// Creates an empty role set (no grants).
    #[must_use]
    pub fn none() -> Self {
        Self { roles: Vec::new() }
    }

    /// Creates a role set holding only the admin role.
    #[must_use]
    pub fn admin() -> Self {
        Self {
            roles: vec![ADMIN_ROLE.to_string()],
        }
    }

    /// Creates a role set from a list of role identifiers.
    ///
    /// Duplicates are dropped; the first occurrence wins.
    #[must_use]
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roles: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into();
            if !roles.contains(&id) {
                roles.push(id);
            }
        }
        Self { roles }
    }

    /// Returns true if the set contains the given role identifier.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Returns true if the set shares at least one identifier with `other`.
    #[must_use]
    pub fn shares_any(&self, other: &[String]) -> bool {
        self.roles.iter().any(|r| other.contains(r))
    }

    /// Returns true if the set carries the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    /// Returns true if no roles are granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns the role identifiers as a slice.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::none()
    }
}
