//! Actor identity for review operations.
//!
//! The Actor represents the authenticated user on whose behalf a resolver
//! query or transition runs. Authentication itself happens in the embedding
//! application; the engine only consumes the resulting identity and role
//! grants, and stamps the actor's ID into history records.

use greenlight_core::UserId;
use serde::{Deserialize, Serialize};

use crate::role::RoleSet;

/// An authenticated user acting on a review workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Internal platform user ID, recorded on every transition.
    id: UserId,
    /// Display name for audit surfaces, if the directory provides one.
    display_name: Option<String>,
    /// Role identifiers granted to this user.
    roles: RoleSet,
}

impl Actor {
    /// Creates an actor from an authenticated user's ID and role grants.
    #[must_use]
    pub fn new(id: UserId, roles: RoleSet) -> Self {
        Self {
            id,
            display_name: None,
            roles,
        }
    }

    /// Attaches a display name for audit surfaces.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Returns the actor's user ID.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the actor's display name, if available.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns the actor's role grants.
    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    /// Returns true if the actor carries the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }
}
