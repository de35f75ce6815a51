//! Instance state resolution.
//!
//! The resolver answers the read-only questions a UI asks about one
//! resource instance's position in a workflow: which actions its current
//! node offers, whether the node is terminal, and who may see or act on
//! it. Applying an action is the executor's job.
//!
//! An instance whose recorded node is absent from the definition is
//! *orphaned*. That is a distinct error, never an empty answer, so the
//! console can surface stranded work for remediation instead of silently
//! hiding it.

use greenlight_access::RoleSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::definition::{Action, Node, WorkflowDefinition};
use crate::error::ResolveError;
use crate::index::DefinitionIndex;

/// How an empty `view_roles`/`edit_roles` list is interpreted.
///
/// Admins bypass node-level restrictions under either policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolePolicy {
    /// An empty list leaves the node unrestricted.
    #[default]
    Unrestricted,
    /// An empty list restricts the node to admins.
    AdminOnly,
}

/// Read-only queries against one definition.
pub struct StateResolver<'a> {
    index: DefinitionIndex<'a>,
    policy: RolePolicy,
}

impl<'a> StateResolver<'a> {
    /// Creates a resolver with the default role policy.
    #[must_use]
    pub fn new(definition: &'a WorkflowDefinition) -> Self {
        Self {
            index: DefinitionIndex::new(definition),
            policy: RolePolicy::default(),
        }
    }

    /// Sets the empty-role-list policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RolePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the node an instance on `current_node` occupies.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::OrphanedInstance`] if the node is not in
    /// the definition.
    pub fn current_node(&self, current_node: &str) -> Result<&'a Node, ResolveError> {
        self.index.node(current_node).ok_or_else(|| {
            warn!(node = current_node, "instance references a node absent from its definition");
            ResolveError::OrphanedInstance {
                node: current_node.to_string(),
            }
        })
    }

    /// Actions available to an instance on `current_node`.
    ///
    /// Returned in definition order: always a subset of the definition's
    /// actions, containing exactly those with a transition out of the
    /// node. Terminal nodes yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::OrphanedInstance`] for unknown nodes.
    pub fn available_actions(&self, current_node: &str) -> Result<Vec<&'a Action>, ResolveError> {
        self.current_node(current_node)?;
        Ok(self
            .index
            .definition()
            .actions
            .iter()
            .filter(|action| self.index.resolve(current_node, &action.id).is_some())
            .collect())
    }

    /// True if the instance's node is terminal.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::OrphanedInstance`] for unknown nodes.
    pub fn is_terminal(&self, current_node: &str) -> Result<bool, ResolveError> {
        Ok(self.current_node(current_node)?.kind.is_terminal())
    }

    /// True if `roles` may see instances on this node.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::OrphanedInstance`] for unknown nodes.
    pub fn can_view(&self, current_node: &str, roles: &RoleSet) -> Result<bool, ResolveError> {
        let node = self.current_node(current_node)?;
        Ok(self.allows(&node.view_roles, roles))
    }

    /// True if `roles` may act on instances on this node.
    ///
    /// View and edit lists are independent; neither implies the other.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::OrphanedInstance`] for unknown nodes.
    pub fn can_act(&self, current_node: &str, roles: &RoleSet) -> Result<bool, ResolveError> {
        let node = self.current_node(current_node)?;
        Ok(self.allows(&node.edit_roles, roles))
    }

    fn allows(&self, allowed: &[String], roles: &RoleSet) -> bool {
        if roles.is_admin() {
            return true;
        }
        if allowed.is_empty() {
            return match self.policy {
                RolePolicy::Unrestricted => true,
                RolePolicy::AdminOnly => false,
            };
        }
        roles.shares_any(allowed)
    }
}
