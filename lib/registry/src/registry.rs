//! Resource binding registry.
//!
//! Holds one review binding per resource type behind a read/write lock:
//! gate lookups vastly outnumber binding changes. Rebinding is guarded so
//! a definition swap never silently strands live instances on nodes the
//! incoming definition does not have.

use chrono::Utc;
use greenlight_core::WorkflowId;
use greenlight_workflow::{InstanceRef, ValidationProfile, WorkflowDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::binding::{ResourceBinding, ResourceType};
use crate::error::BindingError;

/// What to do when a rebind would strand live instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RebindPolicy {
    /// Refuse the rebind and report the blocking instances.
    #[default]
    Reject,
    /// Accept the rebind and report the stranded instances for
    /// administrative remediation.
    MarkOrphaned,
}

/// Outcome of a successful bind or rebind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebindOutcome {
    /// Instances left on nodes the new definition does not have. Only
    /// populated under [`RebindPolicy::MarkOrphaned`].
    pub orphaned: Vec<String>,
}

impl RebindOutcome {
    /// True when no instance was stranded by the swap.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.orphaned.is_empty()
    }
}

/// Registry of review bindings, one per resource type.
///
/// Cloning is cheap and clones share the same underlying bindings.
#[derive(Debug)]
pub struct BindingRegistry {
    policy: RebindPolicy,
    bindings: Arc<RwLock<HashMap<ResourceType, ResourceBinding>>>,
}

impl BindingRegistry {
    /// Creates an empty registry with the default rebind policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(RebindPolicy::default())
    }

    /// Creates an empty registry with the given rebind policy.
    #[must_use]
    pub fn with_policy(policy: RebindPolicy) -> Self {
        Self {
            policy,
            bindings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the binding for a resource type, if any.
    #[must_use]
    pub fn get(&self, resource_type: ResourceType) -> Option<ResourceBinding> {
        let bindings = self.bindings.read().unwrap();
        bindings.get(&resource_type).cloned()
    }

    /// Returns all current bindings in resource type order.
    #[must_use]
    pub fn bindings(&self) -> Vec<ResourceBinding> {
        let bindings = self.bindings.read().unwrap();
        ResourceType::ALL
            .iter()
            .filter_map(|resource_type| bindings.get(resource_type).cloned())
            .collect()
    }

    /// Binds a resource type to a workflow definition.
    ///
    /// The definition must pass publish-profile validation. `live` names
    /// the current nodes of the resource type's live instances so the
    /// swap can be checked for stranded work. A rebind keeps the existing
    /// enabled flag; a first bind starts enabled.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::DefinitionInvalid`] when validation fails,
    /// or [`BindingError::WouldOrphanInstances`] when live instances sit
    /// on unknown nodes and the policy is [`RebindPolicy::Reject`].
    pub fn bind(
        &self,
        resource_type: ResourceType,
        definition: &WorkflowDefinition,
        live: &[InstanceRef],
    ) -> Result<RebindOutcome, BindingError> {
        let report = definition.validate(ValidationProfile::Publish);
        if !report.is_valid() {
            return Err(BindingError::DefinitionInvalid { report });
        }

        let orphaned: Vec<String> = live
            .iter()
            .filter(|instance| definition.node(&instance.current_node).is_none())
            .map(|instance| instance.id.clone())
            .collect();

        if !orphaned.is_empty() && self.policy == RebindPolicy::Reject {
            return Err(BindingError::WouldOrphanInstances {
                resource_type,
                instance_ids: orphaned,
            });
        }

        let mut bindings = self.bindings.write().unwrap();
        let enabled = match bindings.get(&resource_type) {
            Some(existing) => existing.enabled,
            None => true,
        };
        let mut binding = ResourceBinding::new(resource_type, definition.id);
        binding.enabled = enabled;
        bindings.insert(resource_type, binding);

        if orphaned.is_empty() {
            info!(
                resource_type = %resource_type,
                workflow = %definition.id,
                "bound review workflow"
            );
        } else {
            warn!(
                resource_type = %resource_type,
                workflow = %definition.id,
                orphaned = orphaned.len(),
                "bound review workflow, stranding live instances"
            );
        }

        Ok(RebindOutcome { orphaned })
    }

    /// Enables or disables review gating without touching the wiring.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::NotBound`] if the resource type has no
    /// binding.
    pub fn set_enabled(
        &self,
        resource_type: ResourceType,
        enabled: bool,
    ) -> Result<(), BindingError> {
        let mut bindings = self.bindings.write().unwrap();
        let binding = bindings
            .get_mut(&resource_type)
            .ok_or(BindingError::NotBound { resource_type })?;
        binding.enabled = enabled;
        binding.updated_at = Utc::now();
        info!(resource_type = %resource_type, enabled, "review gating toggled");
        Ok(())
    }

    /// Removes the binding for a resource type, returning it if present.
    pub fn unbind(&self, resource_type: ResourceType) -> Option<ResourceBinding> {
        let mut bindings = self.bindings.write().unwrap();
        bindings.remove(&resource_type)
    }

    /// True if any binding references the definition, enabled or not.
    #[must_use]
    pub fn is_bound(&self, workflow_id: WorkflowId) -> bool {
        let bindings = self.bindings.read().unwrap();
        bindings
            .values()
            .any(|binding| binding.workflow_id == workflow_id)
    }

    /// Checks whether a definition may be deleted.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::SystemDefinition`] for built-in
    /// definitions, or [`BindingError::StillBound`] while a binding still
    /// references the definition.
    pub fn guard_delete(&self, definition: &WorkflowDefinition) -> Result<(), BindingError> {
        if definition.is_system {
            return Err(BindingError::SystemDefinition {
                workflow_id: definition.id,
            });
        }
        let bindings = self.bindings.read().unwrap();
        if let Some(binding) = bindings
            .values()
            .find(|binding| binding.workflow_id == definition.id)
        {
            return Err(BindingError::StillBound {
                workflow_id: definition.id,
                resource_type: binding.resource_type,
            });
        }
        Ok(())
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for BindingRegistry {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy,
            bindings: Arc::clone(&self.bindings),
        }
    }
}
