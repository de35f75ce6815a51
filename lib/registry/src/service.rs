//! Review service composition.
//!
//! [`ReviewService`] is the surface the embedding admin backend talks to.
//! It owns the binding registry, loads and saves definitions through a
//! [`DefinitionStore`], and resolves the review gate for a resource type.
//! Methods return rootcause reports so callers can attach request-level
//! context before surfacing failures.

use greenlight_core::WorkflowId;
use greenlight_workflow::{
    DefinitionSummary, InstanceRef, StateResolver, ValidationProfile, WorkflowDefinition,
};
use rootcause::prelude::Report;
use tracing::{debug, instrument};

use crate::binding::{ResourceBinding, ResourceType};
use crate::config::EngineConfig;
use crate::error::ServiceError;
use crate::registry::{BindingRegistry, RebindOutcome};
use crate::store::{DefinitionStore, StoreError};

/// The review gate resolved for a resource type.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewGate {
    /// No review applies. The binding is absent or disabled.
    Unrestricted,
    /// Review flows through this definition.
    Gated(WorkflowDefinition),
}

impl ReviewGate {
    /// True when review gating is in force.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        matches!(self, Self::Gated(_))
    }

    /// The gating definition, if any.
    #[must_use]
    pub fn definition(&self) -> Option<&WorkflowDefinition> {
        match self {
            Self::Gated(definition) => Some(definition),
            Self::Unrestricted => None,
        }
    }
}

/// Review workflow service for the embedding application.
pub struct ReviewService<S: DefinitionStore> {
    store: S,
    registry: BindingRegistry,
    config: EngineConfig,
}

impl<S: DefinitionStore> ReviewService<S> {
    /// Creates a service with default policies.
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Creates a service with explicit policies.
    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self {
            store,
            registry: BindingRegistry::with_policy(config.rebind),
            config,
        }
    }

    /// Creates a service with policies loaded from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Config`] when the environment holds values
    /// that do not parse.
    pub fn from_env(store: S) -> Result<Self, Report<ServiceError>> {
        let config = EngineConfig::from_env().map_err(|e| ServiceError::Config {
            message: e.to_string(),
        })?;
        Ok(Self::with_config(store, config))
    }

    /// The binding registry.
    #[must_use]
    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Builds a resolver for a definition under the configured role
    /// policy.
    #[must_use]
    pub fn state_resolver<'a>(&self, definition: &'a WorkflowDefinition) -> StateResolver<'a> {
        StateResolver::new(definition).with_policy(self.config.empty_roles)
    }

    /// Lists summaries of every stored definition.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the store fails.
    pub async fn list_definitions(&self) -> Result<Vec<DefinitionSummary>, Report<ServiceError>> {
        Ok(self.store.list().await.map_err(ServiceError::Store)?)
    }

    /// Loads one definition by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the definition is missing or
    /// the store fails.
    pub async fn definition(
        &self,
        workflow_id: WorkflowId,
    ) -> Result<WorkflowDefinition, Report<ServiceError>> {
        Ok(self
            .store
            .fetch(workflow_id)
            .await
            .map_err(ServiceError::Store)?)
    }

    /// Validates and saves a definition, replacing any existing one
    /// wholesale.
    ///
    /// Saving is publishing: the definition must be fully executable, so
    /// validation runs under the publish profile. The `code` of an
    /// already-stored definition is immutable.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::DefinitionInvalid`] when validation fails,
    /// [`ServiceError::CodeChanged`] when the save would alter the code,
    /// or [`ServiceError::Store`] when the store fails.
    #[instrument(skip(self, definition), fields(workflow = %definition.id, code = %definition.code))]
    pub async fn save_definition(
        &self,
        definition: WorkflowDefinition,
    ) -> Result<(), Report<ServiceError>> {
        let report = definition.validate(ValidationProfile::Publish);
        if !report.is_valid() {
            return Err(ServiceError::DefinitionInvalid { report }.into());
        }

        match self.store.fetch(definition.id).await {
            Ok(existing) => {
                if existing.code != definition.code {
                    return Err(ServiceError::CodeChanged {
                        workflow_id: definition.id,
                        existing: existing.code,
                        incoming: definition.code,
                    }
                    .into());
                }
            }
            // First save of this id.
            Err(StoreError::NotFound { .. }) => {}
            Err(e) => return Err(ServiceError::Store(e).into()),
        }

        self.store
            .save(definition)
            .await
            .map_err(ServiceError::Store)?;
        debug!("definition saved");
        Ok(())
    }

    /// Deletes a definition after checking the deletion guards.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Binding`] when the definition is built-in
    /// or still bound, or [`ServiceError::Store`] when the store fails.
    #[instrument(skip(self), fields(workflow = %workflow_id))]
    pub async fn delete_definition(
        &self,
        workflow_id: WorkflowId,
    ) -> Result<(), Report<ServiceError>> {
        let definition = self
            .store
            .fetch(workflow_id)
            .await
            .map_err(ServiceError::Store)?;
        self.registry
            .guard_delete(&definition)
            .map_err(ServiceError::Binding)?;
        self.store
            .delete(workflow_id)
            .await
            .map_err(ServiceError::Store)?;
        debug!("definition deleted");
        Ok(())
    }

    /// Wires a resource type to a stored definition.
    ///
    /// `live` names the current nodes of the resource type's live
    /// instances so the swap can be checked for stranded work.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when the definition cannot be
    /// loaded, or [`ServiceError::Binding`] when the registry refuses the
    /// bind.
    #[instrument(skip(self, live), fields(resource_type = %resource_type, workflow = %workflow_id))]
    pub async fn bind(
        &self,
        resource_type: ResourceType,
        workflow_id: WorkflowId,
        live: &[InstanceRef],
    ) -> Result<RebindOutcome, Report<ServiceError>> {
        let definition = self
            .store
            .fetch(workflow_id)
            .await
            .map_err(ServiceError::Store)?;
        Ok(self
            .registry
            .bind(resource_type, &definition, live)
            .map_err(ServiceError::Binding)?)
    }

    /// Enables or disables review gating for a resource type.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Binding`] if the resource type has no
    /// binding.
    pub fn set_enabled(
        &self,
        resource_type: ResourceType,
        enabled: bool,
    ) -> Result<(), Report<ServiceError>> {
        Ok(self
            .registry
            .set_enabled(resource_type, enabled)
            .map_err(ServiceError::Binding)?)
    }

    /// Returns the binding for a resource type, if any.
    #[must_use]
    pub fn binding(&self, resource_type: ResourceType) -> Option<ResourceBinding> {
        self.registry.get(resource_type)
    }

    /// Resolves the review gate for a resource type.
    ///
    /// Absent and disabled bindings both leave the resource type
    /// unrestricted. Turning review on is an explicit administrative act,
    /// never a side effect of wiring existing.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Store`] when an enabled binding points at
    /// a definition the store cannot load.
    #[instrument(skip(self), fields(resource_type = %resource_type))]
    pub async fn gate_for(
        &self,
        resource_type: ResourceType,
    ) -> Result<ReviewGate, Report<ServiceError>> {
        let Some(binding) = self.registry.get(resource_type) else {
            debug!("no binding, review unrestricted");
            return Ok(ReviewGate::Unrestricted);
        };
        if !binding.enabled {
            debug!(workflow = %binding.workflow_id, "binding disabled, review unrestricted");
            return Ok(ReviewGate::Unrestricted);
        }

        let definition = self
            .store
            .fetch(binding.workflow_id)
            .await
            .map_err(ServiceError::Store)?;
        debug!(workflow = %definition.id, "review gated");
        Ok(ReviewGate::Gated(definition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use greenlight_access::RoleSet;
    use greenlight_workflow::{Action, Node, NodeKind, RolePolicy, Transition};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// In-memory definition store for testing.
    #[derive(Default)]
    struct InMemoryDefinitionStore {
        definitions: Arc<Mutex<HashMap<WorkflowId, WorkflowDefinition>>>,
    }

    impl InMemoryDefinitionStore {
        fn new() -> Self {
            Self::default()
        }

        fn with_definition(definition: WorkflowDefinition) -> Self {
            let store = Self::new();
            store
                .definitions
                .lock()
                .unwrap()
                .insert(definition.id, definition);
            store
        }
    }

    #[async_trait]
    impl DefinitionStore for InMemoryDefinitionStore {
        async fn fetch(&self, workflow_id: WorkflowId) -> Result<WorkflowDefinition, StoreError> {
            self.definitions
                .lock()
                .unwrap()
                .get(&workflow_id)
                .cloned()
                .ok_or(StoreError::NotFound { workflow_id })
        }

        async fn list(&self) -> Result<Vec<DefinitionSummary>, StoreError> {
            Ok(self
                .definitions
                .lock()
                .unwrap()
                .values()
                .map(DefinitionSummary::from)
                .collect())
        }

        async fn save(&self, definition: WorkflowDefinition) -> Result<(), StoreError> {
            self.definitions
                .lock()
                .unwrap()
                .insert(definition.id, definition);
            Ok(())
        }

        async fn delete(&self, workflow_id: WorkflowId) -> Result<(), StoreError> {
            self.definitions
                .lock()
                .unwrap()
                .remove(&workflow_id)
                .map(|_| ())
                .ok_or(StoreError::NotFound { workflow_id })
        }
    }

    fn editorial() -> WorkflowDefinition {
        WorkflowDefinition::new("editorial", "Editorial review")
            .with_node(Node::new("start", "Start", NodeKind::Start))
            .with_node(Node::new("done", "Done", NodeKind::Terminal))
            .with_action(Action::new("finish", "Finish"))
            .with_transition(Transition::new("start", "finish", "done"))
    }

    #[tokio::test]
    async fn save_then_list_and_fetch() {
        let service = ReviewService::new(InMemoryDefinitionStore::new());
        let definition = editorial();
        let workflow_id = definition.id;

        service
            .save_definition(definition)
            .await
            .expect("save");

        let summaries = service.list_definitions().await.expect("list");
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].code, "editorial");

        let loaded = service.definition(workflow_id).await.expect("fetch");
        assert_eq!(loaded.name, "Editorial review");
    }

    #[tokio::test]
    async fn save_rejects_invalid_definitions() {
        let service = ReviewService::new(InMemoryDefinitionStore::new());
        let no_terminal = WorkflowDefinition::new("broken", "Broken")
            .with_node(Node::new("start", "Start", NodeKind::Start));

        assert!(service.save_definition(no_terminal).await.is_err());
        assert!(service.list_definitions().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn save_refuses_code_changes() {
        let service = ReviewService::new(InMemoryDefinitionStore::new());
        let definition = editorial();
        let workflow_id = definition.id;
        service.save_definition(definition).await.expect("save");

        let mut renamed_code = service.definition(workflow_id).await.expect("fetch");
        renamed_code.code = "renamed".into();
        assert!(service.save_definition(renamed_code).await.is_err());

        // The stored definition is untouched.
        let loaded = service.definition(workflow_id).await.expect("fetch");
        assert_eq!(loaded.code, "editorial");
    }

    #[tokio::test]
    async fn resave_replaces_the_whole_definition() {
        let service = ReviewService::new(InMemoryDefinitionStore::new());
        let definition = editorial();
        let workflow_id = definition.id;
        service.save_definition(definition).await.expect("save");

        let mut updated = service.definition(workflow_id).await.expect("fetch");
        updated.rename("Editorial review v2");
        service.save_definition(updated).await.expect("resave");

        let loaded = service.definition(workflow_id).await.expect("fetch");
        assert_eq!(loaded.name, "Editorial review v2");
        assert_eq!(
            service.list_definitions().await.expect("list").len(),
            1
        );
    }

    #[tokio::test]
    async fn delete_refuses_system_definitions() {
        let system = WorkflowDefinition::standard_review();
        let workflow_id = system.id;
        let service = ReviewService::new(InMemoryDefinitionStore::with_definition(system));

        assert!(service.delete_definition(workflow_id).await.is_err());
        assert!(service.definition(workflow_id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_refuses_bound_definitions() {
        let definition = editorial();
        let workflow_id = definition.id;
        let service = ReviewService::new(InMemoryDefinitionStore::with_definition(definition));

        service
            .bind(ResourceType::Media, workflow_id, &[])
            .await
            .expect("bind");
        assert!(service.delete_definition(workflow_id).await.is_err());

        service.registry().unbind(ResourceType::Media);
        service.delete_definition(workflow_id).await.expect("delete");
        assert!(service.definition(workflow_id).await.is_err());
    }

    #[tokio::test]
    async fn bind_requires_a_stored_definition() {
        let service = ReviewService::new(InMemoryDefinitionStore::new());
        let result = service
            .bind(ResourceType::Media, WorkflowId::new(), &[])
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn gate_for_unbound_resource_is_unrestricted() {
        let service = ReviewService::new(InMemoryDefinitionStore::new());
        let gate = service.gate_for(ResourceType::Media).await.expect("gate");
        assert_eq!(gate, ReviewGate::Unrestricted);
        assert!(!gate.is_gated());
    }

    #[tokio::test]
    async fn gate_for_enabled_binding_returns_the_definition() {
        let definition = editorial();
        let workflow_id = definition.id;
        let service = ReviewService::new(InMemoryDefinitionStore::with_definition(definition));

        service
            .bind(ResourceType::Knowledge, workflow_id, &[])
            .await
            .expect("bind");

        let gate = service
            .gate_for(ResourceType::Knowledge)
            .await
            .expect("gate");
        assert!(gate.is_gated());
        assert_eq!(gate.definition().expect("definition").id, workflow_id);
    }

    #[tokio::test]
    async fn disabled_binding_bypasses_review_but_is_retained() {
        let definition = editorial();
        let workflow_id = definition.id;
        let service = ReviewService::new(InMemoryDefinitionStore::with_definition(definition));

        service
            .bind(ResourceType::Media, workflow_id, &[])
            .await
            .expect("bind");
        service
            .set_enabled(ResourceType::Media, false)
            .expect("disable");

        let gate = service.gate_for(ResourceType::Media).await.expect("gate");
        assert_eq!(gate, ReviewGate::Unrestricted);

        // The wiring survives, so re-enabling restores the same gate.
        let binding = service.binding(ResourceType::Media).expect("binding");
        assert_eq!(binding.workflow_id, workflow_id);

        service
            .set_enabled(ResourceType::Media, true)
            .expect("enable");
        let gate = service.gate_for(ResourceType::Media).await.expect("gate");
        assert_eq!(gate.definition().expect("definition").id, workflow_id);
    }

    #[tokio::test]
    async fn state_resolver_applies_the_configured_role_policy() {
        let definition = WorkflowDefinition::standard_review();
        let outsider = RoleSet::from_ids(["visitor"]);

        let permissive = ReviewService::new(InMemoryDefinitionStore::new());
        let resolver = permissive.state_resolver(&definition);
        assert!(resolver.can_act("review", &outsider).expect("resolve"));

        let strict = ReviewService::with_config(
            InMemoryDefinitionStore::new(),
            EngineConfig {
                empty_roles: RolePolicy::AdminOnly,
                ..EngineConfig::default()
            },
        );
        let resolver = strict.state_resolver(&definition);
        assert!(!resolver.can_act("review", &outsider).expect("resolve"));
    }
}
