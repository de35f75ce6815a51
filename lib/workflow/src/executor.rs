//! Transition execution.
//!
//! Applying an action moves an instance along the matching transition and
//! produces the history record the caller persists together with the node
//! change. The executor writes nothing itself and consults no roles: the
//! caller answers the authorization question through the resolver before
//! calling in.

use greenlight_access::Actor;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::definition::WorkflowDefinition;
use crate::error::TransitionError;
use crate::history::HistoryRecord;
use crate::index::DefinitionIndex;

/// The engine's view of one caller-owned resource instance.
///
/// The engine never loads or stores instances; callers pass in the two
/// fields it needs and apply the outcome themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRef {
    /// Caller-scoped instance identifier, recorded into history.
    pub id: String,
    /// The node the instance currently occupies.
    pub current_node: String,
}

impl InstanceRef {
    /// Creates an instance reference.
    #[must_use]
    pub fn new(id: impl Into<String>, current_node: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current_node: current_node.into(),
        }
    }
}

/// Result of applying one action to one instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    /// Node the instance occupies after the transition.
    pub new_node: String,
    /// History record for the caller to append alongside the node change.
    pub record: HistoryRecord,
}

/// A single instance's failure within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The instance that failed.
    pub instance_id: String,
    /// Why it failed.
    pub error: TransitionError,
}

/// Outcome of applying one action across a batch of instances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Outcomes for the instances that transitioned, in input order.
    pub successes: Vec<TransitionOutcome>,
    /// Per-instance failures, in input order.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// Number of instances that transitioned.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of instances that failed.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when no instance failed.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies actions to instances against one definition.
///
/// Stateless: safe to use concurrently for different instances. Racing
/// writes for the same instance must be serialized by the caller, which
/// owns persistence.
pub struct TransitionExecutor<'a> {
    index: DefinitionIndex<'a>,
}

impl<'a> TransitionExecutor<'a> {
    /// Creates an executor for a definition.
    #[must_use]
    pub fn new(definition: &'a WorkflowDefinition) -> Self {
        Self {
            index: DefinitionIndex::new(definition),
        }
    }

    /// Applies `action` to a single instance.
    ///
    /// On success the caller persists the node change and appends the
    /// history record in the same write.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::OrphanedInstance`] if the instance's node is
    ///   not in the definition
    /// - [`TransitionError::IllegalTransition`] if no transition leaves
    ///   the node for this action (any action at a terminal node fails
    ///   this way)
    pub fn apply(
        &self,
        instance: &InstanceRef,
        action: &str,
        actor: &Actor,
        note: Option<String>,
    ) -> Result<TransitionOutcome, TransitionError> {
        if self.index.node(&instance.current_node).is_none() {
            return Err(TransitionError::OrphanedInstance {
                node: instance.current_node.clone(),
            });
        }

        let transition = self
            .index
            .resolve(&instance.current_node, action)
            .ok_or_else(|| TransitionError::IllegalTransition {
                from_node: instance.current_node.clone(),
                action: action.to_string(),
            })?;

        let record = HistoryRecord::new(instance.id.clone(), action, actor.id(), note);

        debug!(
            instance = %instance.id,
            from = %instance.current_node,
            to = %transition.to_node,
            action,
            "applied transition"
        );

        Ok(TransitionOutcome {
            new_node: transition.to_node.clone(),
            record,
        })
    }

    /// Applies the same action to a batch of instances.
    ///
    /// Failures are isolated per instance: one illegal transition never
    /// aborts the rest of the batch. Batch applications carry no note.
    #[must_use]
    pub fn apply_batch(
        &self,
        instances: &[InstanceRef],
        action: &str,
        actor: &Actor,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for instance in instances {
            match self.apply(instance, action, actor, None) {
                Ok(outcome) => report.successes.push(outcome),
                Err(error) => report.failures.push(BatchFailure {
                    instance_id: instance.id.clone(),
                    error,
                }),
            }
        }
        report
    }
}
