//! Definition persistence seam.
//!
//! Workflow definitions live in the embedding application's storage. The
//! engine consumes them through [`DefinitionStore`] so the service layer
//! stays independent of any particular backend and can be tested against
//! an in-memory implementation.

use async_trait::async_trait;
use greenlight_core::WorkflowId;
use greenlight_workflow::{DefinitionSummary, WorkflowDefinition};
use std::fmt;

/// Errors from definition storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No definition exists with the given id.
    NotFound { workflow_id: WorkflowId },
    /// The backing store could not be reached.
    ConnectionFailed { message: String },
    /// The backing store rejected the request.
    RequestFailed { message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { workflow_id } => {
                write!(f, "definition not found: {workflow_id}")
            }
            Self::ConnectionFailed { message } => {
                write!(f, "definition store connection failed: {message}")
            }
            Self::RequestFailed { message } => {
                write!(f, "definition store request failed: {message}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Storage backend for workflow definitions.
#[async_trait]
pub trait DefinitionStore: Send + Sync {
    /// Loads a definition by id.
    async fn fetch(&self, workflow_id: WorkflowId) -> Result<WorkflowDefinition, StoreError>;

    /// Lists summaries of every stored definition.
    async fn list(&self) -> Result<Vec<DefinitionSummary>, StoreError>;

    /// Saves a definition, replacing any existing one with the same id.
    async fn save(&self, definition: WorkflowDefinition) -> Result<(), StoreError>;

    /// Deletes a definition by id.
    async fn delete(&self, workflow_id: WorkflowId) -> Result<(), StoreError>;
}
