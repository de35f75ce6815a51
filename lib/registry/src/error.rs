//! Error types for binding and service operations.

use greenlight_core::WorkflowId;
use greenlight_workflow::ValidationReport;
use std::fmt;

use crate::binding::ResourceType;
use crate::store::StoreError;

/// Errors from binding registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The definition failed publish-profile validation.
    DefinitionInvalid { report: ValidationReport },
    /// Rebinding would leave live instances on nodes the incoming
    /// definition does not have.
    WouldOrphanInstances {
        resource_type: ResourceType,
        instance_ids: Vec<String>,
    },
    /// The resource type has no binding.
    NotBound { resource_type: ResourceType },
    /// Built-in definitions cannot be deleted.
    SystemDefinition { workflow_id: WorkflowId },
    /// The definition is still wired to a resource type.
    StillBound {
        workflow_id: WorkflowId,
        resource_type: ResourceType,
    },
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefinitionInvalid { report } => {
                write!(f, "definition failed validation: {report}")
            }
            Self::WouldOrphanInstances {
                resource_type,
                instance_ids,
            } => write!(
                f,
                "rebinding '{resource_type}' would orphan {} live instance(s)",
                instance_ids.len()
            ),
            Self::NotBound { resource_type } => {
                write!(f, "no review binding for resource type '{resource_type}'")
            }
            Self::SystemDefinition { workflow_id } => {
                write!(f, "system definition {workflow_id} cannot be deleted")
            }
            Self::StillBound {
                workflow_id,
                resource_type,
            } => write!(
                f,
                "definition {workflow_id} is still bound to resource type '{resource_type}'"
            ),
        }
    }
}

impl std::error::Error for BindingError {}

/// Errors from the review service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Definition storage failed.
    Store(StoreError),
    /// A binding operation failed.
    Binding(BindingError),
    /// The definition failed publish-profile validation on save.
    DefinitionInvalid { report: ValidationReport },
    /// A save attempted to change a definition's immutable code.
    CodeChanged {
        workflow_id: WorkflowId,
        existing: String,
        incoming: String,
    },
    /// Engine configuration could not be loaded.
    Config { message: String },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "definition store error: {e}"),
            Self::Binding(e) => write!(f, "binding error: {e}"),
            Self::DefinitionInvalid { report } => {
                write!(f, "definition failed validation: {report}")
            }
            Self::CodeChanged {
                workflow_id,
                existing,
                incoming,
            } => write!(
                f,
                "definition {workflow_id} code is immutable: '{existing}' cannot become '{incoming}'"
            ),
            Self::Config { message } => write!(f, "engine configuration error: {message}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<BindingError> for ServiceError {
    fn from(e: BindingError) -> Self {
        Self::Binding(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_error_display() {
        let error = BindingError::NotBound {
            resource_type: ResourceType::Media,
        };
        assert_eq!(
            error.to_string(),
            "no review binding for resource type 'media'"
        );

        let error = BindingError::WouldOrphanInstances {
            resource_type: ResourceType::Knowledge,
            instance_ids: vec!["kb-1".into(), "kb-2".into()],
        };
        assert_eq!(
            error.to_string(),
            "rebinding 'knowledge' would orphan 2 live instance(s)"
        );
    }

    #[test]
    fn service_error_wraps_store_and_binding_errors() {
        let workflow_id = WorkflowId::new();
        let error: ServiceError = StoreError::NotFound { workflow_id }.into();
        assert!(matches!(error, ServiceError::Store(_)));

        let error: ServiceError = BindingError::SystemDefinition { workflow_id }.into();
        assert!(matches!(error, ServiceError::Binding(_)));
        assert!(error.to_string().contains("cannot be deleted"));
    }
}
