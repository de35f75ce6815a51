//! Review bindings for reviewable resource types.
//!
//! Each resource type carries at most one binding naming the workflow
//! definition that reviews it, plus an enabled flag. The set of resource
//! types is fixed at compile time: bindings are wiring between known
//! surfaces, not an open plugin registry.

use chrono::{DateTime, Utc};
use greenlight_core::WorkflowId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reviewable resource type in the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Media assets such as images, video, and attachments.
    Media,
    /// Knowledge base entries.
    Knowledge,
}

impl ResourceType {
    /// Every reviewable resource type, in display order.
    pub const ALL: [Self; 2] = [Self::Media, Self::Knowledge];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Knowledge => "knowledge",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The review wiring for one resource type.
///
/// Disabling a binding suspends gating without forgetting which
/// definition the resource type was wired to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceBinding {
    /// The resource type this binding wires.
    pub resource_type: ResourceType,
    /// The workflow definition reviewing this resource type.
    pub workflow_id: WorkflowId,
    /// Whether review gating is currently in force.
    pub enabled: bool,
    /// When the binding last changed.
    pub updated_at: DateTime<Utc>,
}

impl ResourceBinding {
    /// Creates an enabled binding stamped with the current time.
    #[must_use]
    pub fn new(resource_type: ResourceType, workflow_id: WorkflowId) -> Self {
        Self {
            resource_type,
            workflow_id,
            enabled: true,
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_types_display_as_snake_case() {
        assert_eq!(ResourceType::Media.to_string(), "media");
        assert_eq!(ResourceType::Knowledge.to_string(), "knowledge");
    }

    #[test]
    fn resource_type_serialization_format() {
        let json = serde_json::to_value(ResourceType::Knowledge).expect("serialize");
        assert_eq!(json, serde_json::json!("knowledge"));

        let parsed: ResourceType = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, ResourceType::Knowledge);
    }

    #[test]
    fn all_covers_every_resource_type() {
        assert_eq!(ResourceType::ALL.len(), 2);
        assert!(ResourceType::ALL.contains(&ResourceType::Media));
        assert!(ResourceType::ALL.contains(&ResourceType::Knowledge));
    }

    #[test]
    fn new_bindings_start_enabled() {
        let binding = ResourceBinding::new(ResourceType::Media, WorkflowId::new());
        assert!(binding.enabled);
        assert_eq!(binding.resource_type, ResourceType::Media);
    }

    #[test]
    fn binding_serde_roundtrip() {
        let binding = ResourceBinding::new(ResourceType::Knowledge, WorkflowId::new());
        let json = serde_json::to_string(&binding).expect("serialize");
        let parsed: ResourceBinding = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, binding);
    }
}
