//! Workflow definition types.
//!
//! A review workflow is a finite state machine described by three flat lists:
//! - Nodes: the states a resource instance can occupy
//! - Actions: the operations reviewers invoke
//! - Transitions: (from_node, action) -> to_node routing rules
//!
//! The flat lists are the source of truth and serialize directly as the
//! editor payload. Adjacency is derived on demand (see
//! [`crate::index::DefinitionIndex`]), never stored, so a definition never
//! carries state that can drift out of sync with its lists.
//!
//! Node and action identifiers are author-chosen strings scoped to one
//! definition. Saving always replaces the whole definition.

use chrono::{DateTime, Utc};
use greenlight_core::WorkflowId;
use serde::{Deserialize, Serialize};

use crate::validator::{self, ValidationProfile, ValidationReport};

/// Position of a node within the review lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Entry state for newly created resource instances.
    Start,
    /// In-flight review state.
    Intermediate,
    /// Final state; no transition may leave it.
    Terminal,
}

impl NodeKind {
    /// Returns true for start nodes.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    /// Returns true for terminal nodes.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }
}

/// A state a resource instance can occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Identifier unique within the definition, chosen by the author.
    pub id: String,
    /// Human-readable name shown in the console.
    pub name: String,
    /// Where this node sits in the lifecycle.
    pub kind: NodeKind,
    /// Role ids allowed to see instances in this state.
    ///
    /// How an empty list is read is a resolver policy
    /// (see [`crate::resolver::RolePolicy`]).
    #[serde(default)]
    pub view_roles: Vec<String>,
    /// Role ids allowed to act on instances in this state.
    #[serde(default)]
    pub edit_roles: Vec<String>,
}

impl Node {
    /// Creates a node with empty role lists.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            view_roles: Vec::new(),
            edit_roles: Vec::new(),
        }
    }

    /// Sets the view role list.
    #[must_use]
    pub fn with_view_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the edit role list.
    #[must_use]
    pub fn with_edit_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.edit_roles = roles.into_iter().map(Into::into).collect();
        self
    }
}

/// An operation reviewers can invoke, independent of where it applies.
///
/// Which nodes an action applies to is expressed only through transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Identifier unique within the definition.
    pub id: String,
    /// Human-readable name shown on buttons and in history.
    pub name: String,
}

impl Action {
    /// Creates an action.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A routing rule: applying `action` to an instance on `from_node` moves it
/// to `to_node`.
///
/// A valid definition has at most one transition per (from_node, action)
/// pair, so routing is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Node the instance must occupy for this rule to apply.
    pub from_node: String,
    /// Action that triggers the move.
    pub action: String,
    /// Node the instance lands on.
    pub to_node: String,
}

impl Transition {
    /// Creates a transition.
    #[must_use]
    pub fn new(
        from_node: impl Into<String>,
        action: impl Into<String>,
        to_node: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            action: action.into(),
            to_node: to_node.into(),
        }
    }
}

/// A complete review workflow definition.
///
/// This is the unit the editor loads, edits, and saves back whole. The
/// `code` is the stable machine identifier other systems key on and is
/// fixed once the definition is created; `name` is free to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Unique identifier for this definition.
    pub id: WorkflowId,
    /// Stable machine code, fixed at creation.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Built-in definitions ship with the platform and cannot be deleted.
    pub is_system: bool,
    /// The states of the machine.
    pub nodes: Vec<Node>,
    /// The operations reviewers can invoke.
    pub actions: Vec<Action>,
    /// The routing rules.
    pub transitions: Vec<Transition>,
    /// When this definition was created.
    pub created_at: DateTime<Utc>,
    /// When this definition was last updated.
    pub updated_at: DateTime<Utc>,
}

impl WorkflowDefinition {
    /// Creates an empty operator-authored definition.
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_id(WorkflowId::new(), code, name)
    }

    /// Creates an empty definition with a specific ID.
    #[must_use]
    pub fn with_id(id: WorkflowId, code: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            code: code.into(),
            name: name.into(),
            is_system: false,
            nodes: Vec::new(),
            actions: Vec::new(),
            transitions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a node.
    #[must_use]
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds an action.
    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a transition.
    #[must_use]
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Returns the node with the given id, if any.
    ///
    /// Linear scan; definitions are authoring-sized. Hot paths go through
    /// [`crate::index::DefinitionIndex`] instead.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Returns the action with the given id, if any.
    #[must_use]
    pub fn action(&self, id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Returns all start nodes.
    #[must_use]
    pub fn start_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.kind.is_start()).collect()
    }

    /// Returns all terminal nodes.
    #[must_use]
    pub fn terminal_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.kind.is_terminal()).collect()
    }

    /// Renames the definition (the `code` never changes).
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Marks the definition as updated (bumps updated_at timestamp).
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Validates the definition under the given profile.
    #[must_use]
    pub fn validate(&self, profile: ValidationProfile) -> ValidationReport {
        validator::validate(self, profile)
    }

    /// The built-in review flow every deployment ships with.
    ///
    /// Instances start on `start`, move to `review` on `submit`, and end on
    /// `approved` or `rejected`. Marked as a system definition.
    #[must_use]
    pub fn standard_review() -> Self {
        let mut definition = Self::new("standard_review", "Standard review")
            .with_node(Node::new("start", "Start", NodeKind::Start))
            .with_node(Node::new("review", "In review", NodeKind::Intermediate))
            .with_node(Node::new("approved", "Approved", NodeKind::Terminal))
            .with_node(Node::new("rejected", "Rejected", NodeKind::Terminal))
            .with_action(Action::new("submit", "Submit for review"))
            .with_action(Action::new("approve", "Approve"))
            .with_action(Action::new("reject", "Reject"))
            .with_transition(Transition::new("start", "submit", "review"))
            .with_transition(Transition::new("review", "approve", "approved"))
            .with_transition(Transition::new("review", "reject", "rejected"));
        definition.is_system = true;
        definition
    }
}

/// Summary information about a definition (for listings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionSummary {
    /// Definition ID.
    pub id: WorkflowId,
    /// Stable machine code.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Whether this is a built-in definition.
    pub is_system: bool,
    /// Number of nodes.
    pub node_count: usize,
    /// Number of actions.
    pub action_count: usize,
    /// Last updated timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&WorkflowDefinition> for DefinitionSummary {
    fn from(definition: &WorkflowDefinition) -> Self {
        Self {
            id: definition.id,
            code: definition.code.clone(),
            name: definition.name.clone(),
            is_system: definition.is_system,
            node_count: definition.nodes.len(),
            action_count: definition.actions.len(),
            updated_at: definition.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn definition_creation() {
        let definition = WorkflowDefinition::new("media_review", "Media review");
        assert_eq!(definition.code, "media_review");
        assert_eq!(definition.name, "Media review");
        assert!(!definition.is_system);
        assert!(definition.nodes.is_empty());
        assert_eq!(definition.created_at, definition.updated_at);
    }

    #[test]
    fn builder_assembles_lists() {
        let definition = WorkflowDefinition::new("flow", "Flow")
            .with_node(Node::new("a", "A", NodeKind::Start))
            .with_node(Node::new("b", "B", NodeKind::Terminal))
            .with_action(Action::new("go", "Go"))
            .with_transition(Transition::new("a", "go", "b"));

        assert_eq!(definition.nodes.len(), 2);
        assert_eq!(definition.actions.len(), 1);
        assert_eq!(definition.transitions.len(), 1);
        assert_eq!(definition.transitions[0].to_node, "b");
    }

    #[test]
    fn node_and_action_lookup() {
        let definition = WorkflowDefinition::standard_review();

        assert_eq!(definition.node("review").map(|n| n.kind), Some(NodeKind::Intermediate));
        assert!(definition.node("missing").is_none());
        assert_eq!(definition.action("approve").map(|a| a.name.as_str()), Some("Approve"));
        assert!(definition.action("missing").is_none());
    }

    #[test]
    fn start_and_terminal_nodes() {
        let definition = WorkflowDefinition::standard_review();

        let starts: Vec<_> = definition.start_nodes().iter().map(|n| n.id.clone()).collect();
        let terminals: Vec<_> = definition.terminal_nodes().iter().map(|n| n.id.clone()).collect();

        assert_eq!(starts, vec!["start"]);
        assert_eq!(terminals, vec!["approved", "rejected"]);
    }

    #[test]
    fn rename_bumps_updated_at() {
        let mut definition = WorkflowDefinition::new("flow", "Flow");
        let original_updated_at = definition.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(1));
        definition.rename("Renamed flow");

        assert_eq!(definition.name, "Renamed flow");
        assert_eq!(definition.code, "flow");
        assert!(definition.updated_at > original_updated_at);
    }

    #[test]
    fn node_role_builders() {
        let node = Node::new("review", "In review", NodeKind::Intermediate)
            .with_view_roles(["reviewer", "editor"])
            .with_edit_roles(["reviewer"]);

        assert_eq!(node.view_roles, vec!["reviewer", "editor"]);
        assert_eq!(node.edit_roles, vec!["reviewer"]);
    }

    #[test]
    fn standard_review_shape() {
        let definition = WorkflowDefinition::standard_review();

        assert!(definition.is_system);
        assert_eq!(definition.nodes.len(), 4);
        assert_eq!(definition.actions.len(), 3);
        assert_eq!(definition.transitions.len(), 3);
        assert!(definition.validate(ValidationProfile::Publish).is_valid());
    }

    #[test]
    fn summary_from_definition() {
        let definition = WorkflowDefinition::standard_review();
        let summary = DefinitionSummary::from(&definition);

        assert_eq!(summary.id, definition.id);
        assert_eq!(summary.code, "standard_review");
        assert!(summary.is_system);
        assert_eq!(summary.node_count, 4);
        assert_eq!(summary.action_count, 3);
    }

    #[test]
    fn transition_payload_field_names() {
        let transition = Transition::new("start", "submit", "review");
        let json = serde_json::to_value(&transition).expect("serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "from_node": "start",
                "action": "submit",
                "to_node": "review",
            })
        );
    }

    #[test]
    fn node_kind_serialization_format() {
        let json = serde_json::to_string(&NodeKind::Start).expect("serialize");
        assert_eq!(json, "\"start\"");

        let json = serde_json::to_string(&NodeKind::Intermediate).expect("serialize");
        assert_eq!(json, "\"intermediate\"");

        let json = serde_json::to_string(&NodeKind::Terminal).expect("serialize");
        assert_eq!(json, "\"terminal\"");
    }

    #[test]
    fn node_role_lists_default_to_empty() {
        let json = r#"{"id":"review","name":"In review","kind":"intermediate"}"#;
        let node: Node = serde_json::from_str(json).expect("deserialize");

        assert!(node.view_roles.is_empty());
        assert!(node.edit_roles.is_empty());
    }

    #[test]
    fn incomplete_node_payload_is_rejected() {
        // Missing `kind` is a structural error, caught before validation.
        let json = r#"{"id":"review","name":"In review"}"#;
        let result: Result<Node, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn definition_serde_roundtrip() {
        let definition = WorkflowDefinition::standard_review();
        let json = serde_json::to_string(&definition).expect("serialize");
        let parsed: WorkflowDefinition = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(definition, parsed);
    }
}
