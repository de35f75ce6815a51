//! Definition validation.
//!
//! Validation accumulates every problem it can find instead of stopping at
//! the first, so the editor can annotate all offending fields in one pass.
//! How strictly a problem is judged depends on the profile: a definition
//! mid-edit may carry dead ends as warnings, but saving or publishing one
//! is refused.
//!
//! Cycles are not checked. Review flows loop legally (a rejected draft goes
//! back for rework); only unreachable nodes and dead ends are worth
//! flagging.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::definition::WorkflowDefinition;

/// How strictly to judge a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationProfile {
    /// Mid-edit checks: incomplete flows are tolerated as warnings.
    Draft,
    /// Save-time checks: a definition must be fully executable.
    Publish,
}

/// Severity of a single violation under a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth surfacing, does not block a save.
    Warning,
    /// Blocks a save.
    Error,
}

/// A single validation problem, tied to the field that caused it.
///
/// Positions are list indices so the editor can annotate the exact row the
/// author typed into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    /// A node has an empty id.
    EmptyNodeId { position: usize },
    /// A node reuses an id declared earlier in the list.
    DuplicateNodeId { position: usize, id: String },
    /// An action has an empty id.
    EmptyActionId { position: usize },
    /// An action reuses an id declared earlier in the list.
    DuplicateActionId { position: usize, id: String },
    /// No node has kind `start`.
    NoStartNode,
    /// No node has kind `terminal`.
    NoTerminalNode,
    /// A transition's from_node references no declared node.
    UnknownFromNode { position: usize, id: String },
    /// A transition's to_node references no declared node.
    UnknownToNode { position: usize, id: String },
    /// A transition's action references no declared action.
    UnknownAction { position: usize, id: String },
    /// A second transition reuses a (from_node, action) pair, making
    /// routing ambiguous.
    DuplicateRoute {
        position: usize,
        from_node: String,
        action: String,
    },
    /// A transition leaves a terminal node.
    TerminalWithOutgoing { position: usize, node: String },
    /// A non-terminal node has no outgoing transition, so instances
    /// reaching it are stuck.
    DeadEndNode { position: usize, id: String },
    /// A node no path from any start node reaches.
    UnreachableNode { position: usize, id: String },
}

impl Violation {
    /// Severity of this violation under the given profile.
    ///
    /// Dead ends are the one profile-dependent case: tolerated mid-edit,
    /// refused on save. Unreachable nodes are always warnings; an instance
    /// can never land on one, so they are clutter rather than a hazard.
    #[must_use]
    pub fn severity(&self, profile: ValidationProfile) -> Severity {
        match self {
            Self::DeadEndNode { .. } => match profile {
                ValidationProfile::Draft => Severity::Warning,
                ValidationProfile::Publish => Severity::Error,
            },
            Self::UnreachableNode { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Editor-style path of the field this violation applies to.
    #[must_use]
    pub fn field(&self) -> String {
        match self {
            Self::EmptyNodeId { position } | Self::DuplicateNodeId { position, .. } => {
                format!("nodes[{position}].id")
            }
            Self::EmptyActionId { position } | Self::DuplicateActionId { position, .. } => {
                format!("actions[{position}].id")
            }
            Self::NoStartNode | Self::NoTerminalNode => "nodes".to_string(),
            Self::UnknownFromNode { position, .. } => format!("transitions[{position}].from_node"),
            Self::UnknownToNode { position, .. } => format!("transitions[{position}].to_node"),
            Self::UnknownAction { position, .. } => format!("transitions[{position}].action"),
            Self::DuplicateRoute { position, .. }
            | Self::TerminalWithOutgoing { position, .. } => format!("transitions[{position}]"),
            Self::DeadEndNode { position, .. } | Self::UnreachableNode { position, .. } => {
                format!("nodes[{position}]")
            }
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyNodeId { position } => {
                write!(f, "node at position {position} has an empty id")
            }
            Self::DuplicateNodeId { id, .. } => write!(f, "duplicate node id '{id}'"),
            Self::EmptyActionId { position } => {
                write!(f, "action at position {position} has an empty id")
            }
            Self::DuplicateActionId { id, .. } => write!(f, "duplicate action id '{id}'"),
            Self::NoStartNode => write!(f, "definition has no start node"),
            Self::NoTerminalNode => write!(f, "definition has no terminal node"),
            Self::UnknownFromNode { id, .. } => {
                write!(f, "transition references unknown from_node '{id}'")
            }
            Self::UnknownToNode { id, .. } => {
                write!(f, "transition references unknown to_node '{id}'")
            }
            Self::UnknownAction { id, .. } => {
                write!(f, "transition references unknown action '{id}'")
            }
            Self::DuplicateRoute {
                from_node, action, ..
            } => {
                write!(f, "more than one transition from '{from_node}' for action '{action}'")
            }
            Self::TerminalWithOutgoing { node, .. } => {
                write!(f, "terminal node '{node}' has an outgoing transition")
            }
            Self::DeadEndNode { id, .. } => {
                write!(f, "non-terminal node '{id}' has no outgoing transition")
            }
            Self::UnreachableNode { id, .. } => {
                write!(f, "node '{id}' is unreachable from any start node")
            }
        }
    }
}

/// Outcome of validating a definition under a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    profile: ValidationProfile,
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// The profile the definition was judged under.
    #[must_use]
    pub fn profile(&self) -> ValidationProfile {
        self.profile
    }

    /// All violations, in check order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Violations that block a save under this report's profile.
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity(self.profile) == Severity::Error)
    }

    /// Violations surfaced without blocking a save.
    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity(self.profile) == Severity::Warning)
    }

    /// True when nothing blocks a save.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// True when the definition produced no violations at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "definition is valid");
        }
        write!(
            f,
            "{} error(s), {} warning(s)",
            self.errors().count(),
            self.warnings().count()
        )
    }
}

/// Validates a definition, accumulating every detectable problem.
///
/// Validation is pure: the same definition and profile always produce the
/// same report.
#[must_use]
pub fn validate(definition: &WorkflowDefinition, profile: ValidationProfile) -> ValidationReport {
    let mut violations = Vec::new();

    check_node_ids(definition, &mut violations);
    check_action_ids(definition, &mut violations);
    check_lifecycle_anchors(definition, &mut violations);
    check_transition_references(definition, &mut violations);
    check_route_determinism(definition, &mut violations);
    check_node_flow(definition, &mut violations);
    check_reachability(definition, &mut violations);

    ValidationReport {
        profile,
        violations,
    }
}

fn check_node_ids(definition: &WorkflowDefinition, violations: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for (position, node) in definition.nodes.iter().enumerate() {
        if node.id.is_empty() {
            violations.push(Violation::EmptyNodeId { position });
            continue;
        }
        if !seen.insert(node.id.as_str()) {
            violations.push(Violation::DuplicateNodeId {
                position,
                id: node.id.clone(),
            });
        }
    }
}

fn check_action_ids(definition: &WorkflowDefinition, violations: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for (position, action) in definition.actions.iter().enumerate() {
        if action.id.is_empty() {
            violations.push(Violation::EmptyActionId { position });
            continue;
        }
        if !seen.insert(action.id.as_str()) {
            violations.push(Violation::DuplicateActionId {
                position,
                id: action.id.clone(),
            });
        }
    }
}

fn check_lifecycle_anchors(definition: &WorkflowDefinition, violations: &mut Vec<Violation>) {
    if !definition.nodes.iter().any(|n| n.kind.is_start()) {
        violations.push(Violation::NoStartNode);
    }
    if !definition.nodes.iter().any(|n| n.kind.is_terminal()) {
        violations.push(Violation::NoTerminalNode);
    }
}

fn check_transition_references(definition: &WorkflowDefinition, violations: &mut Vec<Violation>) {
    let node_ids: HashSet<&str> = definition.nodes.iter().map(|n| n.id.as_str()).collect();
    let action_ids: HashSet<&str> = definition.actions.iter().map(|a| a.id.as_str()).collect();

    for (position, transition) in definition.transitions.iter().enumerate() {
        if !node_ids.contains(transition.from_node.as_str()) {
            violations.push(Violation::UnknownFromNode {
                position,
                id: transition.from_node.clone(),
            });
        }
        if !node_ids.contains(transition.to_node.as_str()) {
            violations.push(Violation::UnknownToNode {
                position,
                id: transition.to_node.clone(),
            });
        }
        if !action_ids.contains(transition.action.as_str()) {
            violations.push(Violation::UnknownAction {
                position,
                id: transition.action.clone(),
            });
        }
    }
}

fn check_route_determinism(definition: &WorkflowDefinition, violations: &mut Vec<Violation>) {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    for (position, transition) in definition.transitions.iter().enumerate() {
        let route = (transition.from_node.as_str(), transition.action.as_str());
        if !seen.insert(route) {
            violations.push(Violation::DuplicateRoute {
                position,
                from_node: transition.from_node.clone(),
                action: transition.action.clone(),
            });
        }
    }
}

fn check_node_flow(definition: &WorkflowDefinition, violations: &mut Vec<Violation>) {
    for (position, transition) in definition.transitions.iter().enumerate() {
        let leaves_terminal = definition
            .node(&transition.from_node)
            .is_some_and(|n| n.kind.is_terminal());
        if leaves_terminal {
            violations.push(Violation::TerminalWithOutgoing {
                position,
                node: transition.from_node.clone(),
            });
        }
    }

    let with_outgoing: HashSet<&str> = definition
        .transitions
        .iter()
        .map(|t| t.from_node.as_str())
        .collect();

    for (position, node) in definition.nodes.iter().enumerate() {
        if !node.kind.is_terminal() && !with_outgoing.contains(node.id.as_str()) {
            violations.push(Violation::DeadEndNode {
                position,
                id: node.id.clone(),
            });
        }
    }
}

fn check_reachability(definition: &WorkflowDefinition, violations: &mut Vec<Violation>) {
    let start_nodes: Vec<&str> = definition
        .nodes
        .iter()
        .filter(|n| n.kind.is_start())
        .map(|n| n.id.as_str())
        .collect();
    if start_nodes.is_empty() {
        // No anchor to walk from; already reported by the lifecycle check.
        return;
    }

    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

    for node in &definition.nodes {
        if node.id.is_empty() || indices.contains_key(node.id.as_str()) {
            // Already reported by the id checks.
            continue;
        }
        let index = graph.add_node(node.id.as_str());
        indices.insert(node.id.as_str(), index);
    }

    for transition in &definition.transitions {
        let endpoints = (
            indices.get(transition.from_node.as_str()),
            indices.get(transition.to_node.as_str()),
        );
        // Dangling references are reported by the reference checks.
        if let (Some(&from), Some(&to)) = endpoints {
            graph.add_edge(from, to, ());
        }
    }

    let mut reached: HashSet<NodeIndex> = HashSet::new();
    for start in &start_nodes {
        let Some(&index) = indices.get(start) else {
            continue;
        };
        let mut dfs = Dfs::new(&graph, index);
        while let Some(visited) = dfs.next(&graph) {
            reached.insert(visited);
        }
    }

    for (position, node) in definition.nodes.iter().enumerate() {
        if node.kind.is_start() {
            continue;
        }
        let Some(&index) = indices.get(node.id.as_str()) else {
            continue;
        };
        if !reached.contains(&index) {
            violations.push(Violation::UnreachableNode {
                position,
                id: node.id.clone(),
            });
        }
    }
}
