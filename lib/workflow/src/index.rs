//! Lookup index over a workflow definition.
//!
//! The definition stores flat lists; resolver and executor queries need
//! by-id and by-(from_node, action) access. The index borrows a definition
//! and is rebuilt per use, so the serialized model never carries derived
//! state.

use std::collections::HashMap;

use crate::definition::{Action, Node, Transition, WorkflowDefinition};

/// Borrowed lookup tables for one definition.
#[derive(Debug)]
pub struct DefinitionIndex<'a> {
    definition: &'a WorkflowDefinition,
    nodes: HashMap<&'a str, &'a Node>,
    actions: HashMap<&'a str, &'a Action>,
    outgoing: HashMap<&'a str, Vec<&'a Transition>>,
    routes: HashMap<&'a str, HashMap<&'a str, &'a Transition>>,
}

impl<'a> DefinitionIndex<'a> {
    /// Builds the index.
    ///
    /// On definitions with duplicate ids or routes the last entry wins;
    /// the validator reports such definitions before they reach query
    /// paths.
    #[must_use]
    pub fn new(definition: &'a WorkflowDefinition) -> Self {
        let mut nodes = HashMap::new();
        for node in &definition.nodes {
            nodes.insert(node.id.as_str(), node);
        }

        let mut actions = HashMap::new();
        for action in &definition.actions {
            actions.insert(action.id.as_str(), action);
        }

        let mut outgoing: HashMap<&str, Vec<&Transition>> = HashMap::new();
        let mut routes: HashMap<&str, HashMap<&str, &Transition>> = HashMap::new();
        for transition in &definition.transitions {
            outgoing
                .entry(transition.from_node.as_str())
                .or_default()
                .push(transition);
            routes
                .entry(transition.from_node.as_str())
                .or_default()
                .insert(transition.action.as_str(), transition);
        }

        Self {
            definition,
            nodes,
            actions,
            outgoing,
            routes,
        }
    }

    /// Returns the indexed definition.
    #[must_use]
    pub fn definition(&self) -> &'a WorkflowDefinition {
        self.definition
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    /// Returns the action with the given id.
    #[must_use]
    pub fn action(&self, id: &str) -> Option<&'a Action> {
        self.actions.get(id).copied()
    }

    /// Returns the transitions leaving a node, in definition order.
    #[must_use]
    pub fn transitions_from(&self, node_id: &str) -> &[&'a Transition] {
        self.outgoing.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the transition for a (from_node, action) pair, if any.
    #[must_use]
    pub fn resolve(&self, from_node: &str, action: &str) -> Option<&'a Transition> {
        self.routes
            .get(from_node)
            .and_then(|by_action| by_action.get(action))
            .copied()
    }

    /// Returns true if any transition leaves the node.
    #[must_use]
    pub fn has_outgoing(&self, node_id: &str) -> bool {
        self.outgoing.contains_key(node_id)
    }
}
