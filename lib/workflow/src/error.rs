//! Error types for the workflow crate.
//!
//! Runtime queries and transitions fail with plain enums here. Definition
//! problems are not errors: the validator accumulates them into a
//! [`crate::validator::ValidationReport`] so the editor can show every
//! offending field at once.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors from resolver queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveError {
    /// The instance's recorded node is absent from the definition.
    ///
    /// This is a distinct condition rather than an empty answer so the
    /// console can surface stranded instances for remediation.
    OrphanedInstance { node: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanedInstance { node } => {
                write!(f, "instance is orphaned: node '{node}' is not in the definition")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Errors from applying a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionError {
    /// No transition leaves the current node for this action.
    ///
    /// Any action at a terminal node fails this way, since terminal nodes
    /// have no outgoing transitions.
    IllegalTransition { from_node: String, action: String },
    /// The instance's recorded node is absent from the definition.
    OrphanedInstance { node: String },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalTransition { from_node, action } => {
                write!(f, "no transition from '{from_node}' for action '{action}'")
            }
            Self::OrphanedInstance { node } => {
                write!(f, "instance is orphaned: node '{node}' is not in the definition")
            }
        }
    }
}

impl std::error::Error for TransitionError {}
