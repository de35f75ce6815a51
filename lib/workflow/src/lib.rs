//! Review workflow engine for greenlight.
//!
//! A workflow definition is a finite state machine over content review
//! states: nodes are the states, actions are the operations reviewers
//! invoke, and transitions route (from_node, action) pairs to new nodes.
//! This crate owns the definition model, its validation, and the two
//! runtime surfaces:
//! - [`StateResolver`] answers what a UI may show for an instance
//! - [`TransitionExecutor`] applies actions and emits history records
//!
//! Persistence of definitions, instances, and history belongs to the
//! embedding application. Everything here is synchronous and in-memory;
//! the executor returns what to write, it never writes.
//!
//! # Example
//!
//! ```
//! use greenlight_access::{Actor, RoleSet};
//! use greenlight_core::UserId;
//! use greenlight_workflow::{
//!     InstanceRef, StateResolver, TransitionExecutor, ValidationProfile, WorkflowDefinition,
//! };
//!
//! let definition = WorkflowDefinition::standard_review();
//! assert!(definition.validate(ValidationProfile::Publish).is_valid());
//!
//! let resolver = StateResolver::new(&definition);
//! let actions = resolver.available_actions("review").expect("known node");
//! assert_eq!(actions.len(), 2);
//!
//! let reviewer = Actor::new(UserId::new(), RoleSet::from_ids(["reviewer"]));
//! let executor = TransitionExecutor::new(&definition);
//! let outcome = executor
//!     .apply(&InstanceRef::new("article-7", "review"), "approve", &reviewer, None)
//!     .expect("legal transition");
//! assert_eq!(outcome.new_node, "approved");
//! ```

pub mod definition;
pub mod error;
pub mod executor;
pub mod history;
pub mod index;
pub mod resolver;
pub mod validator;

// Re-export main types at crate root
pub use definition::{Action, DefinitionSummary, Node, NodeKind, Transition, WorkflowDefinition};
pub use error::{ResolveError, TransitionError};
pub use executor::{BatchFailure, BatchReport, InstanceRef, TransitionExecutor, TransitionOutcome};
pub use history::HistoryRecord;
pub use index::DefinitionIndex;
pub use resolver::{RolePolicy, StateResolver};
pub use validator::{Severity, ValidationProfile, ValidationReport, Violation, validate};
