//! Resource binding registry and review service for greenlight.
//!
//! Wires the fixed set of reviewable resource types to workflow
//! definitions and composes the surfaces an admin backend consumes:
//!
//! - [`BindingRegistry`]: one guarded review binding per resource type,
//!   with rebind protection for live instances
//! - [`ReviewService`]: definition lifecycle and gate resolution over a
//!   pluggable [`DefinitionStore`]
//! - [`EngineConfig`]: policy knobs loaded from the environment

pub mod binding;
pub mod config;
pub mod error;
pub mod registry;
pub mod service;
pub mod store;

pub use binding::{ResourceBinding, ResourceType};
pub use config::EngineConfig;
pub use error::{BindingError, ServiceError};
pub use registry::{BindingRegistry, RebindOutcome, RebindPolicy};
pub use service::{ReviewGate, ReviewService};
pub use store::{DefinitionStore, StoreError};
