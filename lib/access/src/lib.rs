//! Actor identity and role-based access types for the greenlight engine.
//!
//! This crate provides:
//! - Role grants as opaque identifier sets (`RoleSet`, `ADMIN_ROLE`)
//! - The acting user identity attached to review operations (`Actor`)
//!
//! # Access Control Model
//!
//! Workflow nodes carry `view_roles` and `edit_roles` lists of role
//! identifiers. An actor may see or act on a node when their role set
//! intersects the node's list. Admins bypass node-level restrictions, and
//! how an *empty* node list is read is a resolver policy, not something
//! decided here.
//!
//! # Example
//!
//! ```
//! use greenlight_access::{ADMIN_ROLE, Actor, RoleSet};
//! use greenlight_core::UserId;
//!
//! let roles = RoleSet::from_ids(["media-editor", ADMIN_ROLE]);
//! let actor = Actor::new(UserId::new(), roles).with_display_name("Alice");
//!
//! assert!(actor.is_admin());
//! assert!(actor.roles().has_role("media-editor"));
//! ```

pub mod actor;
pub mod role;

// Re-export main types at crate root
pub use actor::Actor;
pub use role::{ADMIN_ROLE, RoleSet};
