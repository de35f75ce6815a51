//! Core domain types and utilities for the greenlight review engine.
//!
//! This crate provides the foundational identifier types and error handling
//! shared by the workflow, access, and registry crates.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{HistoryRecordId, ParseIdError, UserId, WorkflowId};
