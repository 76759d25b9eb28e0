//! Execution context handed to every plugin of a run.
//!
//! This module provides:
//! - The immutable carrier of category and payload
//! - A shared metadata bag plugins may use for cross-plugin signals

mod execution;
mod metadata;

pub use execution::ExecutionContext;
pub use metadata::MetadataBag;
