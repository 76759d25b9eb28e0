//! # Plugflow
//!
//! A plugin execution engine.
//!
//! Plugflow runs a set of independently authored plugins against a shared,
//! categorized execution context and folds their outcomes into one report:
//!
//! - **Registry**: unique plugin ids, category and identity lookups
//! - **Executor**: sequential (priority-ordered) or parallel runs with
//!   per-plugin fault containment for errors and panics
//! - **Aggregation**: success counts, collected issues and captured faults
//! - **Manager**: a facade that initializes from a registration source
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plugflow::prelude::*;
//!
//! let manager = PluginManager::new();
//! manager.initialize(&StaticSource::new(vec![Arc::new(TotalsCheck::new())]))?;
//!
//! let context = ExecutionContext::new("Invoice", invoice)?.into_shared();
//! let report = manager.execute(context, None, ExecutionMode::Sequential).await?;
//! println!("{}", report.to_json());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod executor;
pub mod manager;
pub mod observability;
pub mod plugins;
pub mod registry;
pub mod sources;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::context::{ExecutionContext, MetadataBag};
    pub use crate::core::{PluginIssue, PluginResult, ResultSeverity};
    pub use crate::errors::{FaultKind, PluginFault, PluginflowError, Result};
    pub use crate::events::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, RecordedEvent};
    pub use crate::executor::{ExecutionMode, ExecutionResult, PluginExecutionResult, PluginExecutor};
    pub use crate::manager::{ManagerState, PluginFilter, PluginManager};
    pub use crate::plugins::{FnPlugin, Plugin};
    pub use crate::registry::PluginRegistry;
    pub use crate::sources::{
        DirectorySource, FnSource, ManifestSource, PluginCatalog, PluginManifest, PluginSource,
        StaticSource,
    };
    pub use std::sync::Arc;
}
