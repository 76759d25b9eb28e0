//! Event sink system for observability.
//!
//! The executor reports the lifecycle of every run and every plugin to an
//! [`EventSink`]. Sinks never influence execution.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, RecordedEvent};

/// A run began.
pub const EXECUTION_STARTED: &str = "execution.started";
/// A run finished and its aggregate was built.
pub const EXECUTION_COMPLETED: &str = "execution.completed";
/// A plugin is about to run.
pub const PLUGIN_STARTED: &str = "plugin.started";
/// A plugin returned a successful result.
pub const PLUGIN_COMPLETED: &str = "plugin.completed";
/// A plugin returned an unsuccessful result.
pub const PLUGIN_FAILED: &str = "plugin.failed";
/// A plugin raised a fault that was captured.
pub const PLUGIN_FAULTED: &str = "plugin.faulted";
