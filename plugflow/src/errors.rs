//! Error types for the plugflow engine.
//!
//! Two families live here. [`PluginflowError`] covers programmer and
//! configuration mistakes that are surfaced synchronously to the caller.
//! [`PluginFault`] describes a failure raised inside a plugin; the executor
//! captures it into the aggregate and never propagates it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PluginflowError>;

/// The main error type for plugflow operations.
#[derive(Debug, Error)]
pub enum PluginflowError {
    /// A malformed call: empty plugin id, empty category, wrong payload type.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A plugin with the same id is already registered.
    #[error("Plugin with ID '{id}' is already registered")]
    DuplicateIdentity {
        /// The conflicting plugin id.
        id: String,
    },

    /// Execution was attempted before any plugin was initialized or registered.
    #[error("Plugin manager is not initialized; call initialize() or register a plugin first")]
    NotInitialized,

    /// A registration source could not be resolved.
    #[error("Failed to initialize plugin manager from source '{source_name}': {cause}")]
    InitializationFailed {
        /// Name of the source that failed.
        source_name: String,
        /// The underlying cause.
        cause: anyhow::Error,
    },
}

impl PluginflowError {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a duplicate identity error.
    #[must_use]
    pub fn duplicate_identity(id: impl Into<String>) -> Self {
        Self::DuplicateIdentity { id: id.into() }
    }

    /// Creates an initialization failure wrapping `cause`.
    #[must_use]
    pub fn initialization_failed(source_name: impl Into<String>, cause: impl Into<anyhow::Error>) -> Self {
        Self::InitializationFailed {
            source_name: source_name.into(),
            cause: cause.into(),
        }
    }

    /// Returns a stable machine-readable code for the error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::DuplicateIdentity { .. } => "DUPLICATE_IDENTITY",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::InitializationFailed { .. } => "INITIALIZATION_FAILED",
        }
    }
}

/// How a plugin fault was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The plugin returned an `Err`.
    Error,
    /// The plugin panicked.
    Panic,
    /// The task running the plugin was cancelled or could not be joined.
    Aborted,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Panic => write!(f, "panic"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// A failure captured while running a single plugin.
///
/// Cloning is cheap: the original error, when there is one, is shared.
#[derive(Debug, Clone, Error)]
#[error("plugin '{plugin_id}' {kind}: {message}")]
pub struct PluginFault {
    /// Id of the plugin that faulted.
    pub plugin_id: String,
    /// How the fault was raised.
    pub kind: FaultKind,
    /// Human-readable description (error chain or panic payload).
    pub message: String,
    cause: Option<Arc<anyhow::Error>>,
}

impl PluginFault {
    /// Captures an error returned by a plugin.
    #[must_use]
    pub fn from_error(plugin_id: impl Into<String>, error: anyhow::Error) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            kind: FaultKind::Error,
            message: format!("{error:#}"),
            cause: Some(Arc::new(error)),
        }
    }

    /// Captures a panic payload.
    #[must_use]
    pub fn from_panic(plugin_id: impl Into<String>, payload: &(dyn std::any::Any + Send)) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            kind: FaultKind::Panic,
            message: panic_message(payload),
            cause: None,
        }
    }

    /// Records a task that never delivered an outcome.
    #[must_use]
    pub fn aborted(plugin_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            kind: FaultKind::Aborted,
            message: message.into(),
            cause: None,
        }
    }

    /// Returns the original error when the plugin returned one.
    #[must_use]
    pub fn cause(&self) -> Option<&anyhow::Error> {
        self.cause.as_deref()
    }

    /// Converts to a JSON representation.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "plugin_id": self.plugin_id,
            "kind": self.kind,
            "message": self.message,
        })
    }
}

/// Extracts a readable message from a panic payload.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "plugin panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PluginflowError::invalid_argument("x").code(), "INVALID_ARGUMENT");
        assert_eq!(PluginflowError::duplicate_identity("p").code(), "DUPLICATE_IDENTITY");
        assert_eq!(PluginflowError::NotInitialized.code(), "NOT_INITIALIZED");
        assert_eq!(
            PluginflowError::initialization_failed("src", anyhow::anyhow!("boom")).code(),
            "INITIALIZATION_FAILED"
        );
    }

    #[test]
    fn test_duplicate_identity_message() {
        let err = PluginflowError::duplicate_identity("TEST-001");
        assert_eq!(err.to_string(), "Plugin with ID 'TEST-001' is already registered");
    }

    #[test]
    fn test_initialization_failed_keeps_cause() {
        let err = PluginflowError::initialization_failed("manifest", anyhow::anyhow!("file missing"));
        match err {
            PluginflowError::InitializationFailed { source_name, cause } => {
                assert_eq!(source_name, "manifest");
                assert_eq!(cause.to_string(), "file missing");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_fault_from_error_preserves_chain() {
        let err = anyhow::anyhow!("disk full").context("writing report");
        let fault = PluginFault::from_error("P1", err);
        assert_eq!(fault.kind, FaultKind::Error);
        assert_eq!(fault.message, "writing report: disk full");
        assert_eq!(fault.cause().map(ToString::to_string), Some("writing report".to_string()));
    }

    #[test]
    fn test_fault_from_panic_payloads() {
        let static_payload: Box<dyn std::any::Any + Send> = Box::new("static boom");
        let owned_payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned boom"));
        let other_payload: Box<dyn std::any::Any + Send> = Box::new(42_u32);

        assert_eq!(PluginFault::from_panic("P", static_payload.as_ref()).message, "static boom");
        assert_eq!(PluginFault::from_panic("P", owned_payload.as_ref()).message, "owned boom");
        assert!(PluginFault::from_panic("P", other_payload.as_ref())
            .message
            .contains("non-string"));
    }

    #[test]
    fn test_fault_display_and_json() {
        let fault = PluginFault::aborted("P9", "task cancelled");
        assert_eq!(fault.to_string(), "plugin 'P9' aborted: task cancelled");
        let json = fault.to_json();
        assert_eq!(json["kind"], "aborted");
        assert_eq!(json["plugin_id"], "P9");
        assert!(fault.cause().is_none());
    }
}
