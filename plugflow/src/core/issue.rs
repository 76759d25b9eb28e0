//! Structured findings reported by plugins.

use super::ResultSeverity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One finding produced by a plugin, independent of overall success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginIssue {
    /// Severity of the finding.
    pub severity: ResultSeverity,
    /// Code identifying the issue type (e.g. `REQUIRED_FIELD_MISSING`).
    pub code: String,
    /// Description of the issue.
    pub message: String,
    /// Where the issue was found (e.g. `Document.Title`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Additional metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl PluginIssue {
    /// Creates a new issue.
    #[must_use]
    pub fn new(severity: ResultSeverity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            location: None,
            metadata: None,
        }
    }

    /// Creates an informational issue.
    #[must_use]
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ResultSeverity::Info, code, message)
    }

    /// Creates a warning issue.
    #[must_use]
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ResultSeverity::Warning, code, message)
    }

    /// Creates an error issue.
    #[must_use]
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ResultSeverity::Error, code, message)
    }

    /// Creates a critical issue.
    #[must_use]
    pub fn critical(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ResultSeverity::Critical, code, message)
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Returns true if this issue makes a result unsuccessful.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.severity.is_failure()
    }
}
