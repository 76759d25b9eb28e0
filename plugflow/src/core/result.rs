//! Plugin result type with factory methods.

use super::{PluginIssue, ResultSeverity};
use serde::{Deserialize, Serialize};

/// The outcome of a single plugin execution.
///
/// Build results through the factory methods so that `is_success` and
/// `severity` stay consistent with the contained issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginResult {
    /// Whether the plugin execution was successful.
    pub is_success: bool,

    /// The severity level of the result.
    pub severity: ResultSeverity,

    /// A message describing the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Additional payload returned by the plugin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Findings in the order the plugin reported them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<PluginIssue>,
}

impl Default for PluginResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl PluginResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(message: Option<String>, data: Option<serde_json::Value>) -> Self {
        Self {
            is_success: true,
            severity: ResultSeverity::Info,
            message,
            data,
            issues: Vec::new(),
        }
    }

    /// Creates a successful result with no message or data.
    #[must_use]
    pub fn ok() -> Self {
        Self::success(None, None)
    }

    /// Creates a successful result with a message.
    #[must_use]
    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self::success(Some(message.into()), None)
    }

    /// Creates a failure result.
    #[must_use]
    pub fn failure(message: impl Into<String>, severity: ResultSeverity) -> Self {
        Self {
            is_success: false,
            severity,
            message: Some(message.into()),
            data: None,
            issues: Vec::new(),
        }
    }

    /// Creates a failure result with `Error` severity.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::failure(message, ResultSeverity::Error)
    }

    /// Creates a result whose outcome is derived from `issues`.
    ///
    /// Any `Error` or `Critical` issue makes the result unsuccessful with
    /// `Error` severity. Otherwise the result succeeds with `Warning`
    /// severity, or `Info` when there are no issues at all.
    #[must_use]
    pub fn with_issues(issues: impl IntoIterator<Item = PluginIssue>, message: Option<String>) -> Self {
        let issues: Vec<PluginIssue> = issues.into_iter().collect();
        let has_errors = issues.iter().any(PluginIssue::is_failure);

        let severity = if has_errors {
            ResultSeverity::Error
        } else if issues.is_empty() {
            ResultSeverity::Info
        } else {
            ResultSeverity::Warning
        };

        Self {
            is_success: !has_errors,
            severity,
            message,
            data: None,
            issues,
        }
    }

    /// Attaches a payload.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns true if the result is unsuccessful.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !self.is_success
    }

    /// Returns true if any issue is `Error` or `Critical`.
    #[must_use]
    pub fn has_failing_issues(&self) -> bool {
        self.issues.iter().any(PluginIssue::is_failure)
    }

    /// Reconciles the outcome with the contained issues.
    ///
    /// A result carrying an `Error` or `Critical` issue is never successful;
    /// such a result is marked failed and raised to at least `Error` severity.
    /// Consistent results are returned unchanged.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.has_failing_issues() {
            self.is_success = false;
            self.severity = self.severity.max(ResultSeverity::Error);
        }
        self
    }

    /// Returns true if the result carries any issue.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Returns the issues at or above `min`.
    #[must_use]
    pub fn issues_at_least(&self, min: ResultSeverity) -> Vec<&PluginIssue> {
        self.issues.iter().filter(|i| i.severity >= min).collect()
    }

    /// Returns the first issue with the given code.
    #[must_use]
    pub fn find_issue(&self, code: &str) -> Option<&PluginIssue> {
        self.issues.iter().find(|i| i.code == code)
    }
}
