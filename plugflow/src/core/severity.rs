//! Severity levels for results and issues.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a plugin result or issue.
///
/// Variants are ordered: `Info < Warning < Error < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSeverity {
    /// Informational message.
    #[default]
    Info,
    /// Warning that does not prevent success.
    Warning,
    /// Error that indicates failure.
    Error,
    /// Critical error.
    Critical,
}

impl ResultSeverity {
    /// Returns true for severities that make a result unsuccessful.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }

    /// Short uppercase label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRIT",
        }
    }
}

impl fmt::Display for ResultSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(ResultSeverity::Info < ResultSeverity::Warning);
        assert!(ResultSeverity::Warning < ResultSeverity::Error);
        assert!(ResultSeverity::Error < ResultSeverity::Critical);
    }

    #[test]
    fn test_is_failure() {
        assert!(!ResultSeverity::Info.is_failure());
        assert!(!ResultSeverity::Warning.is_failure());
        assert!(ResultSeverity::Error.is_failure());
        assert!(ResultSeverity::Critical.is_failure());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_value(ResultSeverity::Warning).unwrap(), "warning");
        let parsed: ResultSeverity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(parsed, ResultSeverity::Critical);
    }
}
