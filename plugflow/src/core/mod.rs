//! Core result model for plugflow.
//!
//! This module contains the outcome vocabulary shared by plugins and the
//! executor:
//! - Severity levels
//! - Structured issues (findings)
//! - Plugin-level results with factory methods

mod issue;
mod result;
#[cfg(test)]
mod result_tests;
mod severity;

pub use issue::PluginIssue;
pub use result::PluginResult;
pub use severity::ResultSeverity;
