//! Per-plugin outcomes and the run-level aggregate.

use super::ExecutionMode;
use crate::core::{PluginIssue, PluginResult, ResultSeverity};
use crate::errors::PluginFault;
use crate::plugins::Plugin;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// The outcome of running one plugin.
#[derive(Debug, Clone)]
pub struct PluginExecutionResult {
    /// The plugin that ran.
    pub plugin: Arc<dyn Plugin>,
    /// Its result, synthesized as a critical failure when it faulted.
    pub result: PluginResult,
    /// Wall-clock execution time.
    pub duration: Duration,
    /// The captured fault, if any.
    pub fault: Option<PluginFault>,
}

impl PluginExecutionResult {
    /// Records a plugin that returned a result.
    ///
    /// The result is [normalized](PluginResult::normalized), so a failing
    /// issue always counts against the plugin.
    #[must_use]
    pub fn completed(plugin: Arc<dyn Plugin>, result: PluginResult, duration: Duration) -> Self {
        Self {
            plugin,
            result: result.normalized(),
            duration,
            fault: None,
        }
    }

    /// Records a plugin that faulted.
    ///
    /// The synthesized result reads `"{prefix}: {fault message}"`.
    #[must_use]
    pub fn faulted(plugin: Arc<dyn Plugin>, fault: PluginFault, duration: Duration, prefix: &str) -> Self {
        let result = PluginResult::failure(format!("{prefix}: {}", fault.message), ResultSeverity::Critical);
        Self {
            plugin,
            result,
            duration,
            fault: Some(fault),
        }
    }

    /// Returns the plugin id.
    #[must_use]
    pub fn plugin_id(&self) -> &str {
        self.plugin.id()
    }

    /// True when the result succeeded and no fault was captured.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_success && self.fault.is_none()
    }

    /// Execution time in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }

    /// Converts to a JSON representation.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "plugin_id": self.plugin.id(),
            "plugin_name": self.plugin.name(),
            "priority": self.plugin.priority(),
            "success": self.is_success(),
            "result": self.result,
            "duration_ms": self.duration_ms(),
            "fault": self.fault.as_ref().map(PluginFault::to_json),
        })
    }
}

/// The aggregated report of one run.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Id of the context the run processed.
    pub context_id: String,
    /// How the run was scheduled.
    pub mode: ExecutionMode,
    /// True iff no plugin failed.
    pub is_success: bool,
    /// Number of plugins executed.
    pub total_plugins: usize,
    /// Plugins whose result succeeded without a fault.
    pub successful_plugins: usize,
    /// `total_plugins - successful_plugins`.
    pub failed_plugins: usize,
    /// One entry per executed plugin. Priority order in sequential mode,
    /// completion order in parallel mode.
    pub plugin_results: Vec<PluginExecutionResult>,
    /// Every issue of every plugin, in `plugin_results` order.
    pub all_issues: Vec<PluginIssue>,
    /// Every captured fault, in `plugin_results` order.
    pub exceptions: Vec<PluginFault>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the whole run.
    pub duration: Duration,
}

impl ExecutionResult {
    /// Builds the aggregate from per-plugin outcomes.
    #[must_use]
    pub fn from_entries(
        context_id: impl Into<String>,
        mode: ExecutionMode,
        plugin_results: Vec<PluginExecutionResult>,
        started_at: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        let total_plugins = plugin_results.len();
        let successful_plugins = plugin_results.iter().filter(|r| r.is_success()).count();
        let failed_plugins = total_plugins - successful_plugins;

        let all_issues = plugin_results
            .iter()
            .flat_map(|r| r.result.issues.iter().cloned())
            .collect();
        let exceptions = plugin_results.iter().filter_map(|r| r.fault.clone()).collect();

        Self {
            context_id: context_id.into(),
            mode,
            is_success: failed_plugins == 0,
            total_plugins,
            successful_plugins,
            failed_plugins,
            plugin_results,
            all_issues,
            exceptions,
            started_at,
            duration,
        }
    }

    /// Looks up the outcome of a plugin by id.
    #[must_use]
    pub fn result_for(&self, plugin_id: &str) -> Option<&PluginExecutionResult> {
        self.plugin_results.iter().find(|r| r.plugin.id() == plugin_id)
    }

    /// Ids of the plugins in `plugin_results` order.
    #[must_use]
    pub fn plugin_ids(&self) -> Vec<&str> {
        self.plugin_results.iter().map(|r| r.plugin.id()).collect()
    }

    /// Returns the outcomes that did not succeed.
    #[must_use]
    pub fn failures(&self) -> Vec<&PluginExecutionResult> {
        self.plugin_results.iter().filter(|r| !r.is_success()).collect()
    }

    /// Returns the collected issues of exactly `severity`.
    #[must_use]
    pub fn issues_with_severity(&self, severity: ResultSeverity) -> Vec<&PluginIssue> {
        self.all_issues.iter().filter(|i| i.severity == severity).collect()
    }

    /// Highest severity among all plugin results, `Info` for an empty run.
    #[must_use]
    pub fn max_severity(&self) -> ResultSeverity {
        self.plugin_results
            .iter()
            .map(|r| r.result.severity)
            .max()
            .unwrap_or_default()
    }

    /// Converts to a JSON summary for consumers such as CLI printers.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "context_id": self.context_id,
            "mode": self.mode,
            "success": self.is_success,
            "total_plugins": self.total_plugins,
            "successful_plugins": self.successful_plugins,
            "failed_plugins": self.failed_plugins,
            "started_at": self.started_at.to_rfc3339(),
            "duration_ms": self.duration.as_secs_f64() * 1000.0,
            "plugin_results": self.plugin_results.iter().map(PluginExecutionResult::to_json).collect::<Vec<_>>(),
            "issues": self.all_issues,
            "exceptions": self.exceptions.iter().map(PluginFault::to_json).collect::<Vec<_>>(),
        })
    }
}

/// Accumulates outcomes from concurrent workers.
///
/// Each completed plugin takes the lock exactly once.
#[derive(Debug, Default)]
pub(crate) struct ExecutionCollector {
    entries: Mutex<Vec<PluginExecutionResult>>,
}

impl ExecutionCollector {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    pub(crate) fn record(&self, entry: PluginExecutionResult) {
        self.entries.lock().push(entry);
    }

    pub(crate) fn take(&self) -> Vec<PluginExecutionResult> {
        std::mem::take(&mut *self.entries.lock())
    }
}
