//! Test assertions for execution results.

use crate::core::ResultSeverity;
use crate::errors::FaultKind;
use crate::executor::ExecutionResult;

/// Asserts that every plugin of the run succeeded.
pub fn assert_execution_succeeded(result: &ExecutionResult) {
    assert!(
        result.is_success,
        "Expected success, got {} failed of {}: {:?}",
        result.failed_plugins,
        result.total_plugins,
        result.failures().iter().map(|r| r.plugin_id()).collect::<Vec<_>>()
    );
}

/// Asserts that at least one plugin of the run failed.
pub fn assert_execution_failed(result: &ExecutionResult) {
    assert!(
        !result.is_success,
        "Expected failure, but all {} plugins succeeded",
        result.total_plugins
    );
}

/// Asserts the total, successful and failed counts.
pub fn assert_counts(result: &ExecutionResult, total: usize, successful: usize, failed: usize) {
    assert_eq!(
        (result.total_plugins, result.successful_plugins, result.failed_plugins),
        (total, successful, failed),
        "Expected (total, successful, failed) = ({total}, {successful}, {failed})"
    );
}

/// Asserts the order in which plugin outcomes were recorded.
pub fn assert_execution_order(result: &ExecutionResult, expected: &[&str]) {
    let actual = result.plugin_ids();
    assert_eq!(actual, expected, "Unexpected plugin order");
}

/// Asserts that an issue with `code` and `severity` was collected.
pub fn assert_has_issue(result: &ExecutionResult, code: &str, severity: ResultSeverity) {
    assert!(
        result
            .all_issues
            .iter()
            .any(|i| i.code == code && i.severity == severity),
        "Expected issue '{}' with severity {}, got {:?}",
        code,
        severity,
        result.all_issues.iter().map(|i| (&i.code, i.severity)).collect::<Vec<_>>()
    );
}

/// Asserts that the plugin `plugin_id` faulted with `kind`.
pub fn assert_fault_for(result: &ExecutionResult, plugin_id: &str, kind: FaultKind) {
    let fault = result.exceptions.iter().find(|f| f.plugin_id == plugin_id);
    assert!(
        fault.is_some_and(|f| f.kind == kind),
        "Expected {kind} fault for plugin '{plugin_id}', got {fault:?}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PluginIssue, PluginResult};
    use crate::errors::PluginFault;
    use crate::executor::{ExecutionMode, PluginExecutionResult};
    use crate::testing::SuccessPlugin;
    use chrono::Utc;
    use std::sync::Arc;
    use std::time::Duration;

    fn run_with(entries: Vec<PluginExecutionResult>) -> ExecutionResult {
        ExecutionResult::from_entries("ctx", ExecutionMode::Sequential, entries, Utc::now(), Duration::ZERO)
    }

    fn ok(id: &str) -> PluginExecutionResult {
        PluginExecutionResult::completed(
            Arc::new(SuccessPlugin::new(id, &["X"])),
            PluginResult::with_issues([PluginIssue::warning("W1", "careful")], None),
            Duration::ZERO,
        )
    }

    fn faulted(id: &str) -> PluginExecutionResult {
        PluginExecutionResult::faulted(
            Arc::new(SuccessPlugin::new(id, &["X"])),
            PluginFault::from_error(id, anyhow::anyhow!("boom")),
            Duration::ZERO,
            "Plugin execution failed",
        )
    }

    #[test]
    fn test_assert_execution_succeeded() {
        let result = run_with(vec![ok("a")]);
        assert_execution_succeeded(&result);
        assert_counts(&result, 1, 1, 0);
        assert_has_issue(&result, "W1", ResultSeverity::Warning);
    }

    #[test]
    #[should_panic(expected = "Expected success")]
    fn test_assert_execution_succeeded_fails() {
        assert_execution_succeeded(&run_with(vec![faulted("a")]));
    }

    #[test]
    fn test_assert_execution_failed() {
        let result = run_with(vec![ok("a"), faulted("b")]);
        assert_execution_failed(&result);
        assert_execution_order(&result, &["a", "b"]);
        assert_fault_for(&result, "b", FaultKind::Error);
    }

    #[test]
    #[should_panic(expected = "Expected panic fault")]
    fn test_assert_fault_for_wrong_kind() {
        assert_fault_for(&run_with(vec![faulted("b")]), "b", FaultKind::Panic);
    }
}
