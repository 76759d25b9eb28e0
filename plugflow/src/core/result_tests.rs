//! Tests for PluginResult and PluginIssue.

#[cfg(test)]
mod tests {
    use crate::core::{PluginIssue, PluginResult, ResultSeverity};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_success_with_message() {
        let result = PluginResult::success(Some("Operation successful".to_string()), None);
        assert!(result.is_success);
        assert_eq!(result.severity, ResultSeverity::Info);
        assert_eq!(result.message.as_deref(), Some("Operation successful"));
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_success_with_data() {
        let result = PluginResult::success(Some("Success".to_string()), Some(serde_json::json!({"count": 5})));
        assert!(result.is_success);
        assert_eq!(result.data, Some(serde_json::json!({"count": 5})));
    }

    #[test]
    fn test_ok_has_no_message() {
        let result = PluginResult::ok();
        assert!(result.is_success);
        assert_eq!(result.severity, ResultSeverity::Info);
        assert!(result.message.is_none());
        assert_eq!(result, PluginResult::default());
    }

    #[test]
    fn test_failure_defaults() {
        let result = PluginResult::error("Operation failed");
        assert!(!result.is_success);
        assert!(result.is_failure());
        assert_eq!(result.severity, ResultSeverity::Error);
        assert_eq!(result.message.as_deref(), Some("Operation failed"));
    }

    #[test]
    fn test_failure_with_critical_severity() {
        let result = PluginResult::failure("Critical failure", ResultSeverity::Critical);
        assert!(!result.is_success);
        assert_eq!(result.severity, ResultSeverity::Critical);
    }

    #[test]
    fn test_warning_and_error_issues_fail() {
        let result = PluginResult::with_issues(
            vec![
                PluginIssue::warning("WARN001", "Warning 1"),
                PluginIssue::error("ERR001", "Error 1"),
            ],
            None,
        );
        assert!(!result.is_success);
        assert_eq!(result.severity, ResultSeverity::Error);
        assert_eq!(result.issues.len(), 2);
    }

    #[test]
    fn test_critical_issue_fails() {
        let result = PluginResult::with_issues(vec![PluginIssue::critical("CRIT001", "Meltdown")], None);
        assert!(!result.is_success);
        assert_eq!(result.severity, ResultSeverity::Error);
    }

    #[test]
    fn test_only_warnings_and_info_succeed() {
        let result = PluginResult::with_issues(
            vec![
                PluginIssue::warning("WARN001", "Warning 1"),
                PluginIssue::info("INFO001", "Info 1"),
            ],
            None,
        );
        assert!(result.is_success);
        assert_eq!(result.severity, ResultSeverity::Warning);
        assert_eq!(result.issues.len(), 2);
    }

    #[test]
    fn test_empty_issue_list_succeeds() {
        let result = PluginResult::with_issues(Vec::new(), None);
        assert!(result.is_success);
        assert_eq!(result.severity, ResultSeverity::Info);
        assert!(!result.has_issues());
    }

    #[test]
    fn test_with_issues_keeps_message_and_order() {
        let result = PluginResult::with_issues(
            vec![
                PluginIssue::warning("B", "second code first"),
                PluginIssue::warning("A", "first code second"),
            ],
            Some("Found issues".to_string()),
        );
        assert_eq!(result.message.as_deref(), Some("Found issues"));
        let codes: Vec<_> = result.issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(codes, vec!["B", "A"]);
    }

    #[test]
    fn test_issue_builder() {
        let issue = PluginIssue::error("TITLE_TOO_LONG", "Title exceeds 200 characters")
            .with_location("Document.Title")
            .with_metadata("max_length", serde_json::json!(200))
            .with_metadata("actual_length", serde_json::json!(250));

        assert_eq!(issue.location.as_deref(), Some("Document.Title"));
        let metadata = issue.metadata.as_ref().unwrap();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata["max_length"], serde_json::json!(200));
    }

    #[test]
    fn test_issue_queries() {
        let result = PluginResult::with_issues(
            vec![
                PluginIssue::info("I", "info"),
                PluginIssue::warning("W", "warn"),
                PluginIssue::error("E", "err"),
            ],
            None,
        );
        assert_eq!(result.issues_at_least(ResultSeverity::Warning).len(), 2);
        assert_eq!(result.find_issue("E").map(|i| i.severity), Some(ResultSeverity::Error));
        assert!(result.find_issue("missing").is_none());
    }

    #[test]
    fn test_result_serialization_skips_empty_fields() {
        let json = serde_json::to_value(PluginResult::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"is_success": true, "severity": "info"}));
    }

    #[test]
    fn test_normalized_fails_result_with_hand_added_error() {
        let mut result = PluginResult::ok();
        result.issues.push(PluginIssue::error("E1", "bad total"));
        assert!(result.has_failing_issues());

        let result = result.normalized();
        assert!(!result.is_success);
        assert_eq!(result.severity, ResultSeverity::Error);
    }

    #[test]
    fn test_normalized_keeps_higher_severity_and_consistent_results() {
        let mut critical = PluginResult::failure("broken", ResultSeverity::Critical);
        critical.issues.push(PluginIssue::error("E1", "bad"));
        assert_eq!(critical.normalized().severity, ResultSeverity::Critical);

        let warned = PluginResult::with_issues([PluginIssue::warning("W1", "careful")], None);
        assert_eq!(warned.clone().normalized(), warned);
    }
}
