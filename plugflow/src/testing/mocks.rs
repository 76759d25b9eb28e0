//! Mock plugins for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::context::ExecutionContext;
use crate::core::{PluginIssue, PluginResult};
use crate::plugins::{Plugin, DEFAULT_PRIORITY};

/// Identity fields shared by the mock plugins.
#[derive(Debug, Clone)]
struct Identity {
    id: String,
    categories: Vec<String>,
    priority: i32,
}

impl Identity {
    fn new(id: impl Into<String>, categories: &[&str]) -> Self {
        Self {
            id: id.into(),
            categories: categories.iter().map(|c| (*c).to_string()).collect(),
            priority: DEFAULT_PRIORITY,
        }
    }
}

macro_rules! identity_accessors {
    () => {
        fn id(&self) -> &str {
            &self.identity.id
        }

        fn name(&self) -> &str {
            &self.identity.id
        }

        fn categories(&self) -> &[String] {
            &self.identity.categories
        }

        fn priority(&self) -> i32 {
            self.identity.priority
        }
    };
}

/// A mock plugin that records calls and returns a configurable result.
#[derive(Debug)]
pub struct MockPlugin {
    identity: Identity,
    result: Mutex<PluginResult>,
    call_count: AtomicUsize,
    contexts: Mutex<Vec<String>>,
}

impl MockPlugin {
    /// Creates a new mock plugin returning a plain success.
    #[must_use]
    pub fn new(id: impl Into<String>, categories: &[&str]) -> Self {
        Self {
            identity: Identity::new(id, categories),
            result: Mutex::new(PluginResult::ok()),
            call_count: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.identity.priority = priority;
        self
    }

    /// Sets the result to return.
    pub fn set_result(&self, result: PluginResult) {
        *self.result.lock() = result;
    }

    /// Returns the number of times the plugin was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Returns the context ids seen by each call.
    #[must_use]
    pub fn recorded_contexts(&self) -> Vec<String> {
        self.contexts.lock().clone()
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.contexts.lock().clear();
    }
}

#[async_trait]
impl Plugin for MockPlugin {
    identity_accessors!();

    async fn execute(&self, ctx: &ExecutionContext) -> anyhow::Result<PluginResult> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().push(ctx.id().to_string());
        Ok(self.result.lock().clone())
    }
}

/// A plugin that always succeeds.
#[derive(Debug)]
pub struct SuccessPlugin {
    identity: Identity,
    message: Option<String>,
}

impl SuccessPlugin {
    /// Creates a new success plugin.
    #[must_use]
    pub fn new(id: impl Into<String>, categories: &[&str]) -> Self {
        Self {
            identity: Identity::new(id, categories),
            message: None,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.identity.priority = priority;
        self
    }

    /// Sets the success message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[async_trait]
impl Plugin for SuccessPlugin {
    identity_accessors!();

    async fn execute(&self, _ctx: &ExecutionContext) -> anyhow::Result<PluginResult> {
        Ok(PluginResult::success(self.message.clone(), None))
    }
}

/// A plugin that always returns an error.
#[derive(Debug)]
pub struct FailingPlugin {
    identity: Identity,
    error: String,
}

impl FailingPlugin {
    /// Creates a new failing plugin.
    #[must_use]
    pub fn new(id: impl Into<String>, categories: &[&str], error: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(id, categories),
            error: error.into(),
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.identity.priority = priority;
        self
    }
}

#[async_trait]
impl Plugin for FailingPlugin {
    identity_accessors!();

    async fn execute(&self, _ctx: &ExecutionContext) -> anyhow::Result<PluginResult> {
        anyhow::bail!("{}", self.error)
    }
}

/// A plugin that always panics.
#[derive(Debug)]
pub struct PanickingPlugin {
    identity: Identity,
    message: String,
}

impl PanickingPlugin {
    /// Creates a new panicking plugin.
    #[must_use]
    pub fn new(id: impl Into<String>, categories: &[&str], message: impl Into<String>) -> Self {
        Self {
            identity: Identity::new(id, categories),
            message: message.into(),
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.identity.priority = priority;
        self
    }
}

#[async_trait]
impl Plugin for PanickingPlugin {
    identity_accessors!();

    #[allow(clippy::panic)]
    async fn execute(&self, _ctx: &ExecutionContext) -> anyhow::Result<PluginResult> {
        panic!("{}", self.message)
    }
}

/// A plugin that reports a fixed set of issues.
#[derive(Debug)]
pub struct IssuePlugin {
    identity: Identity,
    issues: Vec<PluginIssue>,
}

impl IssuePlugin {
    /// Creates a plugin reporting `issues`.
    #[must_use]
    pub fn new(id: impl Into<String>, categories: &[&str], issues: Vec<PluginIssue>) -> Self {
        Self {
            identity: Identity::new(id, categories),
            issues,
        }
    }

    /// Creates a plugin reporting `count` warnings coded `{id}-W{n}`.
    #[must_use]
    pub fn warnings(id: impl Into<String>, categories: &[&str], count: usize) -> Self {
        let id = id.into();
        let issues = (1..=count)
            .map(|n| PluginIssue::warning(format!("{id}-W{n}"), format!("warning {n}")))
            .collect();
        Self::new(id, categories, issues)
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.identity.priority = priority;
        self
    }
}

#[async_trait]
impl Plugin for IssuePlugin {
    identity_accessors!();

    async fn execute(&self, _ctx: &ExecutionContext) -> anyhow::Result<PluginResult> {
        Ok(PluginResult::with_issues(self.issues.clone(), None))
    }
}

/// A plugin that appends its id to a shared log when executed.
#[derive(Debug)]
pub struct RecordingPlugin {
    identity: Identity,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingPlugin {
    /// Creates a plugin writing to `log`.
    #[must_use]
    pub fn new(id: impl Into<String>, categories: &[&str], log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            identity: Identity::new(id, categories),
            log,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.identity.priority = priority;
        self
    }
}

#[async_trait]
impl Plugin for RecordingPlugin {
    identity_accessors!();

    async fn execute(&self, _ctx: &ExecutionContext) -> anyhow::Result<PluginResult> {
        self.log.lock().push(self.identity.id.clone());
        Ok(PluginResult::ok())
    }
}

/// Tracks how many plugins run at the same time.
#[derive(Debug, Default)]
pub struct ConcurrencyGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
    finished: AtomicUsize,
}

impl ConcurrencyGauge {
    /// Creates a new gauge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest number of simultaneous runs observed.
    #[must_use]
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of runs that finished.
    #[must_use]
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

/// A plugin that takes time to execute.
#[derive(Debug)]
pub struct SlowPlugin {
    identity: Identity,
    delay: Duration,
    gauge: Option<Arc<ConcurrencyGauge>>,
}

impl SlowPlugin {
    /// Creates a new slow plugin.
    #[must_use]
    pub fn new(id: impl Into<String>, categories: &[&str], delay: Duration) -> Self {
        Self {
            identity: Identity::new(id, categories),
            delay,
            gauge: None,
        }
    }

    /// Creates a slow plugin with delay in milliseconds.
    #[must_use]
    pub fn with_delay_ms(id: impl Into<String>, categories: &[&str], ms: u64) -> Self {
        Self::new(id, categories, Duration::from_millis(ms))
    }

    /// Reports each run to `gauge`.
    #[must_use]
    pub fn with_gauge(mut self, gauge: Arc<ConcurrencyGauge>) -> Self {
        self.gauge = Some(gauge);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.identity.priority = priority;
        self
    }
}

#[async_trait]
impl Plugin for SlowPlugin {
    identity_accessors!();

    async fn execute(&self, _ctx: &ExecutionContext) -> anyhow::Result<PluginResult> {
        if let Some(gauge) = &self.gauge {
            gauge.enter();
        }
        tokio::time::sleep(self.delay).await;
        if let Some(gauge) = &self.gauge {
            gauge.exit();
        }
        Ok(PluginResult::ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResultSeverity;

    fn ctx() -> ExecutionContext {
        ExecutionContext::new("X", ()).unwrap()
    }

    #[tokio::test]
    async fn test_mock_plugin() {
        let plugin = MockPlugin::new("mock", &["X"]).with_priority(5);
        let ctx = ctx();

        assert!(plugin.execute(&ctx).await.unwrap().is_success);
        assert_eq!(plugin.call_count(), 1);
        assert_eq!(plugin.priority(), 5);

        plugin.set_result(PluginResult::error("nope"));
        assert!(!plugin.execute(&ctx).await.unwrap().is_success);
        assert_eq!(plugin.call_count(), 2);
        assert_eq!(plugin.recorded_contexts(), vec![ctx.id().to_string(), ctx.id().to_string()]);

        plugin.reset();
        assert_eq!(plugin.call_count(), 0);
    }

    #[tokio::test]
    async fn test_success_plugin() {
        let plugin = SuccessPlugin::new("ok", &["X"]).with_message("Test executed");
        let result = plugin.execute(&ctx()).await.unwrap();
        assert!(result.is_success);
        assert_eq!(result.message.as_deref(), Some("Test executed"));
    }

    #[tokio::test]
    async fn test_failing_plugin() {
        let plugin = FailingPlugin::new("fail", &["X"], "test error");
        let err = plugin.execute(&ctx()).await.unwrap_err();
        assert_eq!(err.to_string(), "test error");
    }

    #[tokio::test]
    async fn test_issue_plugin_warnings() {
        let plugin = IssuePlugin::warnings("P1", &["X"], 3);
        let result = plugin.execute(&ctx()).await.unwrap();
        assert!(result.is_success);
        assert_eq!(result.severity, ResultSeverity::Warning);
        assert_eq!(result.issues.len(), 3);
        assert_eq!(result.issues[0].code, "P1-W1");
    }

    #[tokio::test]
    async fn test_recording_plugin() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let a = RecordingPlugin::new("a", &["X"], Arc::clone(&log));
        let b = RecordingPlugin::new("b", &["X"], Arc::clone(&log));
        let ctx = ctx();

        b.execute(&ctx).await.unwrap();
        a.execute(&ctx).await.unwrap();
        assert_eq!(*log.lock(), vec!["b".to_string(), "a".to_string()]);
    }

    #[tokio::test]
    async fn test_slow_plugin_reports_to_gauge() {
        let gauge = Arc::new(ConcurrencyGauge::new());
        let plugin = SlowPlugin::with_delay_ms("slow", &["X"], 10).with_gauge(Arc::clone(&gauge));

        let start = std::time::Instant::now();
        plugin.execute(&ctx()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(10));
        assert_eq!(gauge.peak(), 1);
        assert_eq!(gauge.finished(), 1);
    }
}
