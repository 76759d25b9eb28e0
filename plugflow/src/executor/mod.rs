//! Plugin executor: selection, ordering, fault containment and aggregation.
//!
//! The executor is stateless apart from its configuration. For each run it
//! filters the given plugins by the context's category, orders them (sequential
//! mode only), runs each with per-plugin isolation and folds the outcomes into
//! one [`ExecutionResult`].
//!
//! Parallel mode spawns one tokio task per selected plugin and therefore must
//! be called from within a tokio runtime. Dropping the run future (for example
//! on a `tokio::time::timeout`) aborts the plugin tasks it spawned.

mod mode;
mod result;

pub use mode::ExecutionMode;
pub use result::{ExecutionResult, PluginExecutionResult};

use result::ExecutionCollector;

use crate::config::EngineConfig;
use crate::context::ExecutionContext;
use crate::errors::PluginFault;
use crate::events::{self, EventSink, NoOpEventSink};
use crate::plugins::{matches_category, Plugin};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::AbortHandle;
use tracing::{debug, info, info_span, warn, Instrument, Span};

/// Runs plugins against a context and aggregates their outcomes.
#[derive(Clone)]
pub struct PluginExecutor {
    config: EngineConfig,
    runner: PluginRunner,
}

impl Default for PluginExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginExecutor {
    /// Creates an executor with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates an executor with the given configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let runner = PluginRunner {
            event_sink: Arc::new(NoOpEventSink),
            fault_prefix: Arc::from(config.fault_message_prefix.as_str()),
        };
        Self { config, runner }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.runner.event_sink = sink;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Selects the plugins applicable to `category`.
    ///
    /// Sequential mode sorts the selection by ascending priority; the sort is
    /// stable, so equal priorities keep their input order. Parallel mode keeps
    /// the input order.
    #[must_use]
    pub fn select(plugins: &[Arc<dyn Plugin>], category: &str, mode: ExecutionMode) -> Vec<Arc<dyn Plugin>> {
        let mut selected: Vec<Arc<dyn Plugin>> = plugins
            .iter()
            .filter(|p| matches_category(p.as_ref(), category))
            .cloned()
            .collect();

        if mode == ExecutionMode::Sequential {
            selected.sort_by_key(|p| p.priority());
        }
        selected
    }

    /// Executes every plugin applicable to `context` in the given mode.
    ///
    /// Never fails: plugin errors and panics are captured in the returned
    /// aggregate. A category with no matching plugins yields an empty,
    /// successful aggregate.
    pub async fn execute(
        &self,
        plugins: &[Arc<dyn Plugin>],
        context: Arc<ExecutionContext>,
        mode: ExecutionMode,
    ) -> ExecutionResult {
        let selected = Self::select(plugins, context.category(), mode);
        let span = info_span!(
            "plugin_execution",
            context_id = %context.id(),
            category = %context.category(),
            mode = %mode,
            plugins = selected.len(),
        );

        async move {
            let started_at = Utc::now();
            let start = Instant::now();

            self.runner.event_sink.try_emit(
                events::EXECUTION_STARTED,
                Some(serde_json::json!({
                    "context_id": context.id(),
                    "category": context.category(),
                    "mode": mode,
                    "plugin_count": selected.len(),
                })),
            );

            let entries = match mode {
                ExecutionMode::Sequential => self.run_sequential(selected, &context).await,
                ExecutionMode::Parallel => self.run_parallel(selected, &context).await,
            };

            let result = ExecutionResult::from_entries(context.id(), mode, entries, started_at, start.elapsed());

            info!(
                total = result.total_plugins,
                successful = result.successful_plugins,
                failed = result.failed_plugins,
                faults = result.exceptions.len(),
                duration_ms = result.duration.as_secs_f64() * 1000.0,
                "Plugin execution finished"
            );
            self.runner.event_sink.try_emit(
                events::EXECUTION_COMPLETED,
                Some(serde_json::json!({
                    "context_id": result.context_id,
                    "success": result.is_success,
                    "total_plugins": result.total_plugins,
                    "successful_plugins": result.successful_plugins,
                    "failed_plugins": result.failed_plugins,
                })),
            );

            result
        }
        .instrument(span)
        .await
    }

    /// Executes in sequential mode.
    pub async fn execute_sequential(&self, plugins: &[Arc<dyn Plugin>], context: Arc<ExecutionContext>) -> ExecutionResult {
        self.execute(plugins, context, ExecutionMode::Sequential).await
    }

    /// Executes in parallel mode.
    pub async fn execute_parallel(&self, plugins: &[Arc<dyn Plugin>], context: Arc<ExecutionContext>) -> ExecutionResult {
        self.execute(plugins, context, ExecutionMode::Parallel).await
    }

    async fn run_sequential(
        &self,
        selected: Vec<Arc<dyn Plugin>>,
        context: &Arc<ExecutionContext>,
    ) -> Vec<PluginExecutionResult> {
        let collector = ExecutionCollector::with_capacity(selected.len());
        for plugin in selected {
            let entry = self.runner.run(plugin, Arc::clone(context)).await;
            collector.record(entry);
        }
        collector.take()
    }

    async fn run_parallel(
        &self,
        selected: Vec<Arc<dyn Plugin>>,
        context: &Arc<ExecutionContext>,
    ) -> Vec<PluginExecutionResult> {
        let collector = Arc::new(ExecutionCollector::with_capacity(selected.len()));
        let semaphore = self
            .config
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.clamp(1, Semaphore::MAX_PERMITS))));
        let mut tasks = FuturesUnordered::new();
        let mut guard = TaskGuard::default();

        for plugin in selected {
            let runner = self.runner.clone();
            let context = Arc::clone(context);
            let collector = Arc::clone(&collector);
            let semaphore = semaphore.clone();
            let task_plugin = Arc::clone(&plugin);

            let handle = tokio::spawn(
                async move {
                    let _permit = match semaphore {
                        Some(semaphore) => semaphore.acquire_owned().await.ok(),
                        None => None,
                    };
                    let entry = runner.run(task_plugin, context).await;
                    collector.record(entry);
                }
                .instrument(Span::current()),
            );

            guard.handles.push(handle.abort_handle());
            tasks.push(async move { (plugin, handle.await) });
        }

        while let Some((plugin, joined)) = tasks.next().await {
            if let Err(err) = joined {
                let fault = PluginFault::aborted(plugin.id(), format!("plugin task did not complete: {err}"));
                warn!(plugin_id = %plugin.id(), error = %err, "Plugin task aborted");
                let entry = self.runner.faulted(plugin, fault, std::time::Duration::ZERO);
                collector.record(entry);
            }
        }

        collector.take()
    }
}

/// Aborts spawned plugin tasks when a parallel run is dropped early.
#[derive(Default)]
struct TaskGuard {
    handles: Vec<AbortHandle>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for PluginExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Runs a single plugin with timing, fault capture and event emission.
#[derive(Clone)]
struct PluginRunner {
    event_sink: Arc<dyn EventSink>,
    fault_prefix: Arc<str>,
}

impl PluginRunner {
    async fn run(&self, plugin: Arc<dyn Plugin>, context: Arc<ExecutionContext>) -> PluginExecutionResult {
        debug!(plugin_id = %plugin.id(), priority = plugin.priority(), "Running plugin");
        self.event_sink.try_emit(
            events::PLUGIN_STARTED,
            Some(serde_json::json!({
                "plugin_id": plugin.id(),
                "context_id": context.id(),
            })),
        );

        let start = Instant::now();
        let outcome = AssertUnwindSafe(plugin.execute(&context)).catch_unwind().await;
        let duration = start.elapsed();

        match outcome {
            Ok(Ok(result)) => {
                let result = result.normalized();
                let event = if result.is_success {
                    events::PLUGIN_COMPLETED
                } else {
                    events::PLUGIN_FAILED
                };
                debug!(
                    plugin_id = %plugin.id(),
                    success = result.is_success,
                    severity = %result.severity,
                    issues = result.issues.len(),
                    "Plugin finished"
                );
                self.event_sink.try_emit(
                    event,
                    Some(serde_json::json!({
                        "plugin_id": plugin.id(),
                        "severity": result.severity,
                        "issue_count": result.issues.len(),
                        "duration_ms": duration.as_secs_f64() * 1000.0,
                    })),
                );
                PluginExecutionResult::completed(plugin, result, duration)
            }
            Ok(Err(error)) => {
                let fault = PluginFault::from_error(plugin.id(), error);
                self.faulted(plugin, fault, duration)
            }
            Err(payload) => {
                let fault = PluginFault::from_panic(plugin.id(), payload.as_ref());
                self.faulted(plugin, fault, duration)
            }
        }
    }

    fn faulted(&self, plugin: Arc<dyn Plugin>, fault: PluginFault, duration: std::time::Duration) -> PluginExecutionResult {
        warn!(
            plugin_id = %plugin.id(),
            kind = %fault.kind,
            error = %fault.message,
            "Plugin faulted"
        );
        self.event_sink.try_emit(
            events::PLUGIN_FAULTED,
            Some(serde_json::json!({
                "plugin_id": plugin.id(),
                "kind": fault.kind,
                "error": fault.message,
                "duration_ms": duration.as_secs_f64() * 1000.0,
            })),
        );
        PluginExecutionResult::faulted(plugin, fault, duration, &self.fault_prefix)
    }
}
