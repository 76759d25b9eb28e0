//! Manager facade.
//!
//! [`PluginManager`] ties a [`PluginRegistry`] to a [`PluginExecutor`] and
//! tracks whether it has been initialized from a [`PluginSource`].


use crate::config::EngineConfig;
use crate::context::ExecutionContext;
use crate::errors::{PluginflowError, Result};
use crate::events::EventSink;
use crate::executor::{ExecutionMode, ExecutionResult, PluginExecutor};
use crate::plugins::Plugin;
use crate::registry::PluginRegistry;
use crate::sources::PluginSource;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Predicate deciding whether a plugin takes part in a run.
pub type PluginFilter = dyn Fn(&dyn Plugin) -> bool + Send + Sync;

/// Lifecycle state of a manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagerState {
    /// No source has been loaded.
    #[default]
    Uninitialized,
    /// A source has been loaded.
    Initialized,
}

/// Facade over registration and execution.
pub struct PluginManager {
    registry: PluginRegistry,
    executor: PluginExecutor,
    state: Mutex<ManagerState>,
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginManager {
    /// Creates a manager with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates a manager with the given configuration.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            registry: PluginRegistry::new(),
            executor: PluginExecutor::with_config(config),
            state: Mutex::new(ManagerState::Uninitialized),
        }
    }

    /// Sets the event sink used by the executor.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.executor = self.executor.with_event_sink(sink);
        self
    }

    /// Loads and registers the plugins of `source`.
    ///
    /// Does nothing when the manager is already initialized. The batch is
    /// registered atomically, so a failure leaves both the registry and the
    /// state untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PluginflowError::InitializationFailed`] if the source fails to
    /// load or any of its plugins cannot be registered.
    pub fn initialize(&self, source: &dyn PluginSource) -> Result<()> {
        let mut state = self.state.lock();
        if *state == ManagerState::Initialized {
            debug!(source = %source.name(), "Plugin manager already initialized");
            return Ok(());
        }

        let source_name = source.name();
        let plugins = source
            .load()
            .map_err(|e| PluginflowError::initialization_failed(&source_name, e))?;
        let count = self
            .registry
            .register_all(plugins)
            .map_err(|e| PluginflowError::initialization_failed(&source_name, e))?;

        *state = ManagerState::Initialized;
        info!(source = %source_name, plugins = count, "Plugin manager initialized");
        Ok(())
    }

    /// Registers a single plugin without changing the lifecycle state.
    ///
    /// # Errors
    ///
    /// See [`PluginRegistry::register`].
    pub fn register_plugin(&self, plugin: Arc<dyn Plugin>) -> Result<()> {
        self.registry.register(plugin)
    }

    /// Runs the registered plugins applicable to `context`.
    ///
    /// When `filter` is given, only plugins it accepts are considered.
    ///
    /// # Errors
    ///
    /// Returns [`PluginflowError::NotInitialized`] if the manager was never
    /// initialized and holds no plugins. Plugin failures are reported inside
    /// the returned [`ExecutionResult`], never as an error.
    pub async fn execute(
        &self,
        context: Arc<ExecutionContext>,
        filter: Option<&PluginFilter>,
        mode: ExecutionMode,
    ) -> Result<ExecutionResult> {
        if !self.is_initialized() && self.registry.is_empty() {
            return Err(PluginflowError::NotInitialized);
        }

        let mut plugins = self.registry.all();
        if let Some(filter) = filter {
            plugins.retain(|p| filter(p.as_ref()));
        }

        Ok(self.executor.execute(&plugins, context, mode).await)
    }

    /// Runs with no filter in the configured default mode.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn execute_default(&self, context: Arc<ExecutionContext>) -> Result<ExecutionResult> {
        let mode = self.executor.config().default_mode;
        self.execute(context, None, mode).await
    }

    /// Returns the plugins declaring `category` (case-insensitive).
    #[must_use]
    pub fn get_plugins_by_category(&self, category: &str) -> Vec<Arc<dyn Plugin>> {
        self.registry.by_category(category)
    }

    /// Looks up a plugin by id (case-insensitive).
    #[must_use]
    pub fn get_plugin_by_id(&self, id: &str) -> Option<Arc<dyn Plugin>> {
        self.registry.by_id(id)
    }

    /// Returns every registered plugin in registration order.
    #[must_use]
    pub fn loaded_plugins(&self) -> Vec<Arc<dyn Plugin>> {
        self.registry.all()
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> ManagerState {
        *self.state.lock()
    }

    /// Returns true once a source has been loaded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state() == ManagerState::Initialized
    }

    /// Returns the executor.
    #[must_use]
    pub const fn executor(&self) -> &PluginExecutor {
        &self.executor
    }

    /// Removes every plugin and returns to [`ManagerState::Uninitialized`].
    pub fn reset(&self) {
        let mut state = self.state.lock();
        self.registry.reset();
        *state = ManagerState::Uninitialized;
        info!("Plugin manager reset");
    }
}

impl fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginManager")
            .field("state", &self.state())
            .field("plugins", &self.registry.list_ids())
            .field("executor", &self.executor)
            .finish()
    }
}
