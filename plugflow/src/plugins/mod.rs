//! Plugin trait and helpers.
//!
//! Plugins are independently authored units of work. The engine selects them
//! by category, orders them by priority and runs them against an
//! [`ExecutionContext`].

mod fn_plugin;

pub use fn_plugin::FnPlugin;

use crate::context::ExecutionContext;
use crate::core::PluginResult;
use async_trait::async_trait;
use std::fmt::Debug;

/// Priority used when a plugin does not specify one.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Version reported when a plugin does not specify one.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Trait every plugin implements.
///
/// Only `id`, `name`, `categories` and `execute` are required. Returning
/// `Err` from `execute` (or panicking) is treated as a fault: the executor
/// records it against this plugin and keeps running the others.
#[async_trait]
pub trait Plugin: Send + Sync + Debug {
    /// Unique identifier within a registry.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// What the plugin does.
    fn description(&self) -> &str {
        ""
    }

    /// Plugin version.
    fn version(&self) -> &str {
        DEFAULT_VERSION
    }

    /// Categories in which this plugin is selected.
    fn categories(&self) -> &[String];

    /// Execution order hint; lower runs earlier in sequential mode.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Runs the plugin against `ctx`.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The shared execution context
    ///
    /// # Returns
    ///
    /// The plugin's result, or an error that the executor captures as a fault.
    async fn execute(&self, ctx: &ExecutionContext) -> anyhow::Result<PluginResult>;
}

/// Returns true if `plugin` declares `category` (case-insensitive).
#[must_use]
pub fn matches_category(plugin: &dyn Plugin, category: &str) -> bool {
    plugin
        .categories()
        .iter()
        .any(|c| c.eq_ignore_ascii_case(category))
}

/// Converts plugin metadata to a JSON representation.
#[must_use]
pub fn describe(plugin: &dyn Plugin) -> serde_json::Value {
    serde_json::json!({
        "id": plugin.id(),
        "name": plugin.name(),
        "description": plugin.description(),
        "version": plugin.version(),
        "categories": plugin.categories(),
        "priority": plugin.priority(),
    })
}
