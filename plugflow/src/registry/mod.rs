//! Plugin registry.
//!
//! The [`PluginRegistry`] holds the known plugins in registration order and
//! answers category and identity lookups. Duplicate ids are rejected at
//! registration time.

use crate::errors::{PluginflowError, Result};
use crate::plugins::{matches_category, Plugin};
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Thread-safe registry of plugin instances.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: RwLock<Vec<Arc<dyn Plugin>>>,
}

impl PluginRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin.
    ///
    /// # Errors
    ///
    /// Returns [`PluginflowError::InvalidArgument`] if the plugin id is blank,
    /// or [`PluginflowError::DuplicateIdentity`] if a plugin with the same id
    /// (case-sensitive) is already registered.
    pub fn register(&self, plugin: Arc<dyn Plugin>) -> Result<()> {
        validate_id(plugin.as_ref())?;

        let mut plugins = self.plugins.write();
        if plugins.iter().any(|p| p.id() == plugin.id()) {
            return Err(PluginflowError::duplicate_identity(plugin.id()));
        }

        info!(plugin_id = %plugin.id(), version = %plugin.version(), "Registered plugin");
        plugins.push(plugin);
        Ok(())
    }

    /// Registers a batch of plugins atomically.
    ///
    /// Either every plugin is registered or none is.
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register), checked against both the
    /// existing entries and the rest of the batch.
    pub fn register_all(&self, batch: Vec<Arc<dyn Plugin>>) -> Result<usize> {
        let mut plugins = self.plugins.write();
        let mut seen: HashSet<&str> = plugins.iter().map(|p| p.id()).collect();

        for plugin in &batch {
            validate_id(plugin.as_ref())?;
            if !seen.insert(plugin.id()) {
                return Err(PluginflowError::duplicate_identity(plugin.id()));
            }
        }
        drop(seen);

        let count = batch.len();
        for plugin in batch {
            debug!(plugin_id = %plugin.id(), "Registered plugin from batch");
            plugins.push(plugin);
        }
        info!(count, total = plugins.len(), "Registered plugin batch");
        Ok(count)
    }

    /// Returns the plugins that declare `category` (case-insensitive).
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<Arc<dyn Plugin>> {
        self.plugins
            .read()
            .iter()
            .filter(|p| matches_category(p.as_ref(), category))
            .cloned()
            .collect()
    }

    /// Looks up a plugin by id (case-insensitive).
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<Arc<dyn Plugin>> {
        self.plugins
            .read()
            .iter()
            .find(|p| p.id().eq_ignore_ascii_case(id))
            .cloned()
    }

    /// Checks if a plugin with exactly this id is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.plugins.read().iter().any(|p| p.id() == id)
    }

    /// Returns a snapshot of every registered plugin.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<dyn Plugin>> {
        self.plugins.read().clone()
    }

    /// Lists registered plugin ids in registration order.
    #[must_use]
    pub fn list_ids(&self) -> Vec<String> {
        self.plugins.read().iter().map(|p| p.id().to_string()).collect()
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }

    /// Clears all registered plugins.
    pub fn reset(&self) {
        let mut plugins = self.plugins.write();
        debug!(count = plugins.len(), "Clearing plugin registry");
        plugins.clear();
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugin_ids", &self.list_ids())
            .finish()
    }
}

fn validate_id(plugin: &dyn Plugin) -> Result<()> {
    if plugin.id().trim().is_empty() {
        return Err(PluginflowError::invalid_argument("plugin id must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SuccessPlugin;

    fn plugin(id: &str, categories: &[&str]) -> Arc<dyn Plugin> {
        Arc::new(SuccessPlugin::new(id, categories))
    }

    #[test]
    fn test_registry_creation() {
        let registry = PluginRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.all().is_empty());
    }

    #[test]
    fn test_register_adds_plugin() {
        let registry = PluginRegistry::new();
        registry.register(plugin("TEST-001", &["TestCategory"])).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("TEST-001"));
        assert_eq!(registry.list_ids(), vec!["TEST-001".to_string()]);
    }

    #[test]
    fn test_register_duplicate_id_fails() {
        let registry = PluginRegistry::new();
        registry.register(plugin("TEST-001", &["TestCategory"])).unwrap();

        let err = registry.register(plugin("TEST-001", &["Other"])).unwrap_err();
        assert!(matches!(err, PluginflowError::DuplicateIdentity { ref id } if id == "TEST-001"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_check_is_case_sensitive() {
        let registry = PluginRegistry::new();
        registry.register(plugin("p1", &["X"])).unwrap();
        registry.register(plugin("P1", &["X"])).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_blank_id_fails() {
        let registry = PluginRegistry::new();
        let err = registry.register(plugin("  ", &["X"])).unwrap_err();
        assert!(matches!(err, PluginflowError::InvalidArgument(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_same_categories_different_ids() {
        let registry = PluginRegistry::new();
        registry.register(plugin("A", &["X"])).unwrap();
        registry.register(plugin("B", &["X"])).unwrap();

        let ids: Vec<_> = registry.by_category("X").iter().map(|p| p.id().to_string()).collect();
        assert_eq!(ids, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_by_category_filters_and_ignores_case() {
        let registry = PluginRegistry::new();
        registry.register(plugin("P1", &["Category1"])).unwrap();
        registry.register(plugin("P2", &["Category2"])).unwrap();
        registry.register(plugin("P3", &["Category1", "Category2"])).unwrap();

        assert_eq!(registry.by_category("category1").len(), 2);
        assert_eq!(registry.by_category("CATEGORY2").len(), 2);
        assert!(registry.by_category("missing").is_empty());
    }

    #[test]
    fn test_by_id_ignores_case() {
        let registry = PluginRegistry::new();
        registry.register(plugin("TEST-001", &["X"])).unwrap();

        assert!(registry.by_id("test-001").is_some());
        assert!(registry.by_id("NonExistent").is_none());
    }

    #[test]
    fn test_register_all_is_atomic() {
        let registry = PluginRegistry::new();
        registry.register(plugin("existing", &["X"])).unwrap();

        let err = registry
            .register_all(vec![plugin("new-1", &["X"]), plugin("existing", &["X"])])
            .unwrap_err();
        assert!(matches!(err, PluginflowError::DuplicateIdentity { .. }));
        assert_eq!(registry.list_ids(), vec!["existing".to_string()]);
    }

    #[test]
    fn test_register_all_rejects_duplicates_within_batch() {
        let registry = PluginRegistry::new();
        let err = registry
            .register_all(vec![plugin("a", &["X"]), plugin("a", &["Y"])])
            .unwrap_err();
        assert!(matches!(err, PluginflowError::DuplicateIdentity { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_all_appends_in_order() {
        let registry = PluginRegistry::new();
        let count = registry
            .register_all(vec![plugin("a", &["X"]), plugin("b", &["X"]), plugin("c", &["X"])])
            .unwrap();
        assert_eq!(count, 3);
        assert_eq!(registry.list_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_reset_clears_everything() {
        let registry = PluginRegistry::new();
        registry.register(plugin("a", &["X"])).unwrap();
        registry.reset();

        assert!(registry.is_empty());
        registry.register(plugin("a", &["X"])).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let registry = PluginRegistry::new();
        registry.register(plugin("a", &["X"])).unwrap();
        let snapshot = registry.all();
        registry.register(plugin("b", &["X"])).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }
}
