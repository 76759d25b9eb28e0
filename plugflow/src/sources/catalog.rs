//! Factories addressable by plugin id.

use crate::plugins::Plugin;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a fresh plugin instance.
pub type PluginFactory = Box<dyn Fn() -> Arc<dyn Plugin> + Send + Sync>;

/// Maps plugin ids to factories so manifests can name plugins by id.
///
/// Lookups are exact.
#[derive(Default)]
pub struct PluginCatalog {
    factories: HashMap<String, PluginFactory>,
}

impl PluginCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the factory for `id`.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Arc<dyn Plugin> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Box::new(factory));
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_factory<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Arc<dyn Plugin> + Send + Sync + 'static,
    {
        self.register(id, factory);
        self
    }

    /// Instantiates the plugin registered as `id`.
    #[must_use]
    pub fn create(&self, id: &str) -> Option<Arc<dyn Plugin>> {
        self.factories.get(id).map(|factory| factory())
    }

    /// Returns true if `id` has a factory.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Returns the known ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.factories.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Returns the number of factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginCatalog").field("ids", &self.ids()).finish()
    }
}
