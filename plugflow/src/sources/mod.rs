//! Registration sources.
//!
//! A [`PluginSource`] produces the batch of plugins a manager is initialized
//! with. Sources range from a compiled-in list to JSON manifests resolved
//! against a [`PluginCatalog`] of factories.

mod catalog;
mod manifest;

pub use catalog::{PluginCatalog, PluginFactory};
pub use manifest::{DirectorySource, ManifestEntry, ManifestSource, PluginManifest};

use crate::plugins::Plugin;
use std::fmt;
use std::sync::Arc;

/// Something that can produce plugins for registration.
#[cfg_attr(test, mockall::automock)]
pub trait PluginSource: Send + Sync {
    /// Human-readable name used in logs and initialization errors.
    fn name(&self) -> String;

    /// Loads the plugins this source provides.
    fn load(&self) -> anyhow::Result<Vec<Arc<dyn Plugin>>>;
}

/// A fixed, compiled-in list of plugins.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    plugins: Vec<Arc<dyn Plugin>>,
}

impl StaticSource {
    /// Creates a source returning `plugins`.
    #[must_use]
    pub fn new(plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self {
            name: "static".to_string(),
            plugins,
        }
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a plugin.
    #[must_use]
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.push(plugin);
        self
    }
}

impl PluginSource for StaticSource {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> anyhow::Result<Vec<Arc<dyn Plugin>>> {
        Ok(self.plugins.clone())
    }
}

/// A source backed by a closure.
pub struct FnSource<F>
where
    F: Fn() -> anyhow::Result<Vec<Arc<dyn Plugin>>> + Send + Sync,
{
    name: String,
    func: F,
}

impl<F> FnSource<F>
where
    F: Fn() -> anyhow::Result<Vec<Arc<dyn Plugin>>> + Send + Sync,
{
    /// Creates a closure-backed source.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> fmt::Debug for FnSource<F>
where
    F: Fn() -> anyhow::Result<Vec<Arc<dyn Plugin>>> + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSource").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<F> PluginSource for FnSource<F>
where
    F: Fn() -> anyhow::Result<Vec<Arc<dyn Plugin>>> + Send + Sync,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn load(&self) -> anyhow::Result<Vec<Arc<dyn Plugin>>> {
        (self.func)()
    }
}
