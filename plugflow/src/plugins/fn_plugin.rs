//! Closure-backed plugins.

use super::{Plugin, DEFAULT_PRIORITY, DEFAULT_VERSION};
use crate::context::ExecutionContext;
use crate::core::PluginResult;
use async_trait::async_trait;
use std::fmt::{self, Debug};

/// A plugin whose logic is a synchronous closure.
///
/// Useful for small checks and for tests. The closure may return `Err`
/// or panic; both are contained by the executor like any other fault.
pub struct FnPlugin<F>
where
    F: Fn(&ExecutionContext) -> anyhow::Result<PluginResult> + Send + Sync,
{
    id: String,
    name: String,
    description: String,
    version: String,
    categories: Vec<String>,
    priority: i32,
    func: F,
}

impl<F> FnPlugin<F>
where
    F: Fn(&ExecutionContext) -> anyhow::Result<PluginResult> + Send + Sync,
{
    /// Creates a new function-based plugin; the name defaults to the id.
    pub fn new(id: impl Into<String>, func: F) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            version: DEFAULT_VERSION.to_string(),
            categories: Vec::new(),
            priority: DEFAULT_PRIORITY,
            func,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Adds a category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Replaces the categories.
    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl<F> Debug for FnPlugin<F>
where
    F: Fn(&ExecutionContext) -> anyhow::Result<PluginResult> + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPlugin")
            .field("id", &self.id)
            .field("categories", &self.categories)
            .field("priority", &self.priority)
            .finish()
    }
}

#[async_trait]
impl<F> Plugin for FnPlugin<F>
where
    F: Fn(&ExecutionContext) -> anyhow::Result<PluginResult> + Send + Sync,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn categories(&self) -> &[String] {
        &self.categories
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn execute(&self, ctx: &ExecutionContext) -> anyhow::Result<PluginResult> {
        (self.func)(ctx)
    }
}
