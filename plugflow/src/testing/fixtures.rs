//! Test fixtures for plugin runs.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::errors::Result;
use crate::plugins::Plugin;

/// A test context builder.
#[derive(Debug, Clone)]
pub struct TestContext {
    /// Category of the built context.
    pub category: String,
    /// Initial metadata.
    pub metadata: HashMap<String, serde_json::Value>,
    /// Caller-supplied context id.
    pub id: Option<String>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new("TEST")
    }
}

impl TestContext {
    /// Creates a builder for `category`.
    #[must_use]
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            metadata: HashMap::new(),
            id: None,
        }
    }

    /// Adds metadata to the context.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Sets the context id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builds a shared context carrying `data`.
    ///
    /// # Errors
    ///
    /// Fails when the category is blank.
    pub fn build_with<T>(&self, data: T) -> Result<Arc<ExecutionContext>>
    where
        T: Any + Send + Sync,
    {
        let mut ctx = ExecutionContext::new(self.category.clone(), data)?.with_metadata(self.metadata.clone());
        if let Some(id) = &self.id {
            ctx = ctx.with_id(id.clone());
        }
        Ok(ctx.into_shared())
    }

    /// Builds a shared context with an empty payload.
    ///
    /// # Errors
    ///
    /// Fails when the category is blank.
    pub fn build(&self) -> Result<Arc<ExecutionContext>> {
        self.build_with(())
    }
}

/// Wraps concrete plugins into the shared form the executor takes.
#[must_use]
pub fn plugin_set<I, P>(plugins: I) -> Vec<Arc<dyn Plugin>>
where
    I: IntoIterator<Item = P>,
    P: Plugin + 'static,
{
    plugins.into_iter().map(|p| Arc::new(p) as Arc<dyn Plugin>).collect()
}
