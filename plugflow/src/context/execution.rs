//! The per-request execution context.

use super::MetadataBag;
use crate::errors::{PluginflowError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Carrier of the data a run processes.
///
/// Category and payload are fixed at construction. Only the metadata bag
/// changes during a run. Contexts are shared with plugins as
/// `Arc<ExecutionContext>`.
pub struct ExecutionContext {
    id: String,
    category: String,
    data: Arc<dyn Any + Send + Sync>,
    data_type: &'static str,
    metadata: MetadataBag,
    created_at: DateTime<Utc>,
}

impl ExecutionContext {
    /// Creates a context with a generated id.
    ///
    /// # Errors
    ///
    /// Returns [`PluginflowError::InvalidArgument`] if `category` is blank.
    pub fn new<T>(category: impl Into<String>, data: T) -> Result<Self>
    where
        T: Any + Send + Sync,
    {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(PluginflowError::invalid_argument("category must not be empty"));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            category,
            data: Arc::new(data),
            data_type: std::any::type_name::<T>(),
            metadata: MetadataBag::new(),
            created_at: Utc::now(),
        })
    }

    /// Sets a caller-supplied id.
    ///
    /// A blank id keeps the generated one.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        if !id.trim().is_empty() {
            self.id = id;
        }
        self
    }

    /// Replaces the initial metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = MetadataBag::from_entries(metadata);
        self
    }

    /// Adds one initial metadata entry.
    #[must_use]
    pub fn with_metadata_entry(self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.set(key, value);
        self
    }

    /// Wraps the context for sharing with the executor.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Returns the context id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the payload as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginflowError::InvalidArgument`] if the payload is not a `T`.
    pub fn data<T: Any>(&self) -> Result<&T> {
        self.data.downcast_ref::<T>().ok_or_else(|| {
            PluginflowError::invalid_argument(format!(
                "cannot read context data of type {} as {}",
                self.data_type,
                std::any::type_name::<T>()
            ))
        })
    }

    /// Returns the payload if it is a `T`.
    #[must_use]
    pub fn try_data<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    /// Returns the type name of the payload.
    #[must_use]
    pub const fn data_type(&self) -> &'static str {
        self.data_type
    }

    /// Returns the shared metadata bag.
    #[must_use]
    pub const fn metadata(&self) -> &MetadataBag {
        &self.metadata
    }

    /// Reads a metadata value converted to `T`.
    #[must_use]
    pub fn get_metadata<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.metadata.get_as(key)
    }

    /// Adds or updates a metadata value.
    pub fn set_metadata(&self, key: impl Into<String>, value: serde_json::Value) {
        self.metadata.set(key, value);
    }

    /// Returns true if this context selects plugins registered for `category`.
    #[must_use]
    pub fn matches_category(&self, category: &str) -> bool {
        self.category.eq_ignore_ascii_case(category)
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("data_type", &self.data_type)
            .field("metadata_len", &self.metadata.len())
            .field("created_at", &self.created_at)
            .finish()
    }
}
