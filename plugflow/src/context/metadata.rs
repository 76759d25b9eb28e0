//! Shared metadata bag.

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Key/value metadata shared by every plugin of a run.
///
/// Each individual read or write takes the lock once. Sequences such as
/// read-then-write are not atomic; plugins that need that across concurrent
/// siblings must coordinate themselves.
#[derive(Debug, Default)]
pub struct MetadataBag {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl MetadataBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bag from existing entries.
    #[must_use]
    pub fn from_entries(entries: HashMap<String, serde_json::Value>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Gets a raw value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.read().get(key).cloned()
    }

    /// Gets a value converted to `T`.
    ///
    /// Returns `None` when the key is missing or the value has another shape.
    #[must_use]
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key)?;
        serde_json::from_value(value).ok()
    }

    /// Inserts or overwrites a value, returning the previous one.
    pub fn set(&self, key: impl Into<String>, value: serde_json::Value) -> Option<serde_json::Value> {
        self.entries.write().insert(key.into(), value)
    }

    /// Removes a value.
    pub fn remove(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.write().remove(key)
    }

    /// Checks if a key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Returns a copy of all entries.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, serde_json::Value> {
        self.entries.read().clone()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
