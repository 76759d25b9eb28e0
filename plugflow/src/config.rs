//! Engine configuration.

use crate::errors::{PluginflowError, Result};
use crate::executor::ExecutionMode;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

/// Environment variable selecting the default execution mode.
pub const ENV_DEFAULT_MODE: &str = "PLUGFLOW_DEFAULT_MODE";

/// Environment variable bounding parallel fan-out.
pub const ENV_MAX_CONCURRENCY: &str = "PLUGFLOW_MAX_CONCURRENCY";

/// Largest accepted `max_concurrency`.
pub const MAX_CONCURRENCY_LIMIT: usize = Semaphore::MAX_PERMITS;

/// Configuration for the executor and manager.
///
/// Values built as struct literals skip validation; the executor clamps
/// `max_concurrency` into `1..=MAX_CONCURRENCY_LIMIT` at run time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Mode used when the caller does not choose one.
    #[serde(default)]
    pub default_mode: ExecutionMode,
    /// Maximum plugins running at once in parallel mode (`None` = unbounded).
    #[serde(default)]
    pub max_concurrency: Option<usize>,
    /// Prefix of the message synthesized for faulting plugins.
    #[serde(default = "default_fault_message_prefix")]
    pub fault_message_prefix: String,
}

fn default_fault_message_prefix() -> String {
    "Plugin execution failed".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_mode: ExecutionMode::default(),
            max_concurrency: None,
            fault_message_prefix: default_fault_message_prefix(),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default execution mode.
    #[must_use]
    pub const fn with_default_mode(mut self, mode: ExecutionMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Bounds parallel fan-out, clamped into `1..=MAX_CONCURRENCY_LIMIT`.
    #[must_use]
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.clamp(1, MAX_CONCURRENCY_LIMIT));
        self
    }

    /// Sets the fault message prefix.
    #[must_use]
    pub fn with_fault_message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.fault_message_prefix = prefix.into();
        self
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`PluginflowError::InvalidArgument`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PluginflowError::invalid_argument(format!("invalid engine config: {e}")))?;
        config.validate()
    }

    /// Builds a configuration from `PLUGFLOW_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PluginflowError::InvalidArgument`] if a variable is set to an
    /// unparseable value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_DEFAULT_MODE) {
            config.default_mode = raw.parse()?;
        }

        if let Some(raw) = lookup(ENV_MAX_CONCURRENCY) {
            let limit: usize = raw.trim().parse().map_err(|_| {
                PluginflowError::invalid_argument(format!("{ENV_MAX_CONCURRENCY} must be a positive integer, got '{raw}'"))
            })?;
            config.max_concurrency = Some(limit);
        }

        config.validate()
    }

    fn validate(self) -> Result<Self> {
        match self.max_concurrency {
            Some(0) => Err(PluginflowError::invalid_argument("max_concurrency must be at least 1")),
            Some(limit) if limit > MAX_CONCURRENCY_LIMIT => Err(PluginflowError::invalid_argument(format!(
                "max_concurrency must be at most {MAX_CONCURRENCY_LIMIT}, got {limit}"
            ))),
            _ => Ok(self),
        }
    }
}
