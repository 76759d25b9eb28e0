//! Execution modes.

use crate::errors::PluginflowError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the selected plugins of a run are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One at a time, ascending priority, stable on ties.
    #[default]
    Sequential,
    /// All at once on the tokio runtime; no ordering guarantee.
    Parallel,
}

impl ExecutionMode {
    /// Maps the boolean `parallel` flag used by simple callers.
    #[must_use]
    pub const fn from_parallel(parallel: bool) -> Self {
        if parallel {
            Self::Parallel
        } else {
            Self::Sequential
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Parallel => write!(f, "parallel"),
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = PluginflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "parallel" => Ok(Self::Parallel),
            other => Err(PluginflowError::invalid_argument(format!(
                "unknown execution mode '{other}', expected 'sequential' or 'parallel'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("sequential".parse::<ExecutionMode>().unwrap(), ExecutionMode::Sequential);
        assert_eq!(" PARALLEL ".parse::<ExecutionMode>().unwrap(), ExecutionMode::Parallel);
        assert!("both".parse::<ExecutionMode>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel] {
            assert_eq!(mode.to_string().parse::<ExecutionMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_from_parallel_flag() {
        assert_eq!(ExecutionMode::from_parallel(true), ExecutionMode::Parallel);
        assert_eq!(ExecutionMode::from_parallel(false), ExecutionMode::Sequential);
        assert_eq!(ExecutionMode::default(), ExecutionMode::Sequential);
    }
}
