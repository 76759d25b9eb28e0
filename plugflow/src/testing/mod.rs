//! Testing utilities for plugflow.
//!
//! This module provides:
//! - Mock plugins covering success, failure, panics, issues and latency
//! - A context builder and plugin-set helper
//! - Assertions over execution results

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_counts, assert_execution_failed, assert_execution_order, assert_execution_succeeded,
    assert_fault_for, assert_has_issue,
};
pub use fixtures::{plugin_set, TestContext};
pub use mocks::{
    ConcurrencyGauge, FailingPlugin, IssuePlugin, MockPlugin, PanickingPlugin, RecordingPlugin,
    SlowPlugin, SuccessPlugin,
};
