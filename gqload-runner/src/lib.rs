//! Load harness for gqload
//!
//! Runs a scenario with a staged number of concurrent virtual users, keeps
//! each user's failure accumulator isolated and aggregates them every tick
//! to enforce abort-on-fail thresholds.

pub mod error;
pub mod executor;
pub mod stages;
pub mod summary;
pub mod thresholds;

pub use error::{RunnerError, RunnerResult};
pub use executor::LoadExecutor;
pub use stages::{LoadProfile, Stage};
pub use summary::{DurationStats, OperationStats, RunSummary, ThresholdOutcome};
pub use thresholds::{Aggregation, Comparison, Threshold, ThresholdSet};
