//! Screening run orchestration.
//!
//! A run partitions records by time bucket, maps every bucket to its own
//! [`Aggregator`](crate::aggregate::Aggregator) on the compute task pool
//! and reduces the partial tables by addition before finalizing rows.

mod report;
mod run;
mod settings;

pub use report::{RunWarnings, ScreeningReport};
pub use run::DispersionEngine;
pub use settings::{EvaluationMode, ScreeningConfig, WindParams};
