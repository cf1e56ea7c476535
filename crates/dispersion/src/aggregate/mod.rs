//! Declarative multi-grouping aggregation of concentration contributions.
//!
//! A run produces one contribution per (bucket, lane, pollutant, segment,
//! point) that passes the downwind filter. Instead of summing the stream
//! once per output table, the [`Aggregator`] folds each contribution into
//! every configured [`Grouping`] in a single pass.

mod aggregator;
mod grouping;
mod types;

pub use aggregator::Aggregator;
pub use grouping::{Grouping, KeyField};
pub use types::{AggregatedResult, Contribution, GroupKey, Total};
