use serde::Serialize;

use crate::geometry::{Approach, Flow};
use crate::pollutant::Pollutant;
use crate::time_bucket::TimeBucket;

/// One segment's contribution at one evaluation point.
///
/// `lane` and `point` index the run's lane registry and evaluation point
/// list. Consumed by the aggregator and never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub bucket: TimeBucket,
    pub pollutant: Pollutant,
    pub lane: usize,
    pub approach: Approach,
    pub flow: Flow,
    pub segment: u32,
    pub point: usize,
    /// Source to point distance in metres, before clamping.
    pub distance: f64,
    /// kg/m³.
    pub concentration: f64,
}

/// Key tuple of one accumulation table. Fields not part of the grouping
/// stay `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GroupKey {
    pub bucket: Option<TimeBucket>,
    pub pollutant: Option<Pollutant>,
    pub lane: Option<usize>,
    pub approach: Option<Approach>,
    pub flow: Option<Flow>,
    pub point: Option<usize>,
}

/// Running sum for one key.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Total {
    /// kg/m³.
    pub sum: f64,
    pub count: u64,
}

impl Total {
    #[inline]
    pub fn add(&mut self, concentration: f64) {
        self.sum += concentration;
        self.count += 1;
    }

    #[inline]
    pub fn combine(&mut self, other: Total) {
        self.sum += other.sum;
        self.count += other.count;
    }
}

/// Final output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedResult {
    pub grouping: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_bucket: Option<TimeBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pollutant: Option<Pollutant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lane: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approach: Option<Approach>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<Flow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    pub concentration_ug_per_m3: f64,
    pub contributions: u64,
}
