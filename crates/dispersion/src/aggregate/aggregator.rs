use std::collections::BTreeMap;
use std::sync::Arc;

use crate::concentration::to_ug_per_m3;
use crate::geometry::LaneGeometryRegistry;
use crate::points::{EvaluationPoint, Positioned};

use super::grouping::Grouping;
use super::types::{AggregatedResult, Contribution, GroupKey, Total};

/// Fan-out accumulator: every contribution is folded into one table per
/// grouping. Tables only ever add, so partial aggregators built on
/// different workers can be merged in any order.
#[derive(Debug, Clone)]
pub struct Aggregator {
    groupings: Arc<[Grouping]>,
    tables: Vec<BTreeMap<GroupKey, Total>>,
    contributions: u64,
}

impl Aggregator {
    pub fn new(groupings: Arc<[Grouping]>) -> Self {
        let tables = vec![BTreeMap::new(); groupings.len()];
        Self {
            groupings,
            tables,
            contributions: 0,
        }
    }

    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    /// Number of contributions folded in so far, merges included.
    pub fn contribution_count(&self) -> u64 {
        self.contributions
    }

    pub fn is_empty(&self) -> bool {
        self.contributions == 0
    }

    pub fn accumulate(&mut self, contribution: &Contribution) {
        for (grouping, table) in self.groupings.iter().zip(self.tables.iter_mut()) {
            table
                .entry(grouping.key_for(contribution))
                .or_default()
                .add(contribution.concentration);
        }
        self.contributions += 1;
    }

    /// Adds another aggregator's tables into this one. Both must have been
    /// built from the same grouping list.
    pub fn merge(&mut self, other: Aggregator) {
        debug_assert_eq!(self.groupings.len(), other.groupings.len());
        for (mine, theirs) in self.tables.iter_mut().zip(other.tables) {
            for (key, total) in theirs {
                mine.entry(key).or_default().combine(total);
            }
        }
        self.contributions += other.contributions;
    }

    /// Summed kg/m³ for one key of grouping `grouping`, if produced.
    pub fn total(&self, grouping: usize, key: &GroupKey) -> Option<Total> {
        self.tables.get(grouping)?.get(key).copied()
    }

    /// Converts the tables to rows, in grouping order then key order.
    /// Lane and point indices are resolved against `lanes` and `points`.
    pub fn finalize(
        self,
        lanes: &LaneGeometryRegistry,
        points: &[EvaluationPoint],
    ) -> Vec<AggregatedResult> {
        let mut rows = Vec::with_capacity(self.tables.iter().map(BTreeMap::len).sum());
        for (grouping, table) in self.groupings.iter().zip(self.tables) {
            for (key, total) in table {
                let point = key.point.and_then(|idx| points.get(idx));
                rows.push(AggregatedResult {
                    grouping: grouping.name().to_string(),
                    time_bucket: key.bucket,
                    bucket_label: key.bucket.map(|b| b.label()),
                    pollutant: key.pollutant,
                    lane: key
                        .lane
                        .and_then(|idx| lanes.get(idx))
                        .map(|lane| lane.id().to_string()),
                    approach: key.approach,
                    flow: key.flow,
                    point: point.map(EvaluationPoint::label),
                    x: point.map(|p| p.position().x),
                    y: point.map(|p| p.position().y),
                    concentration_ug_per_m3: to_ug_per_m3(total.sum),
                    contributions: total.count,
                });
            }
        }
        rows
    }
}
