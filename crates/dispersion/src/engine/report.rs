use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::AggregatedResult;

/// Recoverable problems met during a run. None of them stop the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunWarnings {
    /// Lane id as written in the feed → number of records skipped.
    pub unknown_lanes: BTreeMap<String, u64>,
    /// Records that produced no contributions: unknown lanes plus records
    /// that failed validation.
    pub skipped_records: u64,
    /// The run finished without a single output row.
    pub empty_result: bool,
}

impl RunWarnings {
    pub fn is_clean(&self) -> bool {
        self.skipped_records == 0 && !self.empty_result
    }

    pub(crate) fn unknown_lane(&mut self, lane_id: &str) {
        *self.unknown_lanes.entry(lane_id.to_string()).or_default() += 1;
        self.skipped_records += 1;
    }

    pub(crate) fn invalid_record(&mut self) {
        self.skipped_records += 1;
    }

    pub fn merge(&mut self, other: RunWarnings) {
        for (lane, count) in other.unknown_lanes {
            *self.unknown_lanes.entry(lane).or_default() += count;
        }
        self.skipped_records += other.skipped_records;
        self.empty_result |= other.empty_result;
    }
}

/// Everything a run hands back to its caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScreeningReport {
    pub rows: Vec<AggregatedResult>,
    pub warnings: RunWarnings,
}

impl ScreeningReport {
    /// Rows of one grouping, e.g. `"pollutant"`.
    pub fn grouping<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AggregatedResult> + 'a {
        self.rows.iter().filter(move |r| r.grouping == name)
    }
}
