use std::collections::BTreeMap;
use std::sync::Arc;

use bevy::log::{debug, info, info_span, warn};
use bevy::tasks::{ComputeTaskPool, TaskPool};

use crate::aggregate::{Aggregator, Contribution, Grouping};
use crate::concentration::ConcentrationModel;
use crate::decompose::SegmentDecomposer;
use crate::downwind::DownwindFilter;
use crate::error::ConfigError;
use crate::feed::EmissionRecord;
use crate::geometry::LaneGeometryRegistry;
use crate::points::{EvaluationPoint, Positioned};
use crate::time_bucket::TimeBucket;

use super::report::{RunWarnings, ScreeningReport};
use super::settings::ScreeningConfig;

/// Turns emission records into aggregated concentrations.
///
/// Everything here is immutable once built, so one engine can serve any
/// number of runs and can be cloned cheaply into worker tasks.
#[derive(Debug, Clone)]
pub struct DispersionEngine {
    registry: Arc<LaneGeometryRegistry>,
    decomposer: SegmentDecomposer,
    filter: DownwindFilter,
    model: ConcentrationModel,
    points: Arc<[EvaluationPoint]>,
    groupings: Arc<[Grouping]>,
    bucket_seconds: u32,
}

impl DispersionEngine {
    /// Validates `config` and materializes its evaluation points against
    /// `registry`.
    pub fn new(
        config: &ScreeningConfig,
        registry: Arc<LaneGeometryRegistry>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let wind = &config.wind;
        let decomposer = SegmentDecomposer::new(config.segments_per_lane, config.anchor)?;
        let filter = DownwindFilter::new(wind.direction_deg, wind.half_angle_deg, wind.convention);
        let model = ConcentrationModel::new(
            wind.speed,
            wind.mixing_height,
            config.lateral_spread_factor,
            config.min_distance,
        )?;
        let points: Arc<[EvaluationPoint]> = config.mode.points()?.into();
        let groupings: Arc<[Grouping]> = config.build_groupings()?.into();

        info!(
            "Dispersion engine ready: {} lanes x {} segments, {} evaluation points, {} groupings, downwind centre {:.1} deg +/- {:.1}",
            registry.len(),
            decomposer.segments(),
            points.len(),
            groupings.len(),
            filter.center_deg(),
            filter.half_angle_deg(),
        );

        Ok(Self {
            registry,
            decomposer,
            filter,
            model,
            points,
            groupings,
            bucket_seconds: config.bucket_seconds,
        })
    }

    /// Builds the lane registry described by `config` and the engine on top.
    pub fn from_config(config: &ScreeningConfig) -> Result<Self, ConfigError> {
        let registry = config.build_registry()?;
        Self::new(config, Arc::new(registry))
    }

    pub fn registry(&self) -> &LaneGeometryRegistry {
        &self.registry
    }

    pub fn points(&self) -> &[EvaluationPoint] {
        &self.points
    }

    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    pub fn filter(&self) -> &DownwindFilter {
        &self.filter
    }

    pub fn model(&self) -> &ConcentrationModel {
        &self.model
    }

    pub fn bucket_seconds(&self) -> u32 {
        self.bucket_seconds
    }

    /// Bucket number `index` at this engine's width, if representable.
    pub fn bucket(&self, index: u64) -> Option<TimeBucket> {
        TimeBucket::from_index(index, self.bucket_seconds)
    }

    /// Distinct buckets touched by valid records, in time order.
    pub fn buckets(&self, records: &[EmissionRecord]) -> Vec<TimeBucket> {
        let mut buckets: Vec<TimeBucket> = records
            .iter()
            .filter(|r| r.validate().is_ok())
            .filter_map(|r| r.bucket(self.bucket_seconds))
            .collect();
        buckets.sort_unstable();
        buckets.dedup();
        buckets
    }

    pub fn new_aggregator(&self) -> Aggregator {
        Aggregator::new(self.groupings.clone())
    }

    /// Computes every bucket on the compute task pool and merges the
    /// partial results.
    pub fn run(&self, records: &[EmissionRecord]) -> ScreeningReport {
        let (partitions, mut warnings) = self.partition(records);
        info!(
            "Screening {} records in {} time buckets",
            records.len(),
            partitions.len()
        );

        let pool = ComputeTaskPool::get_or_init(TaskPool::default);
        let partials = pool.scope(|scope| {
            for (bucket, bucket_records) in &partitions {
                scope.spawn(async move { self.compute(*bucket, bucket_records) });
            }
        });

        let mut aggregator = self.new_aggregator();
        for (partial, partial_warnings) in partials {
            aggregator.merge(partial);
            warnings.merge(partial_warnings);
        }
        self.finish(aggregator, warnings)
    }

    /// Same result as [`Self::run`], one bucket at a time on the calling
    /// thread.
    pub fn run_sequential(&self, records: &[EmissionRecord]) -> ScreeningReport {
        let (partitions, mut warnings) = self.partition(records);
        let mut aggregator = self.new_aggregator();
        for (bucket, bucket_records) in &partitions {
            let (partial, partial_warnings) = self.compute(*bucket, bucket_records);
            aggregator.merge(partial);
            warnings.merge(partial_warnings);
        }
        self.finish(aggregator, warnings)
    }

    /// Recomputes a single bucket from scratch. Records outside `bucket`
    /// are ignored and do not count as skipped.
    pub fn run_bucket(&self, records: &[EmissionRecord], bucket: TimeBucket) -> ScreeningReport {
        let Some(bucket) = self.bucket(bucket.index) else {
            return self.finish(self.new_aggregator(), RunWarnings::default());
        };
        let selected: Vec<&EmissionRecord> = records
            .iter()
            .filter(|r| r.validate().is_ok() && r.bucket(self.bucket_seconds) == Some(bucket))
            .collect();
        let (aggregator, warnings) = self.compute(bucket, &selected);
        self.finish(aggregator, warnings)
    }

    /// Splits valid records by bucket. Invalid records are dropped and
    /// counted.
    fn partition<'r>(
        &self,
        records: &'r [EmissionRecord],
    ) -> (BTreeMap<TimeBucket, Vec<&'r EmissionRecord>>, RunWarnings) {
        let mut partitions: BTreeMap<TimeBucket, Vec<&EmissionRecord>> = BTreeMap::new();
        let mut warnings = RunWarnings::default();
        for record in records {
            let bucket = match record.validate() {
                Ok(()) => record.bucket(self.bucket_seconds),
                Err(reason) => {
                    debug!("Skipping record for lane '{}': {}", record.lane_id, reason);
                    None
                }
            };
            let Some(bucket) = bucket else {
                warnings.invalid_record();
                continue;
            };
            partitions.entry(bucket).or_default().push(record);
        }
        if warnings.skipped_records > 0 {
            warn!("Skipped {} invalid emission records", warnings.skipped_records);
        }
        (partitions, warnings)
    }

    /// Map step for one bucket: decompose, filter, evaluate, accumulate.
    fn compute(&self, bucket: TimeBucket, records: &[&EmissionRecord]) -> (Aggregator, RunWarnings) {
        let _span = info_span!("screening_bucket", bucket = bucket.index).entered();
        let mut aggregator = self.new_aggregator();
        let mut warnings = RunWarnings::default();

        for record in records {
            let resolved = self
                .registry
                .lookup_index(&record.lane_id)
                .ok()
                .and_then(|idx| self.registry.get(idx).map(|lane| (idx, lane)));
            let Some((lane_idx, lane)) = resolved else {
                warnings.unknown_lane(&record.lane_id);
                continue;
            };

            for segment in self.decomposer.decompose(lane, record.normalized_rate) {
                for (point_idx, point) in self.points.iter().enumerate() {
                    let target = point.position();
                    if !self.filter.admits(segment.position, target) {
                        continue;
                    }
                    let distance = segment.position.distance(target);
                    aggregator.accumulate(&Contribution {
                        bucket,
                        pollutant: record.pollutant,
                        lane: lane_idx,
                        approach: lane.approach(),
                        flow: lane.flow(),
                        segment: segment.index,
                        point: point_idx,
                        distance,
                        concentration: self.model.at_distance(segment.emission_rate, distance),
                    });
                }
            }
        }

        debug!(
            "Bucket {} done: {} records, {} contributions",
            bucket,
            records.len(),
            aggregator.contribution_count()
        );
        (aggregator, warnings)
    }

    /// Reduce step: finalize rows and report what was skipped.
    fn finish(&self, aggregator: Aggregator, mut warnings: RunWarnings) -> ScreeningReport {
        let contributions = aggregator.contribution_count();
        let rows = aggregator.finalize(&self.registry, &self.points);

        for (lane, count) in &warnings.unknown_lanes {
            warn!("Unknown lane '{}': skipped {} records", lane, count);
        }
        if rows.is_empty() {
            warnings.empty_result = true;
            warn!("Screening produced no results: no record reached any evaluation point");
        }
        info!(
            "Screening finished: {} contributions, {} rows, {} skipped records",
            contributions,
            rows.len(),
            warnings.skipped_records
        );
        ScreeningReport { rows, warnings }
    }
}
