//! Bevy surface of the screening engine.
//!
//! Hosts push records into [`PendingEmissions`]; the next `Update` runs the
//! engine on them and leaves the report in [`ScreeningResults`].

use bevy::prelude::*;

use crate::engine::{DispersionEngine, ScreeningConfig, ScreeningReport};
use crate::feed::EmissionRecord;
use crate::time_bucket::TimeBucket;

/// The engine a world screens with. Owns the shared lane registry.
#[derive(Resource, Debug, Clone)]
pub struct ScreeningEngine(pub DispersionEngine);

/// Records waiting for the next screening pass.
#[derive(Resource, Debug, Default)]
pub struct PendingEmissions {
    pub records: Vec<EmissionRecord>,
    /// Restrict the next pass to one bucket instead of the whole feed.
    pub only_bucket: Option<TimeBucket>,
}

impl PendingEmissions {
    pub fn push(&mut self, records: impl IntoIterator<Item = EmissionRecord>) {
        self.records.extend(records);
    }
}

/// Output of the most recent pass.
#[derive(Resource, Debug, Default)]
pub struct ScreeningResults {
    pub report: Option<ScreeningReport>,
    /// Passes completed since startup.
    pub runs: u32,
}

pub struct DispersionPlugin {
    config: ScreeningConfig,
    engine: DispersionEngine,
}

impl DispersionPlugin {
    /// `engine` is expected to have been built from `config`.
    pub fn new(config: ScreeningConfig, engine: DispersionEngine) -> Self {
        Self { config, engine }
    }
}

impl Plugin for DispersionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .insert_resource(ScreeningEngine(self.engine.clone()))
            .init_resource::<PendingEmissions>()
            .init_resource::<ScreeningResults>()
            .add_systems(Update, run_pending_screening);
    }
}

/// Drains [`PendingEmissions`] and screens it. Does nothing while the queue
/// is empty.
pub fn run_pending_screening(
    engine: Res<ScreeningEngine>,
    mut pending: ResMut<PendingEmissions>,
    mut results: ResMut<ScreeningResults>,
) {
    if pending.records.is_empty() {
        return;
    }
    let records = std::mem::take(&mut pending.records);
    let report = match pending.only_bucket.take() {
        Some(bucket) => engine.0.run_bucket(&records, bucket),
        None => engine.0.run(&records),
    };
    results.runs += 1;
    results.report = Some(report);
}
