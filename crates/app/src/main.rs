//! `screening`: run the intersection screening model over a feed and print
//! one JSON object per result row on stdout. Logs go to stderr.

mod cli;

use std::io::Write;
use std::process::ExitCode;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use dispersion::engine::{DispersionEngine, ScreeningConfig};
use dispersion::error::ScreeningError;
use dispersion::feed::{parse_feed, EmissionRecord};
use dispersion::plugin::{DispersionPlugin, PendingEmissions, ScreeningResults};
use dispersion::synthetic::{seeded_rng, SyntheticFeed};

use cli::{Args, FeedSource};

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(usage) => {
            eprintln!("{usage}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("screening failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_records(
    source: &FeedSource,
    engine: &DispersionEngine,
) -> Result<Vec<EmissionRecord>, ScreeningError> {
    match source {
        FeedSource::File(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(parse_feed(&json)?)
        }
        FeedSource::Synthetic(seed) => {
            Ok(SyntheticFeed::default().generate(engine.registry(), &mut seeded_rng(*seed)))
        }
    }
}

fn run(args: &Args) -> Result<(), ScreeningError> {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin::default());

    let config = ScreeningConfig::from_json_str(&std::fs::read_to_string(&args.config)?)?;
    let engine = DispersionEngine::from_config(&config)?;
    // Parse the whole feed before anything is computed
    let records = load_records(&args.feed, &engine)?;
    app.add_plugins(DispersionPlugin::new(config, engine));

    app.world_mut()
        .resource_mut::<PendingEmissions>()
        .push(records);
    app.update();

    let Some(report) = app
        .world_mut()
        .resource_mut::<ScreeningResults>()
        .report
        .take()
    else {
        warn!("No emission records to screen");
        return Ok(());
    };

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    for row in &report.rows {
        serde_json::to_writer(&mut out, row).map_err(std::io::Error::from)?;
        writeln!(out)?;
    }
    out.flush()?;

    info!(
        "Wrote {} rows ({} skipped records, {} unknown lanes)",
        report.rows.len(),
        report.warnings.skipped_records,
        report.warnings.unknown_lanes.len()
    );
    Ok(())
}
