//! Seeded synthetic emission feeds for benchmarks and tests.
//!
//! The generator never touches a global RNG: callers pass the `Rng` in, and
//! [`seeded_rng`] gives the `ChaCha8Rng` the rest of the workspace uses so
//! identical seeds produce identical feeds on every platform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::feed::EmissionRecord;
use crate::geometry::LaneGeometryRegistry;
use crate::pollutant::Pollutant;

/// Typical g/(km·h) magnitudes per pollutant for urban signalized traffic.
fn typical_rate(pollutant: Pollutant) -> f64 {
    match pollutant {
        Pollutant::CO => 400.0,
        Pollutant::CO2 => 60_000.0,
        Pollutant::NOx => 40.0,
        Pollutant::PMx => 2.0,
    }
}

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Shape of a generated feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticFeed {
    /// Width of each reporting interval in seconds.
    pub interval_s: u32,
    pub intervals: u32,
    /// Probability that a lane reports nothing for an interval.
    pub idle_probability: f64,
}

impl Default for SyntheticFeed {
    /// A 24 h day in 15 minute intervals.
    fn default() -> Self {
        Self {
            interval_s: 900,
            intervals: 96,
            idle_probability: 0.05,
        }
    }
}

impl SyntheticFeed {
    /// One record per (interval, lane, pollutant). Rates are drawn around
    /// each pollutant's typical magnitude; idle lanes report zero.
    pub fn generate<R: Rng>(
        &self,
        registry: &LaneGeometryRegistry,
        rng: &mut R,
    ) -> Vec<EmissionRecord> {
        let mut records = Vec::with_capacity(
            self.intervals as usize * registry.len() * Pollutant::ALL.len(),
        );
        for interval in 0..self.intervals {
            let begin = f64::from(interval) * f64::from(self.interval_s);
            let end = begin + f64::from(self.interval_s);
            for lane in registry.iter() {
                let idle = rng.gen_bool(self.idle_probability.clamp(0.0, 1.0));
                let activity: f64 = if idle { 0.0 } else { rng.gen_range(0.2..1.8) };
                for pollutant in Pollutant::ALL {
                    let jitter: f64 = rng.gen_range(0.9..1.1);
                    records.push(EmissionRecord::new(
                        begin,
                        end,
                        lane.id(),
                        pollutant,
                        typical_rate(pollutant) * activity * jitter,
                    ));
                }
            }
        }
        records
    }
}
