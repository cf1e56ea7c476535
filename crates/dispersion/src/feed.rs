//! Emission feed records and the JSON adapter that produces them.
//!
//! Two record shapes are accepted in the same array:
//!
//! - one pollutant per record:
//!   `{"interval_begin": 0, "interval_end": 900, "lane_id": "North In",
//!     "pollutant": "CO", "normalized_rate": 120.5}`
//! - one lane per record with every pollutant as a `<name>_normed` rate:
//!   `{"interval_begin": 0, "interval_end": 900, "lane_id": "1232571604",
//!     "rates": {"CO_normed": 120.5, "NOx_normed": 3.2}}`
//!
//! A missing rate, or a pollutant absent from `rates`, is zero emission.
//! Anything else that is off (bad JSON, unknown pollutant, negative rate,
//! interval ending before it begins) rejects the whole feed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::MAX_INTERVAL_TIME_S;
use crate::error::InputParseError;
use crate::pollutant::Pollutant;
use crate::time_bucket::TimeBucket;

/// One (interval, lane, pollutant) emission rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionRecord {
    pub interval_begin: f64,
    pub interval_end: f64,
    pub lane_id: String,
    pub pollutant: Pollutant,
    /// g/(km·h).
    pub normalized_rate: f64,
}

impl EmissionRecord {
    pub fn new(
        interval_begin: f64,
        interval_end: f64,
        lane_id: impl Into<String>,
        pollutant: Pollutant,
        normalized_rate: f64,
    ) -> Self {
        Self {
            interval_begin,
            interval_end,
            lane_id: lane_id.into(),
            pollutant,
            normalized_rate,
        }
    }

    /// Checks the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), String> {
        if !self.interval_begin.is_finite() || self.interval_begin < 0.0 {
            return Err(format!("invalid interval_begin {}", self.interval_begin));
        }
        if self.interval_begin > MAX_INTERVAL_TIME_S || self.interval_end > MAX_INTERVAL_TIME_S {
            return Err(format!(
                "interval {}..{} is past the latest supported time {}",
                self.interval_begin, self.interval_end, MAX_INTERVAL_TIME_S
            ));
        }
        if !self.interval_end.is_finite() || self.interval_end < self.interval_begin {
            return Err(format!(
                "interval ends at {} before it begins at {}",
                self.interval_end, self.interval_begin
            ));
        }
        if !self.normalized_rate.is_finite() || self.normalized_rate < 0.0 {
            return Err(format!("invalid normalized_rate {}", self.normalized_rate));
        }
        if self.lane_id.trim().is_empty() {
            return Err("empty lane_id".to_string());
        }
        Ok(())
    }

    /// Bucket this record falls in; always `Some` for a record that passes
    /// [`Self::validate`] and a non-zero width.
    pub fn bucket(&self, width_s: u32) -> Option<TimeBucket> {
        TimeBucket::containing(self.interval_begin, width_s)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecord {
    Single {
        interval_begin: f64,
        interval_end: f64,
        lane_id: String,
        pollutant: String,
        #[serde(default)]
        normalized_rate: Option<f64>,
    },
    Lane {
        interval_begin: f64,
        interval_end: f64,
        lane_id: String,
        rates: BTreeMap<String, f64>,
    },
}

fn parse_pollutant(idx: usize, name: &str) -> Result<Pollutant, InputParseError> {
    name.parse::<Pollutant>()
        .map_err(|msg| InputParseError::at(idx, msg))
}

fn expand(idx: usize, raw: RawRecord) -> Result<Vec<EmissionRecord>, InputParseError> {
    match raw {
        RawRecord::Single {
            interval_begin,
            interval_end,
            lane_id,
            pollutant,
            normalized_rate,
        } => Ok(vec![EmissionRecord::new(
            interval_begin,
            interval_end,
            lane_id,
            parse_pollutant(idx, &pollutant)?,
            normalized_rate.unwrap_or(0.0),
        )]),
        RawRecord::Lane {
            interval_begin,
            interval_end,
            lane_id,
            rates,
        } => {
            let mut by_pollutant = BTreeMap::new();
            for (name, rate) in rates {
                by_pollutant.insert(parse_pollutant(idx, &name)?, rate);
            }
            Ok(Pollutant::ALL
                .into_iter()
                .map(|p| {
                    EmissionRecord::new(
                        interval_begin,
                        interval_end,
                        lane_id.clone(),
                        p,
                        by_pollutant.get(&p).copied().unwrap_or(0.0),
                    )
                })
                .collect())
        }
    }
}

/// Parses and validates a JSON feed. Fails on the first bad record.
pub fn parse_feed(json: &str) -> Result<Vec<EmissionRecord>, InputParseError> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
    let mut records = Vec::with_capacity(raw.len());
    for (idx, value) in raw.into_iter().enumerate() {
        let parsed: RawRecord = serde_json::from_value(value).map_err(|e| {
            InputParseError::at(idx, format!("unrecognized record shape: {e}"))
        })?;
        for record in expand(idx, parsed)? {
            record
                .validate()
                .map_err(|msg| InputParseError::at(idx, msg))?;
            records.push(record);
        }
    }
    Ok(records)
}

/// Checks records built in code rather than parsed.
pub fn validate_records(records: &[EmissionRecord]) -> Result<(), InputParseError> {
    for (idx, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|msg| InputParseError::at(idx, msg))?;
    }
    Ok(())
}
