use std::fmt;

use serde::Serialize;

/// Fixed-width window of interval start times used as an aggregation key.
///
/// Intervals are bucketed by their begin time only, so an interval that
/// straddles a bucket edge belongs wholly to the bucket it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimeBucket {
    pub index: u64,
    pub begin_s: u64,
    pub end_s: u64,
}

impl TimeBucket {
    /// Bucket of width `width_s` seconds containing `interval_begin_s`.
    /// `None` for a zero width, a negative or non-finite time, or a bucket
    /// whose end does not fit in a `u64`. Feed records are capped at
    /// [`crate::config::MAX_INTERVAL_TIME_S`], which always has a bucket.
    pub fn containing(interval_begin_s: f64, width_s: u32) -> Option<Self> {
        if width_s == 0 || !interval_begin_s.is_finite() || interval_begin_s < 0.0 {
            return None;
        }
        let index = (interval_begin_s / f64::from(width_s)).floor();
        if index >= u64::MAX as f64 {
            return None;
        }
        Self::from_index(index as u64, width_s)
    }

    /// Bucket number `index` of width `width_s`, if its bounds fit in a
    /// `u64`.
    pub fn from_index(index: u64, width_s: u32) -> Option<Self> {
        if width_s == 0 {
            return None;
        }
        let width = u64::from(width_s);
        let begin_s = index.checked_mul(width)?;
        Some(Self {
            index,
            begin_s,
            end_s: begin_s.checked_add(width)?,
        })
    }

    /// `HH:MM to HH:MM`; hours keep counting past midnight.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

fn clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60)
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", clock(self.begin_s), clock(self.end_s))
    }
}
