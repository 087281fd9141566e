//! Cycle length averaging and next-period prediction.
//!
//! The average is the rounded mean gap between consecutive cycle starts.
//! There is no outlier rejection: one irregular cycle moves the average
//! until later cycles dilute it.

use chrono::{Days, NaiveDate};

use crate::cycle::{CycleData, CycleHistoryEntry};

/// Mean gap in days between consecutive history starts, rounded half up.
///
/// With fewer than two entries there is no gap to measure and `prior` is
/// returned unchanged.
pub fn average_cycle_length(history: &[CycleHistoryEntry], prior: u32) -> u32 {
    if history.len() < 2 {
        return prior;
    }

    let total_days: i64 = history
        .windows(2)
        .map(|pair| (pair[1].start - pair[0].start).num_days())
        .sum();
    let mean = total_days as f64 / (history.len() - 1) as f64;

    round_half_up(mean).clamp(0, u32::MAX as i64) as u32
}

/// `last_start + average` days. `None` only if the date overflows.
pub fn predict_next_date(last_start: NaiveDate, average: u32) -> Option<NaiveDate> {
    last_start.checked_add_days(Days::new(u64::from(average)))
}

/// Start of the current cycle, or of the last archived one.
pub fn last_known_start(data: &CycleData) -> Option<NaiveDate> {
    data.start_date()
        .or_else(|| data.cycle_history.last().map(|c| c.start))
}

pub fn predicted_next_date(data: &CycleData) -> Option<NaiveDate> {
    last_known_start(data).and_then(|start| predict_next_date(start, data.average_cycle_length))
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
