// src/filters.rs
use chrono::Duration;

use crate::punch::{DailyRecord, MissingPunch, WeeklyRecord};

/// Days with a defined total strictly under the threshold. Days with no
/// total (a missing punch) are excluded here; they belong to the
/// missing-punch report instead of being double-counted as short days.
/// Negative totals qualify, which is how anomalous exit-before-entry days
/// surface in this report.
pub fn daily_under_threshold(days: &[DailyRecord], threshold: Duration) -> Vec<DailyRecord> {
    days.iter()
        .filter(|day| matches!(day.total_time, Some(total) if total < threshold))
        .cloned()
        .collect()
}

/// Weeks with a total strictly under the threshold. No exclusion: a week
/// that sums to zero (all days incomplete, or an absent employee) is
/// reported here too.
pub fn weekly_under_threshold(weeks: &[WeeklyRecord], threshold: Duration) -> Vec<WeeklyRecord> {
    weeks
        .iter()
        .filter(|week| week.total_time < threshold)
        .cloned()
        .collect()
}

/// All days with an incomplete punch pair.
pub fn missing_punch_report(days: &[DailyRecord]) -> Vec<DailyRecord> {
    days.iter()
        .filter(|day| day.missing != MissingPunch::None)
        .cloned()
        .collect()
}
