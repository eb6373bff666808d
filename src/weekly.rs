// src/weekly.rs
use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::punch::{DailyRecord, WeekBucket, WeeklyRecord};

/// How daily totals are grouped into weeks. The two policies are mutually
/// exclusive within a run and produce differently-shaped buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WeekPolicy {
    /// ISO-8601 calendar weeks: bucket = (ISO week-year, ISO week number).
    /// A late-December date can belong to week 1 of the following ISO year.
    Calendar,
    /// 7-day windows counted from the earliest date in the whole batch.
    /// Window boundaries are shared across employees and need not align
    /// with calendar weeks.
    Rolling,
}

fn bucket_for(policy: WeekPolicy, date: NaiveDate, anchor: NaiveDate) -> WeekBucket {
    match policy {
        WeekPolicy::Calendar => {
            let iso = date.iso_week();
            WeekBucket::Calendar {
                iso_year: iso.year(),
                iso_week: iso.week(),
            }
        }
        WeekPolicy::Rolling => WeekBucket::Rolling {
            index: (date - anchor).num_days().div_euclid(7) + 1,
        },
    }
}

/// Sums daily totals into one record per employee and week bucket. Days
/// without a total (missing punch) contribute zero rather than being
/// excluded, so an employee with incomplete days still accumulates the
/// complete ones. Output is sorted by (id, name, bucket).
pub fn aggregate_weekly(days: &[DailyRecord], policy: WeekPolicy) -> Vec<WeeklyRecord> {
    // The rolling anchor is the earliest date anywhere in the batch, not
    // per employee, so window boundaries line up across the report.
    let anchor = match days.iter().map(|d| d.date).min() {
        Some(min) => min,
        None => return Vec::new(),
    };

    let mut weeks: BTreeMap<(String, String, WeekBucket), Duration> = BTreeMap::new();
    for day in days {
        let key = (
            day.employee_id.clone(),
            day.employee_name.clone(),
            bucket_for(policy, day.date, anchor),
        );
        let total = weeks.entry(key).or_insert_with(Duration::zero);
        *total += day.total_time.unwrap_or_else(Duration::zero);
    }

    weeks
        .into_iter()
        .map(|((employee_id, employee_name, bucket), total_time)| WeeklyRecord {
            employee_id,
            employee_name,
            bucket,
            total_time,
        })
        .collect()
}
