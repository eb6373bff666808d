// src/output.rs
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::punch::{format_clock, format_hhmm, DailyRecord, WeekBucket, WeeklyRecord};
use crate::weekly::WeekPolicy;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A finished result table, ready for whatever renders or exports it.
/// `slug` is a filesystem-safe identifier used by file-based sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub title: String,
    pub slug: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(title: &str, slug: &str, headers: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            slug: slug.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Destination for result tables. The engine only builds `Table`s; how
/// they are shown or exported is the sink's business.
pub trait TableSink {
    fn publish(&mut self, table: &Table) -> Result<(), SinkError>;
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("failed to write table CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write table JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write output file: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes each published table as `<slug>.csv` in one directory.
pub struct CsvDirSink {
    out_dir: PathBuf,
}

impl CsvDirSink {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl TableSink for CsvDirSink {
    fn publish(&mut self, table: &Table) -> Result<(), SinkError> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{}.csv", table.slug));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        info!("wrote {} ({} rows) to {}", table.title, table.rows.len(), path.display());
        Ok(())
    }
}

/// Writes each published table as `<slug>.json` in one directory, whole
/// table per file (title, headers and rows).
pub struct JsonDirSink {
    out_dir: PathBuf,
}

impl JsonDirSink {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

impl TableSink for JsonDirSink {
    fn publish(&mut self, table: &Table) -> Result<(), SinkError> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{}.json", table.slug));
        serde_json::to_writer_pretty(fs::File::create(&path)?, table)?;
        info!("wrote {} ({} rows) to {}", table.title, table.rows.len(), path.display());
        Ok(())
    }
}

fn total_cell(total: Option<chrono::Duration>) -> String {
    match total {
        Some(total) => format_hhmm(total),
        None => String::new(),
    }
}

/// Full per-day breakdown: endpoints, total and missing-punch status.
pub fn daily_time_analysis(days: &[DailyRecord]) -> Table {
    let mut table = Table::new(
        "Daily Time Analysis",
        "daily_time_analysis",
        &[
            "Employee ID",
            "Name",
            "Date",
            "First In",
            "Last Out",
            "Total Time",
            "Missing Punch",
        ],
    );
    for day in days {
        table.rows.push(vec![
            day.employee_id.clone(),
            day.employee_name.clone(),
            day.date.format(DATE_FORMAT).to_string(),
            format_clock(day.first_in),
            format_clock(day.last_out),
            total_cell(day.total_time),
            day.missing.label().to_string(),
        ]);
    }
    table
}

pub fn daily_under_threshold_table(days: &[DailyRecord]) -> Table {
    let mut table = Table::new(
        "Daily Under-Threshold",
        "daily_under_threshold",
        &["Employee ID", "Name", "Date", "Total Time"],
    );
    for day in days {
        table.rows.push(vec![
            day.employee_id.clone(),
            day.employee_name.clone(),
            day.date.format(DATE_FORMAT).to_string(),
            total_cell(day.total_time),
        ]);
    }
    table
}

/// Weekly roll-up; the week-identifier columns depend on the policy, so
/// the policy is needed even when the record set is empty.
pub fn weekly_under_threshold_table(weeks: &[WeeklyRecord], policy: WeekPolicy) -> Table {
    let headers: &[&str] = match policy {
        WeekPolicy::Calendar => &["Employee ID", "Name", "ISO Year", "ISO Week", "Total Time"],
        WeekPolicy::Rolling => &["Employee ID", "Name", "Week", "Total Time"],
    };
    let mut table = Table::new("Weekly Under-Threshold", "weekly_under_threshold", headers);
    for week in weeks {
        let mut row = vec![week.employee_id.clone(), week.employee_name.clone()];
        match week.bucket {
            WeekBucket::Calendar { iso_year, iso_week } => {
                row.push(iso_year.to_string());
                row.push(iso_week.to_string());
            }
            WeekBucket::Rolling { index } => row.push(index.to_string()),
        }
        row.push(format_hhmm(week.total_time));
        table.rows.push(row);
    }
    table
}

pub fn missing_punch_table(days: &[DailyRecord]) -> Table {
    let mut table = Table::new(
        "Missing Punch Report",
        "missing_punch_report",
        &["Employee ID", "Name", "Date", "Missing Punch"],
    );
    for day in days {
        table.rows.push(vec![
            day.employee_id.clone(),
            day.employee_name.clone(),
            day.date.format(DATE_FORMAT).to_string(),
            day.missing.label().to_string(),
        ]);
    }
    table
}
