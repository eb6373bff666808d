// src/normalize.rs
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tracing::{debug, warn};

use crate::punch::{Direction, NormalizedEvent, PunchRecord};

/// Accepted input formats. Date and time are combined into one timestamp;
/// anything else is rejected row-by-row as `MalformedTimestamp`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";
pub const TIME_FORMAT_SHORT: &str = "%H:%M";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("row {row}: cannot parse timestamp from date '{date}' and time '{time}' (expected {DATE_FORMAT} and {TIME_FORMAT} or {TIME_FORMAT_SHORT})")]
    MalformedTimestamp {
        row: usize,
        date: String,
        time: String,
    },
}

/// Result of normalizing one batch: classified events plus the rows that
/// were dropped. A malformed row never aborts the run.
#[derive(Debug, Default)]
pub struct NormalizeOutcome {
    pub events: Vec<NormalizedEvent>,
    pub rejected: Vec<RowError>,
}

/// Classifies the raw reader label. The label is trimmed and case-folded,
/// then matched by substring containment: anything containing "in" is an
/// Entry, else anything containing "out" is an Exit. Entry is checked
/// first, so a label like "swipe-in-out" or "inout" counts as an Entry.
/// This is a crude but deliberate policy carried over from the source data;
/// it lives only here.
pub fn classify_direction(raw: &str) -> Direction {
    let label = raw.trim().to_lowercase();
    if label.contains("in") {
        Direction::Entry
    } else if label.contains("out") {
        Direction::Exit
    } else {
        Direction::Unknown
    }
}

fn parse_timestamp(date: &str, time: &str) -> Option<(NaiveDate, NaiveDateTime)> {
    let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time.trim(), TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), TIME_FORMAT_SHORT))
        .ok()?;
    Some((date, date.and_time(time)))
}

/// Normalizes one row. `row` is the 1-based position in the input, used
/// only for error reporting.
pub fn normalize_row(row: usize, record: &PunchRecord) -> Result<NormalizedEvent, RowError> {
    let (date, timestamp) =
        parse_timestamp(&record.date, &record.time).ok_or_else(|| RowError::MalformedTimestamp {
            row,
            date: record.date.clone(),
            time: record.time.clone(),
        })?;

    let direction = classify_direction(&record.direction_raw);
    if direction == Direction::Unknown {
        debug!(
            "row {}: direction '{}' matches neither in nor out, event will not aggregate",
            row,
            record.direction_raw.trim()
        );
    }

    Ok(NormalizedEvent {
        employee_id: record.employee_id.clone(),
        employee_name: record.employee_name.clone(),
        date,
        timestamp,
        direction,
    })
}

/// Runs the normalizer over a whole batch, collecting rejected rows
/// instead of failing.
pub fn normalize_batch(records: &[PunchRecord]) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();
    for (idx, record) in records.iter().enumerate() {
        match normalize_row(idx + 1, record) {
            Ok(event) => outcome.events.push(event),
            Err(err) => {
                warn!("dropping malformed row: {}", err);
                outcome.rejected.push(err);
            }
        }
    }
    outcome
}
