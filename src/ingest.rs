// src/ingest.rs
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::info;

use crate::punch::PunchRecord;

/// Required input columns, matched case- and surrounding-whitespace-
/// insensitively against the CSV header.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "employee id",
    "employee name",
    "date",
    "time",
    "reader in and out",
];

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("input is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("failed to read input CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open input file: {0}")]
    Io(#[from] std::io::Error),
}

struct ColumnIndexes {
    employee_id: usize,
    employee_name: usize,
    date: usize,
    time: usize,
    direction: usize,
}

/// Validates the header and resolves each required column to its position.
/// All missing columns are reported in one error, not just the first.
fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnIndexes, IngestError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| find(name).is_none())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    Ok(ColumnIndexes {
        employee_id: find(REQUIRED_COLUMNS[0]).unwrap(),
        employee_name: find(REQUIRED_COLUMNS[1]).unwrap(),
        date: find(REQUIRED_COLUMNS[2]).unwrap(),
        time: find(REQUIRED_COLUMNS[3]).unwrap(),
        direction: find(REQUIRED_COLUMNS[4]).unwrap(),
    })
}

/// Reads the whole punch table. Extra columns are ignored; a short row's
/// absent trailing cells (commonly the direction) become empty strings so
/// the normalizer can treat them as blank rather than failing the batch.
pub fn read_punches<R: Read>(reader: R) -> Result<Vec<PunchRecord>, IngestError> {
    let mut csv_reader = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = resolve_columns(csv_reader.headers()?)?;

    let cell = |row: &csv::StringRecord, idx: usize| row.get(idx).unwrap_or("").to_string();

    let mut punches = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        punches.push(PunchRecord {
            employee_id: cell(&row, columns.employee_id),
            employee_name: cell(&row, columns.employee_name),
            date: cell(&row, columns.date),
            time: cell(&row, columns.time),
            direction_raw: cell(&row, columns.direction),
        });
    }
    Ok(punches)
}

pub fn read_punches_from_path(path: &Path) -> Result<Vec<PunchRecord>, IngestError> {
    let punches = read_punches(File::open(path)?)?;
    info!("read {} punch rows from {}", punches.len(), path.display());
    Ok(punches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_match_ignores_case_and_whitespace() {
        let input = "Employee ID, Employee Name ,DATE,Time,Reader In And Out\n\
                     E1,Alice,2024-03-01,08:00,in\n";
        let punches = read_punches(input.as_bytes()).unwrap();
        assert_eq!(punches.len(), 1);
        assert_eq!(punches[0].employee_id, "E1");
        assert_eq!(punches[0].direction_raw, "in");
    }

    #[test]
    fn all_missing_columns_are_named_in_one_error() {
        let input = "employee id,date\nE1,2024-03-01\n";
        let err = read_punches(input.as_bytes()).unwrap_err();
        match err {
            IngestError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["employee name", "time", "reader in and out"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
        let input = "employee id,date\n";
        let message = read_punches(input.as_bytes()).unwrap_err().to_string();
        assert!(message.contains("employee name"));
        assert!(message.contains("time"));
        assert!(message.contains("reader in and out"));
    }

    #[test]
    fn short_rows_get_empty_direction_cells() {
        let input = "employee id,employee name,date,time,reader in and out\n\
                     E1,Alice,2024-03-01,08:00\n";
        let punches = read_punches(input.as_bytes()).unwrap();
        assert_eq!(punches[0].direction_raw, "");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let input = "site,employee id,employee name,date,time,reader in and out\n\
                     HQ,E1,Alice,2024-03-01,08:00,in\n";
        let punches = read_punches(input.as_bytes()).unwrap();
        assert_eq!(punches[0].employee_id, "E1");
        assert_eq!(punches[0].employee_name, "Alice");
    }
}
