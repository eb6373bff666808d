// src/daily.rs
use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::punch::{DailyRecord, Direction, MissingPunch, NormalizedEvent};

/// Grouping key includes the name alongside the id, so one id appearing
/// under two name spellings stays two groups.
type DayKey = (String, String, NaiveDate);

#[derive(Debug, Default)]
struct DayEndpoints {
    first_in: Option<NaiveDateTime>,
    last_out: Option<NaiveDateTime>,
}

/// Reduces a batch of classified events to one record per employee and
/// calendar date: earliest Entry, latest Exit, and the signed difference
/// when both are present. Unknown-direction events are dropped here. A key
/// present in only one of the two subsets still yields a record (union,
/// not intersection). Output is sorted by (id, name, date) regardless of
/// input order.
pub fn reduce_daily(events: &[NormalizedEvent]) -> Vec<DailyRecord> {
    let mut days: BTreeMap<DayKey, DayEndpoints> = BTreeMap::new();
    let mut unknown = 0usize;

    for event in events {
        let key = (
            event.employee_id.clone(),
            event.employee_name.clone(),
            event.date,
        );
        match event.direction {
            Direction::Entry => {
                let endpoints = days.entry(key).or_default();
                endpoints.first_in = Some(match endpoints.first_in {
                    Some(current) => current.min(event.timestamp),
                    None => event.timestamp,
                });
            }
            Direction::Exit => {
                let endpoints = days.entry(key).or_default();
                endpoints.last_out = Some(match endpoints.last_out {
                    Some(current) => current.max(event.timestamp),
                    None => event.timestamp,
                });
            }
            Direction::Unknown => unknown += 1,
        }
    }

    if unknown > 0 {
        debug!("{} unknown-direction events excluded from daily reduction", unknown);
    }

    days.into_iter()
        .map(|((employee_id, employee_name, date), endpoints)| {
            // Negative totals (exit logged before the first entry) are kept
            // as-is; downstream filters see them as under any threshold.
            let total_time = match (endpoints.first_in, endpoints.last_out) {
                (Some(first_in), Some(last_out)) => Some(last_out - first_in),
                _ => None,
            };
            DailyRecord {
                employee_id,
                employee_name,
                date,
                first_in: endpoints.first_in,
                last_out: endpoints.last_out,
                total_time,
                missing: MissingPunch::from_presence(
                    endpoints.first_in.is_some(),
                    endpoints.last_out.is_some(),
                ),
            }
        })
        .collect()
}
