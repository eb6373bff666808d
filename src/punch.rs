// src/punch.rs
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// --- Raw input ---

/// One badge read as it appears in the input table. Fields are kept as the
/// raw strings from the CSV; parsing and classification happen in the
/// normalizer so a bad row can be rejected individually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub date: String,
    pub time: String,
    /// Raw contents of the "reader in and out" column. An absent cell is
    /// stored as an empty string, never as a missing field.
    pub direction_raw: String,
}

// --- Classified events ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Entry,
    Exit,
    /// Direction string matched neither "in" nor "out". Not an error: the
    /// event is excluded from aggregation.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub timestamp: NaiveDateTime,
    pub direction: Direction,
}

// --- Daily reduction ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingPunch {
    None,
    EntryMissing,
    ExitMissing,
    BothMissing,
}

impl MissingPunch {
    /// Status is a pure function of which endpoints are present.
    pub fn from_presence(has_first_in: bool, has_last_out: bool) -> Self {
        match (has_first_in, has_last_out) {
            (true, true) => MissingPunch::None,
            (false, true) => MissingPunch::EntryMissing,
            (true, false) => MissingPunch::ExitMissing,
            (false, false) => MissingPunch::BothMissing,
        }
    }

    /// Rendering for the report tables; `None` shows as an empty cell.
    pub fn label(&self) -> &'static str {
        match self {
            MissingPunch::None => "",
            MissingPunch::EntryMissing => "Entry Missing",
            MissingPunch::ExitMissing => "Exit Missing",
            MissingPunch::BothMissing => "Both Missing",
        }
    }
}

/// First-in/last-out summary for one employee on one calendar date.
/// `total_time` is defined only when both endpoints are present and may be
/// negative when the last exit precedes the first entry; that value is
/// passed through uncorrected rather than clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub first_in: Option<NaiveDateTime>,
    pub last_out: Option<NaiveDateTime>,
    #[serde(with = "duration_minutes_opt")]
    pub total_time: Option<Duration>,
    pub missing: MissingPunch,
}

// --- Weekly aggregation ---

/// Week grouping key. Exactly one variant appears within a single run,
/// selected by the configured week policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeekBucket {
    /// ISO-8601 week-year and week number.
    Calendar { iso_year: i32, iso_week: u32 },
    /// 1-based index of a 7-day window counted from the batch's earliest date.
    Rolling { index: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    pub employee_id: String,
    pub employee_name: String,
    pub bucket: WeekBucket,
    #[serde(with = "duration_minutes")]
    pub total_time: Duration,
}

// --- Rendering helpers ---

/// Renders a duration as zero-padded `HH:MM` from whole minutes, with a
/// leading `-` when negative (hours are not capped at 24).
pub fn format_hhmm(total: Duration) -> String {
    let minutes = total.num_minutes();
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.abs();
    format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

/// Renders a timestamp's clock component as `HH:MM`, or an empty cell.
pub fn format_clock(ts: Option<NaiveDateTime>) -> String {
    match ts {
        Some(ts) => ts.format("%H:%M").to_string(),
        None => String::new(),
    }
}

// chrono's Duration has no serde support; totals are serialized as whole
// minutes, matching the precision of the report tables.
mod duration_minutes {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_minutes())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::minutes(i64::deserialize(d)?))
    }
}

mod duration_minutes_opt {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.num_minutes()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<i64>::deserialize(d)?.map(Duration::minutes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_status_follows_endpoint_presence() {
        assert_eq!(MissingPunch::from_presence(true, true), MissingPunch::None);
        assert_eq!(
            MissingPunch::from_presence(false, true),
            MissingPunch::EntryMissing
        );
        assert_eq!(
            MissingPunch::from_presence(true, false),
            MissingPunch::ExitMissing
        );
        assert_eq!(
            MissingPunch::from_presence(false, false),
            MissingPunch::BothMissing
        );
    }

    #[test]
    fn hhmm_formats_zero_padded() {
        assert_eq!(format_hhmm(Duration::minutes(570)), "09:30");
        assert_eq!(format_hhmm(Duration::minutes(0)), "00:00");
        assert_eq!(format_hhmm(Duration::minutes(61)), "01:01");
    }

    #[test]
    fn hhmm_keeps_negative_durations_signed() {
        assert_eq!(format_hhmm(Duration::minutes(-90)), "-01:30");
    }

    #[test]
    fn hhmm_exceeds_24_hours_for_weekly_totals() {
        assert_eq!(format_hhmm(Duration::hours(49)), "49:00");
    }

    #[test]
    fn clock_renders_hours_and_minutes_only() {
        let ts = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 5, 59)
            .unwrap();
        assert_eq!(format_clock(Some(ts)), "08:05");
        assert_eq!(format_clock(None), "");
    }
}
