// src/config.rs
use std::env;

use anyhow::{bail, Context, Result};
use chrono::Duration;

use crate::weekly::WeekPolicy;

pub const DEFAULT_DAILY_HOURS: i64 = 9;
pub const DEFAULT_WEEKLY_HOURS: i64 = 49;

const ENV_DAILY_HOURS: &str = "ATWORK_DAILY_HOURS";
const ENV_WEEKLY_HOURS: &str = "ATWORK_WEEKLY_HOURS";
const ENV_WEEK_POLICY: &str = "ATWORK_WEEK_POLICY";

/// Thresholds and week-grouping policy for one analysis run. Built once in
/// `main` and passed explicitly into the aggregator and filters; nothing
/// reads a process-wide default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub daily_threshold: Duration,
    pub weekly_threshold: Duration,
    pub week_policy: WeekPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            daily_threshold: Duration::hours(DEFAULT_DAILY_HOURS),
            weekly_threshold: Duration::hours(DEFAULT_WEEKLY_HOURS),
            week_policy: WeekPolicy::Calendar,
        }
    }
}

impl AnalysisConfig {
    /// Defaults with environment overrides applied. CLI flags are layered
    /// on top of this by the caller.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(hours) = env_hours(ENV_DAILY_HOURS)? {
            config.daily_threshold = Duration::hours(hours);
        }
        if let Some(hours) = env_hours(ENV_WEEKLY_HOURS)? {
            config.weekly_threshold = Duration::hours(hours);
        }
        if let Ok(policy) = env::var(ENV_WEEK_POLICY) {
            config.week_policy = parse_policy(&policy)?;
        }
        Ok(config)
    }

    pub fn with_overrides(
        mut self,
        daily_hours: Option<i64>,
        weekly_hours: Option<i64>,
        week_policy: Option<WeekPolicy>,
    ) -> Self {
        if let Some(hours) = daily_hours {
            self.daily_threshold = Duration::hours(hours);
        }
        if let Some(hours) = weekly_hours {
            self.weekly_threshold = Duration::hours(hours);
        }
        if let Some(policy) = week_policy {
            self.week_policy = policy;
        }
        self
    }
}

fn env_hours(var: &str) -> Result<Option<i64>> {
    match env::var(var) {
        Ok(value) => {
            let hours = value
                .trim()
                .parse::<i64>()
                .with_context(|| format!("{} must be a whole number of hours, got '{}'", var, value))?;
            Ok(Some(hours))
        }
        Err(_) => Ok(None),
    }
}

fn parse_policy(value: &str) -> Result<WeekPolicy> {
    match value.trim().to_lowercase().as_str() {
        "calendar" => Ok(WeekPolicy::Calendar),
        "rolling" => Ok(WeekPolicy::Rolling),
        other => bail!(
            "{} must be 'calendar' or 'rolling', got '{}'",
            ENV_WEEK_POLICY,
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_thresholds() {
        let config = AnalysisConfig::default();
        assert_eq!(config.daily_threshold, Duration::hours(9));
        assert_eq!(config.weekly_threshold, Duration::hours(49));
        assert_eq!(config.week_policy, WeekPolicy::Calendar);
    }

    #[test]
    fn overrides_replace_only_what_is_given() {
        let config = AnalysisConfig::default().with_overrides(Some(8), None, Some(WeekPolicy::Rolling));
        assert_eq!(config.daily_threshold, Duration::hours(8));
        assert_eq!(config.weekly_threshold, Duration::hours(49));
        assert_eq!(config.week_policy, WeekPolicy::Rolling);
    }

    #[test]
    fn policy_strings_parse_case_insensitively() {
        assert_eq!(parse_policy(" Calendar ").unwrap(), WeekPolicy::Calendar);
        assert_eq!(parse_policy("ROLLING").unwrap(), WeekPolicy::Rolling);
        assert!(parse_policy("monthly").is_err());
    }
}
