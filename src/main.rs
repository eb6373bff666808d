// src/main.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod daily;
mod filters;
mod ingest;
mod normalize;
mod output;
mod punch;
mod weekly;


use clap::ValueEnum;
use config::AnalysisConfig;
use output::{CsvDirSink, JsonDirSink, TableSink};
use weekly::WeekPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

/// Analyses employee badge punch data: first-in/last-out per day, weekly
/// totals against minimum-hour thresholds, and missing-punch reporting.
///
/// The input CSV must contain the columns "employee id", "employee name",
/// "date" (YYYY-MM-DD), "time" (HH:MM or HH:MM:SS) and "reader in and out";
/// header matching is case-insensitive.
#[derive(Parser, Debug)]
#[command(name = "atwork-core", version)]
struct Cli {
    /// Path to the punch CSV.
    input: PathBuf,

    /// Directory the report CSVs are written into.
    #[arg(long, default_value = "reports")]
    out_dir: PathBuf,

    /// Daily minimum in whole hours (default 9).
    #[arg(long)]
    daily_hours: Option<i64>,

    /// Weekly minimum in whole hours (default 49).
    #[arg(long)]
    weekly_hours: Option<i64>,

    /// How daily totals group into weeks (default calendar).
    #[arg(long, value_enum)]
    week_policy: Option<WeekPolicy>,

    /// Report file format.
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let cli = Cli::parse();
    let config = AnalysisConfig::from_env()
        .context("loading configuration from environment failed")?
        .with_overrides(cli.daily_hours, cli.weekly_hours, cli.week_policy);
    info!(
        "analysis config: daily minimum {}h, weekly minimum {}h, {:?} weeks",
        config.daily_threshold.num_hours(),
        config.weekly_threshold.num_hours(),
        config.week_policy
    );

    let punches = ingest::read_punches_from_path(&cli.input)
        .with_context(|| format!("reading punch data from {} failed", cli.input.display()))?;

    let outcome = normalize::normalize_batch(&punches);
    if !outcome.rejected.is_empty() {
        warn!(
            "{} of {} rows dropped as malformed; the analysis continues without them",
            outcome.rejected.len(),
            punches.len()
        );
    }

    let days = daily::reduce_daily(&outcome.events);
    let weeks = weekly::aggregate_weekly(&days, config.week_policy);
    let short_days = filters::daily_under_threshold(&days, config.daily_threshold);
    let short_weeks = filters::weekly_under_threshold(&weeks, config.weekly_threshold);
    let missing = filters::missing_punch_report(&days);
    info!(
        "{} daily records ({} under {}h, {} with missing punches), {} weekly records ({} under {}h)",
        days.len(),
        short_days.len(),
        config.daily_threshold.num_hours(),
        missing.len(),
        weeks.len(),
        short_weeks.len(),
        config.weekly_threshold.num_hours()
    );

    let mut sink: Box<dyn TableSink> = match cli.format {
        OutputFormat::Csv => Box::new(CsvDirSink::new(cli.out_dir)),
        OutputFormat::Json => Box::new(JsonDirSink::new(cli.out_dir)),
    };
    sink.publish(&output::daily_time_analysis(&days))?;
    sink.publish(&output::daily_under_threshold_table(&short_days))?;
    sink.publish(&output::weekly_under_threshold_table(
        &short_weeks,
        config.week_policy,
    ))?;
    sink.publish(&output::missing_punch_table(&missing))?;

    Ok(())
}
