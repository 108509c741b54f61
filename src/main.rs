//! # ProdPulse — hourly production reporter
//!
//! Run-once batch: count scan rows for the past hour and the
//! production day so far, fold them into the on-disk rollover log,
//! and post reports to the configured chat destinations. Intended to
//! be run from an external scheduler once per hour.
//!
//! Usage:
//!   prodpulse                          # Run with ~/.prodpulse/config.toml
//!   prodpulse --config ./pulse.toml    # Custom config
//!   prodpulse --now 2026-08-29T14:00:00  # Pretend it is another time
//!
//! Every failure class is logged and survived; the process exits 0
//! regardless, silence being the failure mode the chat rooms see.

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use prodpulse_channels::{DiscordSink, GoogleSink, ReportSink, SlackApp, SlackSink, dispatch_all};
use prodpulse_core::report::{HourlyReport, ReportKind};
use prodpulse_core::rollover::LogStore;
use prodpulse_core::{PulseConfig, ProductionSample, day_window, hour_window};
use prodpulse_db::ScanDb;

#[derive(Parser)]
#[command(name = "prodpulse", version, about = "Hourly production reporter")]
struct Cli {
    /// Config file path (default: ~/.prodpulse/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Data directory for the rollover log and pulse.log
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the current time, e.g. 2026-08-29T14:00:00
    #[arg(long)]
    now: Option<String>,

    /// Log to stderr instead of pulse.log
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(PulseConfig::home_dir);
    init_tracing(&data_dir, cli.verbose);

    // Nothing propagates to the OS: a reporting cron job that crashes
    // loudly helps nobody, the log file is the error surface.
    if let Err(e) = run(&cli, &data_dir).await {
        tracing::error!("Run failed: {e}");
    }
}

fn init_tracing(data_dir: &Path, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if verbose {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return;
    }
    std::fs::create_dir_all(data_dir).ok();
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("pulse.log"))
    {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init(),
        Err(_) => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn run(cli: &Cli, data_dir: &Path) -> Result<()> {
    let config = match &cli.config {
        Some(path) => PulseConfig::load_from(path),
        None => PulseConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            return Ok(());
        }
    };
    if !config.any_sink_configured() {
        tracing::error!("No valid webhook configurations found, nothing to report to");
        return Ok(());
    }

    let now = match &cli.now {
        Some(raw) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")?,
        None => Local::now().naive_local(),
    };

    let db = match ScanDb::open(Path::new(&config.database.path)) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("{e}");
            return Ok(());
        }
    };

    let start_hour = config.report.day_start_hour;
    let (day_start, _day_end) = day_window(now, start_hour);
    let (hour_start, hour_end) = hour_window(now);

    let store = LogStore::new(data_dir);
    let log = store.load().reset_if_new_day(now, start_hour);

    // Three range counts; any failure aborts the notification phase
    // for this run and leaves last hour's log untouched.
    let mut sample = ProductionSample::new(hour_end);
    let counts = (|| {
        sample.phour = db.count_production(hour_start, hour_end)?;
        sample.achieved = db.count_production(day_start, hour_end)?;
        sample.fg = db.count_storage(day_start, hour_end)?;
        prodpulse_core::Result::Ok(())
    })();
    if let Err(e) = counts {
        tracing::error!("Query execution failed: {e}");
        return Ok(());
    }

    let (log, kind) = prodpulse_core::record_and_decide(&store, log, &sample, now, &config.report);
    if kind == ReportKind::Suppressed {
        tracing::info!(
            "Suppressed: achieved={} phour={} hours={}",
            sample.achieved,
            sample.phour,
            log.len()
        );
        return Ok(());
    }

    let report = HourlyReport {
        average: prodpulse_core::average_phour(&log),
        summary: match kind {
            ReportKind::EndOfDay => prodpulse_core::build_summary(&log),
            _ => None,
        },
        sample,
        day: day_start.date(),
    };

    let mut sinks: Vec<Box<dyn ReportSink>> = Vec::new();
    if let Some(url) = config.webhooks.discord_url() {
        sinks.push(Box::new(DiscordSink::new(url)));
    }
    if let Some(url) = config.webhooks.discord_daily_url() {
        sinks.push(Box::new(DiscordSink::daily(url)));
    }
    if let Some(url) = config.webhooks.slack_url() {
        sinks.push(Box::new(SlackSink::new(url)));
    }
    if let Some(url) = config.webhooks.google_url() {
        if prodpulse_core::in_maintenance_window(now) {
            tracing::info!("Google destination skipped for the maintenance window");
        } else {
            sinks.push(Box::new(GoogleSink::new(url)));
        }
    }
    if config.slack_app.is_enabled() {
        sinks.push(Box::new(SlackApp::new(
            config.slack_app.token.clone(),
            config.slack_app.channel_id.clone(),
        )));
    }

    dispatch_all(&sinks, &report).await;
    Ok(())
}
