//! Notification decision and the report payload handed to sinks.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::config::ReportConfig;
use crate::production::ProductionSample;
use crate::rollover::{LogStore, RolloverLog};
use crate::summary::Summary;

/// What this run should send, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Below thresholds; log is still persisted, nothing is sent.
    Suppressed,
    /// Regular hourly report, no summary attached.
    Hourly,
    /// Day-end report with the summary attached.
    EndOfDay,
}

/// Threshold and boundary checks for the current run.
///
/// `achieved` must be strictly greater than the configured minimum;
/// exactly hitting it still suppresses.
pub fn decide(
    sample: &ProductionSample,
    log_len: usize,
    now: NaiveDateTime,
    config: &ReportConfig,
) -> ReportKind {
    if sample.achieved <= config.achieved_min || log_len == 0 {
        return ReportKind::Suppressed;
    }
    if now.hour() == config.day_start_hour && log_len > config.summary_min_hours {
        return ReportKind::EndOfDay;
    }
    if sample.phour > config.phour_min {
        return ReportKind::Hourly;
    }
    ReportKind::Suppressed
}

/// Fold the current sample into the log, persist it, then decide what
/// to send. The order is load-bearing: the log is saved before any
/// threshold check, so a quiet hour still leaves its mark on disk.
pub fn record_and_decide(
    store: &LogStore,
    mut log: RolloverLog,
    sample: &ProductionSample,
    now: NaiveDateTime,
    config: &ReportConfig,
) -> (RolloverLog, ReportKind) {
    log.record_hour(sample.clone());
    if let Err(e) = store.save(&log) {
        tracing::warn!("Failed to save production log: {e}");
    }
    let kind = decide(sample, log.len(), now, config);
    (log, kind)
}

/// Weekly maintenance window during which the Google Chat destination
/// stays quiet: Sunday after 08:15 through Monday 07:59.
pub fn in_maintenance_window(now: NaiveDateTime) -> bool {
    match now.weekday() {
        Weekday::Sun => now.time() > NaiveTime::from_hms_opt(8, 15, 0).unwrap_or_default(),
        Weekday::Mon => now.time() <= NaiveTime::from_hms_opt(7, 59, 0).unwrap_or_default(),
        _ => false,
    }
}

/// Everything a sink needs to format one report.
#[derive(Debug, Clone)]
pub struct HourlyReport {
    pub sample: ProductionSample,
    /// Integer average `phour` over the day so far.
    pub average: u32,
    /// Present only on the end-of-day report.
    pub summary: Option<Summary>,
    /// Calendar date the production day started on.
    pub day: NaiveDate,
}

impl HourlyReport {
    /// `"Saturday - Aug 29, 2026"`, used as the summary header.
    pub fn day_label(&self) -> String {
        self.day.format("%A - %b %d, %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn sample(achieved: u32, phour: u32) -> ProductionSample {
        let mut s = ProductionSample::new(dt(29, 14, 0));
        s.achieved = achieved;
        s.phour = phour;
        s
    }

    #[test]
    fn test_achieved_boundary_is_strict() {
        let config = ReportConfig::default();
        // Exactly 100 suppresses; 101 with a busy hour reports.
        assert_eq!(decide(&sample(100, 500), 3, dt(29, 14, 0), &config), ReportKind::Suppressed);
        assert_eq!(decide(&sample(101, 500), 3, dt(29, 14, 0), &config), ReportKind::Hourly);
    }

    #[test]
    fn test_low_achieved_suppresses() {
        let config = ReportConfig::default();
        assert_eq!(decide(&sample(50, 500), 3, dt(29, 14, 0), &config), ReportKind::Suppressed);
    }

    #[test]
    fn test_empty_log_suppresses() {
        let config = ReportConfig::default();
        assert_eq!(decide(&sample(5000, 500), 0, dt(29, 14, 0), &config), ReportKind::Suppressed);
    }

    #[test]
    fn test_quiet_hour_suppresses() {
        let config = ReportConfig::default();
        assert_eq!(decide(&sample(5000, 100), 3, dt(29, 14, 0), &config), ReportKind::Suppressed);
    }

    #[test]
    fn test_end_of_day_triggers_regardless_of_phour() {
        let config = ReportConfig::default();
        // 08:00 with six logged hours: summary branch even on a dead hour.
        assert_eq!(decide(&sample(10522, 3), 6, dt(29, 8, 0), &config), ReportKind::EndOfDay);
        // Five hours is not enough for a summary.
        assert_eq!(decide(&sample(10522, 3), 5, dt(29, 8, 0), &config), ReportKind::Suppressed);
    }

    #[test]
    fn test_quiet_sample_is_persisted_before_suppression() {
        let dir = std::env::temp_dir().join("prodpulse-record-decide-test");
        std::fs::create_dir_all(&dir).ok();
        let store = LogStore::new(&dir);
        let config = ReportConfig::default();

        // Below every threshold: nothing goes out, but the hour is on disk.
        let s = sample(50, 50);
        let (log, kind) =
            record_and_decide(&store, RolloverLog::default(), &s, dt(29, 14, 0), &config);
        assert_eq!(kind, ReportKind::Suppressed);
        assert_eq!(log.len(), 1);

        let reloaded = store.load();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.samples().next().unwrap().achieved, 50);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_maintenance_window() {
        // 2026-08-30 is a Sunday, 2026-08-31 a Monday.
        assert!(in_maintenance_window(dt(30, 8, 20)));
        assert!(!in_maintenance_window(dt(30, 8, 10)));
        assert!(in_maintenance_window(dt(31, 7, 59)));
        assert!(!in_maintenance_window(dt(31, 8, 0)));
        // Plain weekday.
        assert!(!in_maintenance_window(dt(29, 8, 20)));
    }
}
