//! The rollover log: one production day's hourly samples, persisted
//! between runs as JSON and reset at the day boundary.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{PulseError, Result};
use crate::production::ProductionSample;

/// Hour-end timestamp → sample for the active production day.
///
/// Keys ascend chronologically, so map order matches the order the
/// hours were recorded in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolloverLog {
    entries: BTreeMap<NaiveDateTime, ProductionSample>,
}

impl RolloverLog {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Samples in hour order.
    pub fn samples(&self) -> impl Iterator<Item = &ProductionSample> {
        self.entries.values()
    }

    /// Earliest hour-end timestamp in the log.
    pub fn earliest(&self) -> Option<NaiveDateTime> {
        self.entries.keys().next().copied()
    }

    /// Insert or overwrite the entry for the sample's hour.
    pub fn record_hour(&mut self, sample: ProductionSample) {
        self.entries.insert(sample.hour_end, sample);
    }

    /// Decide whether this log still belongs to the current production
    /// day; if not, start over empty.
    ///
    /// This is a heuristic window-membership check, not a strict state
    /// machine: around the boundary the result may keep one stale hour
    /// or drop one, and callers tolerate that.
    pub fn reset_if_new_day(self, now: NaiveDateTime, start_hour: u32) -> RolloverLog {
        // The first logged hour of a new day (start + 1; a run during
        // the start hour itself still closes the previous day, so the
        // log must survive it for the end-of-day summary).
        if now.hour() == start_hour + 1 {
            return RolloverLog::default();
        }
        let Some(earliest) = self.earliest() else {
            return self;
        };
        if earliest.date() != now.date() {
            // Log started on another date: stale once we are past the
            // start hour, or once it is more than a day old.
            if now.hour() > start_hour || earliest.date() < now.date() - Duration::days(1) {
                return RolloverLog::default();
            }
        } else if earliest.hour() <= start_hour && now.hour() > start_hour {
            // Same date but the log spans a rollover it shouldn't.
            return RolloverLog::default();
        }
        self
    }
}

/// JSON-file persistence for the rollover log.
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    /// Create a store under the given data directory.
    pub fn new(data_dir: &Path) -> Self {
        std::fs::create_dir_all(data_dir).ok();
        Self { path: data_dir.join("production_log.json") }
    }

    /// Load the persisted log. A missing or corrupt file degrades to
    /// an empty log; this never fails.
    pub fn load(&self) -> RolloverLog {
        if !self.path.exists() {
            return RolloverLog::default();
        }
        match std::fs::read_to_string(&self.path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {}: {e}", self.path.display());
                RolloverLog::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", self.path.display());
                RolloverLog::default()
            }
        }
    }

    /// Save the log. The caller logs failure and carries on; a missed
    /// save costs at most one hour of history.
    pub fn save(&self, log: &RolloverLog) -> Result<()> {
        let json = serde_json::to_string_pretty(log)
            .map_err(|e| PulseError::Storage(format!("Serialize log: {e}")))?;
        std::fs::write(&self.path, &json)
            .map_err(|e| PulseError::Storage(format!("Write {}: {e}", self.path.display())))?;
        tracing::debug!("Saved {} hours to {}", log.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample(d: u32, h: u32, phour: u32) -> ProductionSample {
        let mut s = ProductionSample::new(dt(d, h));
        s.phour = phour;
        s.achieved = phour;
        s
    }

    fn log_with(hours: &[(u32, u32)]) -> RolloverLog {
        let mut log = RolloverLog::default();
        for &(d, h) in hours {
            log.record_hour(sample(d, h, 100));
        }
        log
    }

    #[test]
    fn test_record_overwrites_same_hour() {
        let mut log = RolloverLog::default();
        log.record_hour(sample(29, 9, 100));
        log.record_hour(sample(29, 9, 250));
        assert_eq!(log.len(), 1);
        assert_eq!(log.samples().next().unwrap().phour, 250);
    }

    #[test]
    fn test_reset_at_first_log_hour_always_empties() {
        let log = log_with(&[(28, 9), (28, 10), (28, 11)]);
        let log = log.reset_if_new_day(dt(29, 9).with_minute(5).unwrap(), 8);
        assert!(log.is_empty());
    }

    #[test]
    fn test_day_end_run_keeps_log_for_summary() {
        // 08:00 closes yesterday's production day; the log must stay
        // intact so the end-of-day summary can be built from it.
        let log = log_with(&[(28, 9), (28, 10), (28, 11), (28, 12), (28, 13), (28, 14)]);
        let kept = log.clone().reset_if_new_day(dt(29, 8), 8);
        assert_eq!(kept, log);
    }

    #[test]
    fn test_empty_log_stays_empty() {
        let log = RolloverLog::default();
        assert!(log.reset_if_new_day(dt(29, 14), 8).is_empty());
    }

    #[test]
    fn test_previous_date_reset_after_start_hour() {
        // Yesterday's log, now 10:00: new day.
        let log = log_with(&[(28, 9), (28, 10)]);
        assert!(log.reset_if_new_day(dt(29, 10), 8).is_empty());
    }

    #[test]
    fn test_previous_date_kept_before_start_hour() {
        // Yesterday evening's log at 02:00: same production day.
        let log = log_with(&[(28, 21), (28, 22)]);
        let kept = log.clone().reset_if_new_day(dt(29, 2), 8);
        assert_eq!(kept, log);
    }

    #[test]
    fn test_stale_log_reset_even_before_start_hour() {
        // Two days old: always stale.
        let log = log_with(&[(26, 21), (26, 22)]);
        assert!(log.reset_if_new_day(dt(29, 2), 8).is_empty());
    }

    #[test]
    fn test_same_date_spanning_rollover_reset() {
        // Log starts at 02:00 today (previous production day) and it
        // is now 10:00: the log spans a rollover.
        let log = log_with(&[(29, 2), (29, 3)]);
        assert!(log.reset_if_new_day(dt(29, 10), 8).is_empty());
    }

    #[test]
    fn test_same_date_kept_within_day() {
        let log = log_with(&[(29, 9), (29, 10)]);
        let kept = log.clone().reset_if_new_day(dt(29, 14), 8);
        assert_eq!(kept, log);
    }

    #[test]
    fn test_store_round_trip() {
        let dir = std::env::temp_dir().join("prodpulse-logstore-test");
        std::fs::create_dir_all(&dir).ok();
        let store = LogStore::new(&dir);

        let mut log = RolloverLog::default();
        for h in 9..=14 {
            let mut s = sample(29, h, 1000 + h);
            s.fg = 40 + h;
            s.achieved = 1000 * (h - 8);
            log.record_hour(s);
        }
        store.save(&log).unwrap();
        assert_eq!(store.load(), log);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_and_corrupt_files() {
        let dir = std::env::temp_dir().join("prodpulse-logstore-test2");
        std::fs::create_dir_all(&dir).ok();
        let store = LogStore::new(&dir);
        assert!(store.load().is_empty());

        std::fs::write(dir.join("production_log.json"), "{not json").unwrap();
        assert!(store.load().is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }
}
