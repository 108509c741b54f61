//! Production samples and the production-day window.

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// One hour's production counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionSample {
    /// End of the hour window this sample was taken at.
    pub hour_end: NaiveDateTime,
    /// Cumulative count since production-day start. Monotonically
    /// non-decreasing within a day.
    #[serde(default)]
    pub achieved: u32,
    /// Cumulative finished-goods count since production-day start.
    #[serde(default)]
    pub fg: u32,
    /// Count for the single preceding hour. Not monotonic.
    #[serde(default)]
    pub phour: u32,
}

impl ProductionSample {
    pub fn new(hour_end: NaiveDateTime) -> Self {
        Self { hour_end, achieved: 0, fg: 0, phour: 0 }
    }

    /// `"HH-HH"` range label, e.g. a 09:00 hour end gives `"08-09"`.
    pub fn hour_range(&self) -> String {
        let from = (self.hour_end - Duration::hours(1)).hour();
        format!("{from:02}-{:02}", self.hour_end.hour())
    }

    /// `"Aug 29, 2026  09:00 AM"`
    pub fn date_label(&self) -> String {
        self.hour_end.format("%b %d, %Y  %I:%M %p").to_string()
    }

    /// `"09:00 AM"`
    pub fn time_label(&self) -> String {
        self.hour_end.format("%I:%M %p").to_string()
    }
}

/// Production-day boundaries for `now`: [start, start + 24h).
///
/// The day starts at `start_hour` (default 8) but its first logged
/// hour is `start_hour + 1`, so a run strictly before that hour still
/// belongs to the previous calendar date's production day.
pub fn day_window(now: NaiveDateTime, start_hour: u32) -> (NaiveDateTime, NaiveDateTime) {
    let first_log = NaiveTime::from_hms_opt(start_hour + 1, 0, 0).unwrap_or_default();
    let day = if now.time() < first_log {
        now.date() - Duration::days(1)
    } else {
        now.date()
    };
    let start = day.and_time(NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap_or_default());
    (start, start + Duration::days(1))
}

/// The preceding clock-hour window for `now`: ends at `now` truncated
/// to the hour, starts one hour earlier.
pub fn hour_window(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let end = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);
    (end - Duration::hours(1), end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_day_window_after_first_log_hour() {
        let (start, end) = day_window(dt(2026, 8, 29, 14, 5), 8);
        assert_eq!(start, dt(2026, 8, 29, 8, 0));
        assert_eq!(end, dt(2026, 8, 30, 8, 0));
    }

    #[test]
    fn test_day_window_before_first_log_hour_is_previous_day() {
        // 08:30 is still part of the previous date's production day.
        let (start, end) = day_window(dt(2026, 8, 29, 8, 30), 8);
        assert_eq!(start, dt(2026, 8, 28, 8, 0));
        assert_eq!(end, dt(2026, 8, 29, 8, 0));
    }

    #[test]
    fn test_day_window_at_first_log_hour() {
        let (start, _) = day_window(dt(2026, 8, 29, 9, 0), 8);
        assert_eq!(start, dt(2026, 8, 29, 8, 0));
    }

    #[test]
    fn test_hour_window_truncates() {
        let (start, end) = hour_window(dt(2026, 8, 29, 10, 42));
        assert_eq!(start, dt(2026, 8, 29, 9, 0));
        assert_eq!(end, dt(2026, 8, 29, 10, 0));
    }

    #[test]
    fn test_hour_range_label() {
        let sample = ProductionSample::new(dt(2026, 8, 29, 9, 0));
        assert_eq!(sample.hour_range(), "08-09");

        // Wraps through midnight.
        let sample = ProductionSample::new(dt(2026, 8, 30, 0, 0));
        assert_eq!(sample.hour_range(), "23-00");
    }
}
