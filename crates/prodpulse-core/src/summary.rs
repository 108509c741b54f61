//! Aggregation over the rollover log for summary reporting.

use std::fmt::Write as _;

use crate::production::ProductionSample;
use crate::rollover::RolloverLog;

/// End-of-day summary: the best hour plus a per-hour detail block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Sample with the highest `phour`; ties go to the earliest hour.
    pub top: ProductionSample,
    /// One line per logged hour:
    /// `"<from>-<to>  :  <achieved><pad to 8 cols>+<phour>"`.
    pub detail: String,
}

/// Integer-truncated mean of `phour` across the log.
///
/// Panics (integer divide by zero) on an empty log; callers only
/// aggregate once at least one hour is recorded.
pub fn average_phour(log: &RolloverLog) -> u32 {
    let total: u64 = log.samples().map(|s| u64::from(s.phour)).sum();
    (total / log.len() as u64) as u32
}

/// Build the end-of-day summary. `None` on an empty log.
pub fn build_summary(log: &RolloverLog) -> Option<Summary> {
    let mut top: Option<&ProductionSample> = None;
    let mut detail = String::new();
    for sample in log.samples() {
        if top.is_none_or(|t| sample.phour > t.phour) {
            top = Some(sample);
        }
        let achieved = sample.achieved.to_string();
        let pad = 8usize.saturating_sub(achieved.len());
        let _ = writeln!(
            detail,
            "{}  :  {achieved}{}+{}",
            sample.hour_range(),
            " ".repeat(pad),
            sample.phour
        );
    }
    top.map(|top| Summary { top: top.clone(), detail })
}
