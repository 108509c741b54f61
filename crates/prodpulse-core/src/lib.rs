//! # ProdPulse Core
//! Shared types for the hourly production reporter: configuration,
//! production samples, the per-day rollover log, aggregation and the
//! notification decision.

pub mod color;
pub mod config;
pub mod error;
pub mod production;
pub mod report;
pub mod rollover;
pub mod summary;

pub use color::{Color, pick_color};
pub use config::PulseConfig;
pub use error::{PulseError, Result};
pub use production::{ProductionSample, day_window, hour_window};
pub use report::{HourlyReport, ReportKind, decide, in_maintenance_window, record_and_decide};
pub use rollover::{LogStore, RolloverLog};
pub use summary::{Summary, average_phour, build_summary};
