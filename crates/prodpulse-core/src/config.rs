//! ProdPulse configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PulseError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PulseConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub webhooks: WebhookConfig,
    #[serde(default)]
    pub slack_app: SlackAppConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl PulseConfig {
    /// Load config from the default path (~/.prodpulse/config.toml).
    /// A missing file is a hard error: without a database and webhooks
    /// there is nothing for a run to do.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PulseError::Config(format!(
                "Configuration file missing: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| PulseError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| PulseError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the day-window arithmetic cannot represent: the
    /// first logged hour is `day_start_hour + 1`, which must still be
    /// a valid hour of the same day.
    fn validate(&self) -> Result<()> {
        if self.report.day_start_hour > 22 {
            return Err(PulseError::Config(format!(
                "day_start_hour must be in 0..=22, got {}",
                self.report.day_start_hour
            )));
        }
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the ProdPulse home directory (~/.prodpulse).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".prodpulse")
    }

    /// True when at least one delivery destination is usable.
    pub fn any_sink_configured(&self) -> bool {
        self.webhooks.discord_url().is_some()
            || self.webhooks.discord_daily_url().is_some()
            || self.webhooks.slack_url().is_some()
            || self.webhooks.google_url().is_some()
            || self.slack_app.is_enabled()
    }
}

/// Scan database location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "scans.db".into()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: default_db_path() }
    }
}

/// Webhook URLs, one optional entry per provider.
///
/// A URL that does not match the provider's endpoint prefix is treated
/// as absent rather than rejected: a misconfigured destination must
/// never take the whole run down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub discord: Option<String>,
    /// Separate Discord destination for the end-of-day summary.
    #[serde(default)]
    pub discord_daily: Option<String>,
    #[serde(default)]
    pub slack: Option<String>,
    #[serde(default)]
    pub google: Option<String>,
}

pub const DISCORD_PREFIX: &str = "https://discord";
pub const SLACK_PREFIX: &str = "https://hooks.slack.com/services/";
pub const GOOGLE_PREFIX: &str = "https://chat.googleapis.com";

fn validated(url: &Option<String>, prefix: &str) -> Option<String> {
    url.as_deref()
        .filter(|u| u.starts_with(prefix))
        .map(String::from)
}

impl WebhookConfig {
    pub fn discord_url(&self) -> Option<String> {
        validated(&self.discord, DISCORD_PREFIX)
    }

    pub fn discord_daily_url(&self) -> Option<String> {
        validated(&self.discord_daily, DISCORD_PREFIX)
    }

    pub fn slack_url(&self) -> Option<String> {
        validated(&self.slack, SLACK_PREFIX)
    }

    pub fn google_url(&self) -> Option<String> {
        validated(&self.google, GOOGLE_PREFIX)
    }
}

/// Slack bot API credentials (chat.postMessage + threaded summary).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlackAppConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub channel_id: String,
}

impl SlackAppConfig {
    /// Bot tokens always start with `xoxb`; anything else is ignored.
    pub fn is_enabled(&self) -> bool {
        self.token.starts_with("xoxb") && !self.channel_id.is_empty()
    }
}

/// Report thresholds and the production-day boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Hour the production day starts at (day runs [start, start+24h)).
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,
    /// Minimum cumulative count before anything is sent at all.
    #[serde(default = "default_achieved_min")]
    pub achieved_min: u32,
    /// Minimum single-hour count for an hourly report.
    #[serde(default = "default_phour_min")]
    pub phour_min: u32,
    /// Minimum logged hours before an end-of-day summary is worth sending.
    #[serde(default = "default_summary_min_hours")]
    pub summary_min_hours: usize,
}

fn default_day_start_hour() -> u32 {
    8
}
fn default_achieved_min() -> u32 {
    100
}
fn default_phour_min() -> u32 {
    100
}
fn default_summary_min_hours() -> usize {
    5
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            day_start_hour: default_day_start_hour(),
            achieved_min: default_achieved_min(),
            phour_min: default_phour_min(),
            summary_min_hours: default_summary_min_hours(),
        }
    }
}
