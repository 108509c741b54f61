//! # ProdPulse Channels
//! Report delivery. Each destination implements [`ReportSink`];
//! dispatch is sequential and fire-and-forget — a failed sink is
//! logged and never blocks the others.

pub mod discord;
pub mod google;
pub mod slack;

pub use discord::DiscordSink;
pub use google::GoogleSink;
pub use slack::{SlackApp, SlackSink};

use async_trait::async_trait;
use std::time::Duration;

use prodpulse_core::error::{PulseError, Result};
use prodpulse_core::report::HourlyReport;

/// A destination that can deliver one formatted report.
#[async_trait]
pub trait ReportSink: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, report: &HourlyReport) -> Result<()>;
}

/// Deliver the report to every sink in turn.
pub async fn dispatch_all(sinks: &[Box<dyn ReportSink>], report: &HourlyReport) {
    for sink in sinks {
        match sink.send(report).await {
            Ok(()) => tracing::info!("{} report sent", sink.name()),
            Err(e) => tracing::warn!("{} delivery failed: {e}", sink.name()),
        }
    }
}

/// POST a JSON payload to a webhook URL. 400+ responses are errors.
pub(crate) async fn post_json(
    client: &reqwest::Client,
    url: &str,
    body: &serde_json::Value,
    channel: &str,
) -> Result<()> {
    let resp = client
        .post(url)
        .json(body)
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .map_err(|e| PulseError::Channel(format!("{channel} send failed: {e}")))?;

    let status = resp.status();
    if status.as_u16() >= 400 {
        let body = resp.text().await.unwrap_or_default();
        return Err(PulseError::Channel(format!(
            "{channel} request failed: #{status} {body}"
        )));
    }
    Ok(())
}
