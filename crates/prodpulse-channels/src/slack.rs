//! Slack delivery — incoming webhook with Block Kit payloads, and the
//! bot API client that threads the day summary under its own message.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use prodpulse_core::error::{PulseError, Result};
use prodpulse_core::report::HourlyReport;

use crate::{ReportSink, post_json};

/// Slack incoming-webhook destination.
pub struct SlackSink {
    url: String,
    client: reqwest::Client,
}

impl SlackSink {
    pub fn new(url: String) -> Self {
        Self { url, client: reqwest::Client::new() }
    }
}

#[async_trait]
impl ReportSink for SlackSink {
    fn name(&self) -> &str {
        "slack"
    }

    async fn send(&self, report: &HourlyReport) -> Result<()> {
        let payload = json!({
            "text": fallback_text(report),
            "blocks": blocks(report),
        });
        post_json(&self.client, &self.url, &payload, "Slack").await
    }
}

fn fallback_text(report: &HourlyReport) -> String {
    format!("{} pairs | {} cs", report.sample.achieved, report.sample.fg)
}

/// Block Kit body. The hourly shape is achieved / last hour / average;
/// a summary adds the day header, the top hour and the detail block.
pub fn blocks(report: &HourlyReport) -> serde_json::Value {
    let sample = &report.sample;
    let mut blocks = vec![
        json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("Achieved\n*{}* _pairs_ | *{}* _cs_", sample.achieved, sample.fg),
            }
        }),
        json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("Last Hour\n*{}* _pairs_", sample.phour),
            }
        }),
        json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("Average\n*{}* _pairs/hour_", report.average),
            }
        }),
        json!({ "type": "divider" }),
    ];

    if let Some(summary) = &report.summary {
        blocks.insert(
            0,
            json!({
                "type": "header",
                "text": { "type": "plain_text", "text": report.day_label() }
            }),
        );
        blocks.insert(
            3,
            json!({
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!(
                        "Highest\n*{}* _pairs/hour_ `[{}]`",
                        summary.top.phour,
                        summary.top.hour_range()
                    ),
                }
            }),
        );
        let last = blocks.len() - 1;
        blocks.insert(
            last,
            json!({
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!("Summary\n```{}```", summary.detail),
                }
            }),
        );
    }
    serde_json::Value::Array(blocks)
}

#[derive(Debug, Deserialize)]
struct SlackApiResponse {
    ok: bool,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Authenticated Slack bot client (`chat.postMessage`).
pub struct SlackApp {
    token: String,
    channel_id: String,
    client: reqwest::Client,
}

impl SlackApp {
    pub fn new(token: String, channel_id: String) -> Self {
        Self { token, channel_id, client: reqwest::Client::new() }
    }

    /// Post one message; returns the message `ts` for threading.
    async fn post_message(&self, body: &serde_json::Value) -> Result<Option<String>> {
        let resp = self
            .client
            .post("https://slack.com/api/chat.postMessage")
            .bearer_auth(&self.token)
            .json(body)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| PulseError::Channel(format!("Slack API send failed: {e}")))?;

        let body: SlackApiResponse = resp
            .json()
            .await
            .map_err(|e| PulseError::Channel(format!("Invalid Slack API response: {e}")))?;
        if !body.ok {
            return Err(PulseError::Channel(format!(
                "Slack API error: {}",
                body.error.unwrap_or_default()
            )));
        }
        Ok(body.ts)
    }
}

#[async_trait]
impl ReportSink for SlackApp {
    fn name(&self) -> &str {
        "slack-app"
    }

    /// Posts the report to the channel; when a summary is attached,
    /// the detail goes out as a threaded follow-up under it.
    async fn send(&self, report: &HourlyReport) -> Result<()> {
        let ts = self
            .post_message(&json!({
                "channel": self.channel_id,
                "text": fallback_text(report),
                "blocks": blocks(report),
            }))
            .await?;

        if let (Some(summary), Some(thread_ts)) = (&report.summary, ts) {
            self.post_message(&json!({
                "channel": self.channel_id,
                "text": format!("```{}```", summary.detail),
                "thread_ts": thread_ts,
            }))
            .await?;
        }
        Ok(())
    }
}
