//! Google Chat webhook sink — a one-line text message hourly, a card
//! at end of day.

use async_trait::async_trait;
use serde_json::json;

use prodpulse_core::error::Result;
use prodpulse_core::report::HourlyReport;

use crate::{ReportSink, post_json};

/// Google Chat webhook destination.
pub struct GoogleSink {
    url: String,
    client: reqwest::Client,
}

impl GoogleSink {
    pub fn new(url: String) -> Self {
        Self { url, client: reqwest::Client::new() }
    }
}

#[async_trait]
impl ReportSink for GoogleSink {
    fn name(&self) -> &str {
        "google"
    }

    async fn send(&self, report: &HourlyReport) -> Result<()> {
        let payload = match &report.summary {
            Some(_) => card_message(report),
            None => text_message(report),
        };
        post_json(&self.client, &self.url, &payload, "Google").await
    }
}

/// `*N prs*  |  *M cs*  _- 09:00 AM (+P prs)_`
pub fn text_message(report: &HourlyReport) -> serde_json::Value {
    let sample = &report.sample;
    json!({
        "text": format!(
            "*{} prs*  |  *{} cs*  _- {} (+{} prs)_",
            sample.achieved,
            sample.fg,
            sample.time_label(),
            sample.phour
        )
    })
}

/// End-of-day card with key/value widgets for achieved, last hour,
/// highest and average.
pub fn card_message(report: &HourlyReport) -> serde_json::Value {
    let sample = &report.sample;
    let mut widgets = vec![
        json!({
            "keyValue": {
                "topLabel": "Achieved",
                "content": format!("{} pairs | {} cs", sample.achieved, sample.fg),
            }
        }),
        json!({
            "keyValue": {
                "topLabel": "Last hour",
                "content": format!("{} pairs", sample.phour),
            }
        }),
        json!({
            "keyValue": {
                "topLabel": "Average",
                "content": format!("{} pairs/hour", report.average),
            }
        }),
    ];
    if let Some(summary) = &report.summary {
        widgets.insert(
            2,
            json!({
                "keyValue": {
                    "topLabel": "Highest",
                    "content": format!(
                        "{} pairs  [{}]",
                        summary.top.phour,
                        summary.top.hour_range()
                    ),
                }
            }),
        );
    }
    json!({
        "text": format!("{} pairs | {} cs", sample.achieved, sample.fg),
        "cards": [{
            "header": { "title": report.day_label() },
            "sections": [{ "widgets": widgets }],
        }]
    })
}
