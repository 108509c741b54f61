//! Discord webhook sink — embed payloads for hourly and end-of-day
//! reports.

use async_trait::async_trait;
use chrono::Timelike;
use serde_json::json;

use prodpulse_core::error::Result;
use prodpulse_core::pick_color;
use prodpulse_core::report::HourlyReport;

use crate::{ReportSink, post_json};

const SUMMARY_THUMBNAIL: &str = "https://i.imgur.com/e22h9tf.png";

/// Discord webhook destination.
pub struct DiscordSink {
    url: String,
    client: reqwest::Client,
    /// A daily-only sink skips hourly reports entirely; it exists to
    /// keep the summary channel free of hourly noise.
    daily_only: bool,
}

impl DiscordSink {
    pub fn new(url: String) -> Self {
        Self { url, client: reqwest::Client::new(), daily_only: false }
    }

    /// Sink that only receives the end-of-day summary embed.
    pub fn daily(url: String) -> Self {
        Self { url, client: reqwest::Client::new(), daily_only: true }
    }
}

#[async_trait]
impl ReportSink for DiscordSink {
    fn name(&self) -> &str {
        if self.daily_only { "discord-daily" } else { "discord" }
    }

    async fn send(&self, report: &HourlyReport) -> Result<()> {
        if self.daily_only && report.summary.is_none() {
            return Ok(());
        }
        let embed = match &report.summary {
            Some(_) => summary_embed(report),
            None => hourly_embed(report),
        };
        post_json(&self.client, &self.url, &embed, "Discord").await
    }
}

/// Clock-face thumbnail for the given hour.
pub fn clock_image(hour: u32) -> &'static str {
    match hour {
        1 | 13 => "https://i.imgur.com/QXIxBcr.png",
        2 | 14 => "https://i.imgur.com/sO7GiQh.png",
        3 | 15 => "https://i.imgur.com/FmZrupJ.png",
        4 | 16 => "https://i.imgur.com/zNeOJSL.png",
        5 | 17 => "https://i.imgur.com/S4UPkPd.png",
        6 | 18 => "https://i.imgur.com/lC2E845.png",
        7 | 19 => "https://i.imgur.com/wcj8ESf.png",
        8 | 20 => "https://i.imgur.com/GVsFAgG.png",
        9 | 21 => "https://i.imgur.com/SPHh9BK.png",
        10 | 22 => "https://i.imgur.com/rQDK31v.png",
        11 | 23 => "https://i.imgur.com/e8WYgmU.png",
        0 | 12 => "https://i.imgur.com/oqb1oQz.png",
        _ => "https://i.imgur.com/lkwPtdD.jpg",
    }
}

fn color_for(report: &HourlyReport) -> u32 {
    pick_color(u64::from(report.sample.hour_end.hour())).code()
}

/// Regular hourly embed: achieved / last hour / average fields plus a
/// clock thumbnail for the hour.
pub fn hourly_embed(report: &HourlyReport) -> serde_json::Value {
    let sample = &report.sample;
    json!({
        "embeds": [{
            "color": color_for(report),
            "thumbnail": { "url": clock_image(sample.hour_end.hour()) },
            "fields": [
                {
                    "name": "Achieved",
                    "value": format!("**{}** pairs | **{}** cs", sample.achieved, sample.fg),
                },
                {
                    "name": "Last Hour",
                    "value": format!("**{}** pairs", sample.phour),
                    "inline": true,
                },
                {
                    "name": "Average",
                    "value": format!("**{}** pairs/hour", report.average),
                    "inline": true,
                },
            ],
            "timestamp": sample.hour_end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "footer": { "text": "ProdPulse" },
        }]
    })
}

/// End-of-day embed with the highest hour and the full detail block.
/// Falls back to the hourly embed if no summary is attached.
pub fn summary_embed(report: &HourlyReport) -> serde_json::Value {
    let Some(summary) = &report.summary else {
        return hourly_embed(report);
    };
    let sample = &report.sample;
    json!({
        "embeds": [{
            "color": color_for(report),
            "author": { "name": report.day_label() },
            "thumbnail": { "url": SUMMARY_THUMBNAIL },
            "fields": [
                {
                    "name": "Achieved",
                    "value": format!("**{}** pairs | **{}** cs", sample.achieved, sample.fg),
                },
                {
                    "name": "Highest",
                    "value": format!(
                        "**{}** pairs/hour  `[{}]`",
                        summary.top.phour,
                        summary.top.hour_range()
                    ),
                    "inline": true,
                },
                {
                    "name": "Average",
                    "value": format!("**{}** pairs/hour", report.average),
                    "inline": true,
                },
                {
                    "name": "Report",
                    "value": format!("```{}```", summary.detail),
                },
            ],
            "timestamp": sample.hour_end.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "footer": { "text": "ProdPulse" },
        }]
    })
}
