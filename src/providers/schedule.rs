//! Daily schedule provider
//!
//! Lists sports events from a day-keyed schedule, one channel per event and
//! broadcasting channel. Listing only: resolution always reports no stream.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;
use std::time::Duration;

use super::{fetch_json, http_client, slugify, LiveProvider, ProviderError, DEFAULT_REQUEST_TIMEOUT};
use crate::models::{Category, Channel, ChannelMeta, ResolvedStream};

pub const PROVIDER_ID: &str = "schedule";
pub const DEFAULT_BASE_URL: &str = "https://dlhd.dad";
pub const DEFAULT_PRIORITY: i32 = 40;

/// Day heading → event group → events
type ScheduleResponse = BTreeMap<String, BTreeMap<String, Vec<ScheduleEvent>>>;

#[derive(Debug, Deserialize)]
struct ScheduleEvent {
    /// `HH:MM`, UTC
    #[serde(default)]
    time: String,
    event: String,
    #[serde(default)]
    channels: Vec<ScheduleChannel>,
}

#[derive(Debug, Deserialize)]
struct ScheduleChannel {
    channel_name: String,
    channel_id: String,
}

fn day_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{1,2})(?:st|nd|rd|th)?\s+([A-Za-z]+)\s+(\d{4})").expect("valid day regex")
    })
}

/// Parse a heading like `"Saturday 14th June 2025 - Schedule Time UK GMT"`
fn parse_day(heading: &str) -> Option<NaiveDate> {
    let caps = day_regex().captures(heading)?;
    let text = format!("{} {} {}", &caps[1], &caps[2], &caps[3]);
    NaiveDate::parse_from_str(&text, "%d %B %Y").ok()
}

/// Split `"England : Premier League : A vs B"` into league and title
fn split_event(event: &str) -> (Option<String>, String) {
    let parts: Vec<&str> = event.split(" : ").map(str::trim).collect();
    match parts.as_slice() {
        [] | [_] => (None, event.trim().to_string()),
        [.., league, title] => (Some(league.to_string()), title.to_string()),
    }
}

fn build_channels(schedule: ScheduleResponse) -> Vec<Channel> {
    let mut channels = Vec::new();
    let mut seen = HashSet::new();

    for (heading, groups) in schedule {
        let day = parse_day(&heading);

        for (group, events) in groups {
            for event in events {
                let (league, title) = split_event(&event.event);
                let starts_at: Option<DateTime<Utc>> = day
                    .zip(NaiveTime::parse_from_str(event.time.trim(), "%H:%M").ok())
                    .map(|(d, t)| d.and_time(t).and_utc());

                for broadcast in &event.channels {
                    // The same fixture can air on the same channel on several days
                    let id = match day {
                        Some(d) => format!(
                            "{}-{}-{}-{}",
                            PROVIDER_ID,
                            slugify(&broadcast.channel_id),
                            d.format("%Y-%m-%d"),
                            slugify(&title)
                        ),
                        None => format!(
                            "{}-{}-{}",
                            PROVIDER_ID,
                            slugify(&broadcast.channel_id),
                            slugify(&title)
                        ),
                    };
                    if !seen.insert(id.clone()) {
                        continue;
                    }

                    let name = format!("{} ({})", title, broadcast.channel_name.trim());
                    channels.push(
                        Channel::new(id, name, Category::Sports, PROVIDER_ID).with_meta(
                            ChannelMeta {
                                league: league.clone().or_else(|| Some(group.clone())),
                                starts_at,
                                sort_order: None,
                                badge: None,
                            },
                        ),
                    );
                }
            }
        }
    }

    // Headings are map keys, so order chronologically here
    channels.sort_by_key(|c| {
        let starts_at = c.meta.as_ref().and_then(|m| m.starts_at);
        (starts_at.is_none(), starts_at)
    });

    channels
        .into_iter()
        .enumerate()
        .map(|(i, mut c)| {
            if let Some(meta) = c.meta.as_mut() {
                meta.sort_order = Some(i as i64);
            }
            c
        })
        .collect()
}

/// Sports schedule provider
pub struct ScheduleProvider {
    base_url: String,
    client: reqwest::Client,
    priority: i32,
}

impl ScheduleProvider {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(DEFAULT_REQUEST_TIMEOUT),
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }
}

impl Default for ScheduleProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveProvider for ScheduleProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn name(&self) -> &str {
        "Sports Schedule"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn channels(&self) -> Result<Vec<Channel>, ProviderError> {
        let url = format!("{}/schedule.json", self.base_url);
        let schedule: ScheduleResponse = fetch_json(&self.client, &url).await?;
        Ok(build_channels(schedule))
    }

    async fn resolve_stream(
        &self,
        _channel_id: &str,
    ) -> Result<Option<ResolvedStream>, ProviderError> {
        Ok(None)
    }
}
