//! PPV provider
//!
//! Lists pay-per-view and 24/7 events grouped by category. Resolution is not
//! available for this source yet; `resolve_stream` always reports no stream.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use super::{fetch_json, http_client, LiveProvider, ProviderError, DEFAULT_REQUEST_TIMEOUT};
use crate::models::{Category, Channel, ChannelMeta, ResolvedStream};

pub const PROVIDER_ID: &str = "ppv";
pub const DEFAULT_BASE_URL: &str = "https://ppv.to";
pub const DEFAULT_PRIORITY: i32 = 30;

#[derive(Debug, Deserialize)]
struct PpvResponse {
    #[serde(default = "default_true")]
    success: bool,
    #[serde(default)]
    streams: Vec<PpvCategory>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct PpvCategory {
    #[serde(default)]
    category: String,
    #[serde(default)]
    streams: Vec<PpvEvent>,
}

#[derive(Debug, Deserialize)]
struct PpvEvent {
    id: u64,
    name: String,
    #[serde(default)]
    tag: Option<String>,
    /// Seconds since the epoch
    #[serde(default)]
    starts_at: Option<i64>,
    #[serde(default)]
    always_live: u8,
    #[serde(default)]
    category_name: Option<String>,
}

impl PpvEvent {
    fn into_channel(self, group: &str) -> Channel {
        let label = self.category_name.as_deref().unwrap_or(group);
        let category = Category::from_label(label);
        let always_live = self.always_live != 0;

        let starts_at = if always_live {
            None
        } else {
            self.starts_at
                .filter(|&t| t > 0)
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0))
        };

        Channel::new(
            format!("{}-{}", PROVIDER_ID, self.id),
            self.name,
            category,
            PROVIDER_ID,
        )
        .with_meta(ChannelMeta {
            league: self.tag.filter(|t| !t.is_empty()),
            starts_at,
            sort_order: None,
            badge: always_live.then(|| "24/7".to_string()),
        })
    }
}

/// PPV event listing provider
pub struct PpvProvider {
    base_url: String,
    client: reqwest::Client,
    priority: i32,
}

impl PpvProvider {
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

impl Default for PpvProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveProvider for PpvProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn name(&self) -> &str {
        "PPV"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn channels(&self) -> Result<Vec<Channel>, ProviderError> {
        let url = format!("{}/api/streams", self.base_url);
        let response: PpvResponse = fetch_json(&self.client, &url).await?;

        if !response.success {
            return Err(ProviderError::InvalidResponse(
                "listing reported success=false".to_string(),
            ));
        }

        // An event filed under several categories is listed under the first
        let mut seen = HashSet::new();
        Ok(response
            .streams
            .into_iter()
            .flat_map(|group| {
                let label = group.category;
                group
                    .streams
                    .into_iter()
                    .map(move |event| event.into_channel(&label))
            })
            .filter(|channel| seen.insert(channel.id.clone()))
            .collect())
    }

    async fn resolve_stream(
        &self,
        _channel_id: &str,
    ) -> Result<Option<ResolvedStream>, ProviderError> {
        Ok(None)
    }
}
