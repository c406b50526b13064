//! TvPass provider
//!
//! Flat directory of round-the-clock channels. Listing only.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

use super::{fetch_json, http_client, slugify, LiveProvider, ProviderError, DEFAULT_REQUEST_TIMEOUT};
use crate::models::{Category, Channel, ResolvedStream};

pub const PROVIDER_ID: &str = "tvpass";
pub const DEFAULT_BASE_URL: &str = "https://tvpass.org";
pub const DEFAULT_PRIORITY: i32 = 50;

#[derive(Debug, Deserialize)]
struct TvPassChannel {
    id: String,
    name: String,
    #[serde(default)]
    category: Option<String>,
}

pub struct TvPassProvider {
    base_url: String,
    client: reqwest::Client,
    priority: i32,
}

impl TvPassProvider {
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

impl Default for TvPassProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveProvider for TvPassProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn name(&self) -> &str {
        "TvPass"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn channels(&self) -> Result<Vec<Channel>, ProviderError> {
        let url = format!("{}/channels.json", self.base_url);
        let listing: Vec<TvPassChannel> = fetch_json(&self.client, &url).await?;

        let mut seen = HashSet::new();
        let mut channels = Vec::new();

        // Upstream ids differing only in case or punctuation share a slug
        for entry in listing {
            let slug = slugify(&entry.id);
            if slug.is_empty() || !seen.insert(slug.clone()) {
                continue;
            }
            let category = entry
                .category
                .as_deref()
                .map(Category::from_label)
                .unwrap_or(Category::General);
            channels.push(Channel::new(
                format!("{}-{}", PROVIDER_ID, slug),
                entry.name,
                category,
                PROVIDER_ID,
            ));
        }

        Ok(channels)
    }

    async fn resolve_stream(
        &self,
        _channel_id: &str,
    ) -> Result<Option<ResolvedStream>, ProviderError> {
        Ok(None)
    }
}
