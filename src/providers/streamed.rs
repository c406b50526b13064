//! Streamed provider
//!
//! Lists live sports matches from the Streamed match API. Every match carries
//! one or more upstream sources; each source is a mirror during resolution
//! and yields embed URLs for the match.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{
    fetch_json, fetch_json_optional, http_client, strip_channel_prefix, LiveProvider,
    ProviderError, DEFAULT_REQUEST_TIMEOUT,
};
use crate::mirror::{cancellable, resolve_with_mirrors, DEFAULT_MIRROR_TIMEOUT};
use crate::models::{Category, Channel, ChannelMeta, MirrorCandidate, ResolvedStream};

pub const PROVIDER_ID: &str = "streamed";
pub const DEFAULT_BASE_URL: &str = "https://streamed.pk";
pub const DEFAULT_PRIORITY: i32 = 10;

/// Match entry from `/api/matches/live`
#[derive(Debug, Deserialize)]
struct StreamedMatch {
    id: String,
    title: String,
    #[serde(default)]
    category: String,
    /// Kickoff in milliseconds since the epoch
    #[serde(default)]
    date: Option<i64>,
    #[serde(default)]
    popular: bool,
    #[serde(default)]
    sources: Vec<StreamedSource>,
}

#[derive(Debug, Clone, Deserialize)]
struct StreamedSource {
    source: String,
    id: String,
}

/// Stream entry from `/api/stream/{source}/{id}`
#[derive(Debug, Deserialize)]
struct StreamedEmbed {
    #[serde(rename = "embedUrl", default)]
    embed_url: String,
    #[serde(default)]
    hd: bool,
    #[serde(rename = "streamNo", default)]
    stream_no: u32,
}

impl StreamedMatch {
    /// Convert API response to our Channel model
    fn into_channel(self, position: usize, now: DateTime<Utc>) -> Channel {
        let starts_at = self.date.and_then(DateTime::<Utc>::from_timestamp_millis);
        let badge = if self.popular {
            Some("POPULAR".to_string())
        } else if starts_at.map(|t| t <= now).unwrap_or(false) {
            Some("LIVE".to_string())
        } else {
            None
        };
        let league = (!self.category.is_empty()).then(|| self.category.clone());

        Channel::new(
            format!("{}-{}", PROVIDER_ID, self.id),
            self.title,
            Category::Sports,
            PROVIDER_ID,
        )
        .with_meta(ChannelMeta {
            league,
            starts_at,
            sort_order: Some(position as i64),
            badge,
        })
    }
}

/// Pick the best embed: HD first, then lowest stream number
fn best_embed(mut embeds: Vec<StreamedEmbed>) -> Option<ResolvedStream> {
    embeds.retain(|e| !e.embed_url.is_empty());
    embeds.sort_by(|a, b| b.hd.cmp(&a.hd).then(a.stream_no.cmp(&b.stream_no)));
    embeds
        .into_iter()
        .next()
        .map(|e| ResolvedStream::from_url(e.embed_url))
}

/// Streamed match API provider
pub struct StreamedProvider {
    base_url: String,
    client: reqwest::Client,
    priority: i32,
    mirror_timeout: Duration,
}

impl StreamedProvider {
    /// Create a provider with default settings
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a provider with a custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(DEFAULT_REQUEST_TIMEOUT),
            priority: DEFAULT_PRIORITY,
            mirror_timeout: DEFAULT_MIRROR_TIMEOUT,
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

    pub fn with_mirror_timeout(mut self, timeout: Duration) -> Self {
        self.mirror_timeout = timeout;
        self
    }

    async fn live_matches(&self) -> Result<Vec<StreamedMatch>, ProviderError> {
        let url = format!("{}/api/matches/live", self.base_url);
        fetch_json(&self.client, &url).await
    }

    /// Fetch embeds for one `source/id` mirror
    async fn fetch_embeds(
        client: reqwest::Client,
        base_url: String,
        mirror: MirrorCandidate,
        token: CancellationToken,
    ) -> Result<Option<ResolvedStream>, ProviderError> {
        let Some((source, id)) = mirror.id.split_once('/') else {
            return Ok(None);
        };
        let url = format!(
            "{}/api/stream/{}/{}",
            base_url,
            urlencoding::encode(source),
            urlencoding::encode(id)
        );

        let embeds: Option<Vec<StreamedEmbed>> =
            cancellable(&token, fetch_json_optional(&client, &url)).await?;
        Ok(embeds.and_then(best_embed))
    }
}

impl Default for StreamedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveProvider for StreamedProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn name(&self) -> &str {
        "Streamed"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn channels(&self) -> Result<Vec<Channel>, ProviderError> {
        let now = Utc::now();
        let matches = self.live_matches().await?;

        // Repeated match ids keep their first occurrence
        let mut seen = HashSet::new();
        Ok(matches
            .into_iter()
            .filter(|m| seen.insert(m.id.clone()))
            .enumerate()
            .map(|(i, m)| m.into_channel(i, now))
            .collect())
    }

    async fn resolve_stream(
        &self,
        channel_id: &str,
    ) -> Result<Option<ResolvedStream>, ProviderError> {
        let Some(match_id) = strip_channel_prefix(channel_id, PROVIDER_ID) else {
            return Ok(None);
        };

        let matches = self.live_matches().await?;
        let Some(found) = matches.into_iter().find(|m| m.id == match_id) else {
            return Ok(None);
        };

        let mirrors: Vec<MirrorCandidate> = found
            .sources
            .iter()
            .enumerate()
            .map(|(i, s)| {
                MirrorCandidate::new(format!("{}/{}", s.source, s.id), s.source.clone(), i as i32)
            })
            .collect();

        Ok(resolve_with_mirrors(mirrors, self.mirror_timeout, |mirror, token| {
            Self::fetch_embeds(self.client.clone(), self.base_url.clone(), mirror, token)
        })
        .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StreamType;

    fn embed(url: &str, hd: bool, stream_no: u32) -> StreamedEmbed {
        StreamedEmbed {
            embed_url: url.to_string(),
            hd,
            stream_no,
        }
    }

    #[test]
    fn test_best_embed_prefers_hd_then_stream_number() {
        let picked = best_embed(vec![
            embed("https://e/sd1", false, 1),
            embed("https://e/hd3", true, 3),
            embed("https://e/hd2", true, 2),
        ]);
        assert_eq!(picked.map(|s| s.url).as_deref(), Some("https://e/hd2"));
    }

    #[test]
    fn test_best_embed_skips_empty_urls() {
        assert!(best_embed(vec![embed("", true, 1)]).is_none());

        let picked = best_embed(vec![embed("", true, 1), embed("https://e/x", false, 2)]).unwrap();
        assert_eq!(picked.stream_type, StreamType::Iframe);
    }

    #[test]
    fn test_match_into_channel_badges() {
        let now = Utc::now();
        let past = StreamedMatch {
            id: "abc".into(),
            title: "A vs B".into(),
            category: "football".into(),
            date: Some((now.timestamp() - 60) * 1000),
            popular: false,
            sources: vec![],
        };
        let channel = past.into_channel(3, now);
        assert_eq!(channel.id, "streamed-abc");
        assert_eq!(channel.category, Category::Sports);
        let meta = channel.meta.unwrap();
        assert_eq!(meta.badge.as_deref(), Some("LIVE"));
        assert_eq!(meta.league.as_deref(), Some("football"));
        assert_eq!(meta.sort_order, Some(3));
    }
}
