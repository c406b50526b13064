//! IPTV playlist provider
//!
//! Reads an extended M3U playlist. Entries sharing a `tvg-id` collapse into a
//! single channel whose URLs act as mirrors; resolution probes each URL and
//! returns the first one that answers.

use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{
    fetch_text, http_client, slugify, strip_channel_prefix, LiveProvider, ProviderError,
    DEFAULT_REQUEST_TIMEOUT,
};
use crate::mirror::{cancellable, resolve_with_mirrors, DEFAULT_MIRROR_TIMEOUT};
use crate::models::{Category, Channel, MirrorCandidate, ResolvedStream};

pub const PROVIDER_ID: &str = "iptv";
pub const DEFAULT_BASE_URL: &str = "https://iptv-org.github.io/iptv";
pub const DEFAULT_PRIORITY: i32 = 20;

/// One `#EXTINF` entry and its URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub tvg_id: Option<String>,
    pub name: String,
    pub group: Option<String>,
    pub url: String,
}

impl PlaylistEntry {
    /// Channel id this entry maps to
    pub fn channel_id(&self) -> String {
        let key = self
            .tvg_id
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&self.name));
        format!("{}-{}", PROVIDER_ID, key)
    }
}

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([A-Za-z0-9_-]+)="([^"]*)""#).expect("valid attribute regex"))
}

/// Parse an extended M3U playlist
///
/// Lines that aren't `#EXTINF` headers or URLs are ignored, as is a header
/// with no URL following it.
pub fn parse_playlist(body: &str) -> Vec<PlaylistEntry> {
    let mut entries = Vec::new();
    let mut pending: Option<(Option<String>, String, Option<String>)> = None;

    for line in body.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        if let Some(info) = line.strip_prefix("#EXTINF:") {
            // Display name follows the first comma outside of quoted attributes
            let (attrs, name) = split_extinf(info);
            let mut tvg_id = None;
            let mut group = None;
            for cap in attr_regex().captures_iter(attrs) {
                let value = cap[2].trim();
                if value.is_empty() {
                    continue;
                }
                match &cap[1] {
                    "tvg-id" => tvg_id = Some(value.to_string()),
                    "group-title" => group = Some(value.to_string()),
                    _ => {}
                }
            }
            pending = Some((tvg_id, name.trim().to_string(), group));
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        if let Some((tvg_id, name, group)) = pending.take() {
            entries.push(PlaylistEntry {
                tvg_id,
                name,
                group,
                url: line.to_string(),
            });
        }
    }

    entries
}

fn split_extinf(info: &str) -> (&str, &str) {
    let mut in_quotes = false;
    for (i, c) in info.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return (&info[..i], &info[i + 1..]),
            _ => {}
        }
    }
    (info, "")
}

/// Collapse entries into channels, keeping first-seen order
fn entries_to_channels(entries: &[PlaylistEntry]) -> Vec<Channel> {
    let mut channels: Vec<Channel> = Vec::new();
    let mut seen = HashSet::new();

    for entry in entries {
        let id = entry.channel_id();
        if !seen.insert(id.clone()) {
            continue;
        }
        let name = if entry.name.is_empty() {
            entry.tvg_id.clone().unwrap_or_else(|| id.clone())
        } else {
            entry.name.clone()
        };
        let category = entry
            .group
            .as_deref()
            .map(Category::from_label)
            .unwrap_or_else(|| Category::from_label(&entry.name));
        channels.push(Channel::new(id, name, category, PROVIDER_ID));
    }

    channels
}

/// M3U playlist provider
pub struct IptvProvider {
    base_url: String,
    client: reqwest::Client,
    priority: i32,
    mirror_timeout: Duration,
}

impl IptvProvider {
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

    async fn playlist(&self) -> Result<Vec<PlaylistEntry>, ProviderError> {
        let url = format!("{}/index.m3u", self.base_url);
        let body = fetch_text(&self.client, &url).await?;
        Ok(parse_playlist(&body))
    }

    /// Probe one stream URL; reachable means playable
    async fn probe(
        client: reqwest::Client,
        mirror: MirrorCandidate,
        token: CancellationToken,
    ) -> Result<Option<ResolvedStream>, ProviderError> {
        let response = cancellable(&token, async {
            client.head(&mirror.id).send().await.map_err(ProviderError::from)
        })
        .await?;

        if response.status().is_success() {
            Ok(Some(ResolvedStream::from_url(mirror.id)))
        } else {
            Ok(None)
        }
    }
}

impl Default for IptvProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiveProvider for IptvProvider {
    fn id(&self) -> &str {
        PROVIDER_ID
    }

    fn name(&self) -> &str {
        "IPTV"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    async fn channels(&self) -> Result<Vec<Channel>, ProviderError> {
        let entries = self.playlist().await?;
        Ok(entries_to_channels(&entries))
    }

    async fn resolve_stream(
        &self,
        channel_id: &str,
    ) -> Result<Option<ResolvedStream>, ProviderError> {
        if strip_channel_prefix(channel_id, PROVIDER_ID).is_none() {
            return Ok(None);
        }

        let entries = self.playlist().await?;
        let mirrors: Vec<MirrorCandidate> = entries
            .into_iter()
            .filter(|e| e.channel_id() == channel_id)
            .enumerate()
            .map(|(i, e)| MirrorCandidate::new(e.url, format!("{} #{}", e.name, i + 1), i as i32))
            .collect();

        if mirrors.is_empty() {
            return Ok(None);
        }

        Ok(resolve_with_mirrors(mirrors, self.mirror_timeout, |mirror, token| {
            Self::probe(self.client.clone(), mirror, token)
        })
        .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYLIST: &str = r#"#EXTM3U x-tvg-url="https://epg.example/guide.xml"
#EXTINF:-1 tvg-id="BBCOne.uk" tvg-logo="https://logo/bbc1.png" group-title="General",BBC One
https://a.example/bbc1/index.m3u8
#EXTINF:-1 tvg-id="SkyNews.uk" group-title="News",Sky News, Live
#EXTVLCOPT:http-user-agent=Mozilla
https://a.example/skynews.m3u8
#EXTINF:-1 tvg-id="BBCOne.uk" group-title="General",BBC One Backup
https://b.example/bbc1.mpd
#EXTINF:-1 tvg-id="" group-title="Sports",Local Sports
https://c.example/local.m3u8
#EXTINF:-1 tvg-id="Orphan.uk",Orphan With No URL
"#;

    #[test]
    fn test_parse_playlist_entries() {
        let entries = parse_playlist(PLAYLIST);
        assert_eq!(entries.len(), 4);

        assert_eq!(entries[0].tvg_id.as_deref(), Some("BBCOne.uk"));
        assert_eq!(entries[0].name, "BBC One");
        assert_eq!(entries[0].group.as_deref(), Some("General"));
        assert_eq!(entries[0].url, "https://a.example/bbc1/index.m3u8");

        // Comma inside the display name and a VLC option line in between
        assert_eq!(entries[1].name, "Sky News, Live");
        assert_eq!(entries[1].url, "https://a.example/skynews.m3u8");

        // Empty tvg-id falls back to the name slug
        assert!(entries[3].tvg_id.is_none());
        assert_eq!(entries[3].channel_id(), "iptv-local-sports");
    }

    #[test]
    fn test_split_extinf_ignores_commas_in_quotes() {
        let (attrs, name) = split_extinf(r#"-1 tvg-name="A, B" group-title="News",A B"#);
        assert_eq!(attrs, r#"-1 tvg-name="A, B" group-title="News""#);
        assert_eq!(name, "A B");
    }

    #[test]
    fn test_duplicates_collapse_into_one_channel() {
        let channels = entries_to_channels(&parse_playlist(PLAYLIST));
        let ids: Vec<&str> = channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["iptv-bbcone-uk", "iptv-skynews-uk", "iptv-local-sports"]);

        assert_eq!(channels[0].name, "BBC One");
        assert_eq!(channels[1].category, Category::News);
        assert_eq!(channels[2].category, Category::Sports);
        assert!(channels.iter().all(|c| c.provider == PROVIDER_ID));
    }
}
