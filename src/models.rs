//! Data structures shared across livetv
//!
//! Contains the value types flowing between providers, the registry and the
//! aggregator:
//! - **Listings**: channels, their category and optional event metadata
//! - **Streams**: resolved playable URLs and their delivery type
//! - **Mirrors**: per-provider retry candidates used during resolution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Listing Models
// =============================================================================

/// Channel category (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sports,
    General,
    News,
}

impl Category {
    /// Map a free-form upstream group label onto a category
    ///
    /// Anything that doesn't look like news or sport lands in `General`.
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();

        if lower.contains("news") {
            return Category::News;
        }

        const SPORT_WORDS: &[&str] = &[
            "sport", "football", "soccer", "basketball", "baseball", "hockey", "tennis",
            "rugby", "cricket", "golf", "motor", "racing", "f1", "fight", "boxing", "mma",
            "ufc", "wwe", "nfl", "nba", "nhl", "mlb", "darts", "cycling",
        ];
        if SPORT_WORDS.iter().any(|w| lower.contains(w)) {
            return Category::Sports;
        }

        Category::General
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Sports => write!(f, "sports"),
            Category::General => write!(f, "general"),
            Category::News => write!(f, "news"),
        }
    }
}

/// Event metadata attached to scheduled channels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    /// Kickoff time (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

impl ChannelMeta {
    pub fn is_empty(&self) -> bool {
        self.league.is_none()
            && self.starts_at.is_none()
            && self.sort_order.is_none()
            && self.badge.is_none()
    }
}

/// A live channel listing entry
///
/// `id` is only unique within the owning provider; use [`Channel::key`] when
/// a globally unique handle is needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ChannelMeta>,
}

impl Channel {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            provider: provider.into(),
            meta: None,
        }
    }

    /// Attach metadata, dropping it if every field is empty
    pub fn with_meta(mut self, meta: ChannelMeta) -> Self {
        self.meta = if meta.is_empty() { None } else { Some(meta) };
        self
    }

    /// The `(provider, id)` pair identifying this channel across providers
    pub fn key(&self) -> (&str, &str) {
        (&self.provider, &self.id)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] ({}/{})", self.name, self.category, self.provider, self.id)
    }
}

// =============================================================================
// Stream Models
// =============================================================================

/// How a resolved stream is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Hls,
    Dash,
    Iframe,
}

impl StreamType {
    /// Infer the stream type from a URL's path extension
    pub fn from_url(url: &str) -> Self {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .to_lowercase();

        if path.ends_with(".m3u8") || path.ends_with(".m3u") {
            StreamType::Hls
        } else if path.ends_with(".mpd") {
            StreamType::Dash
        } else {
            StreamType::Iframe
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamType::Hls => write!(f, "hls"),
            StreamType::Dash => write!(f, "dash"),
            StreamType::Iframe => write!(f, "iframe"),
        }
    }
}

/// A directly playable stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStream {
    pub url: String,
    #[serde(rename = "type")]
    pub stream_type: StreamType,
}

impl ResolvedStream {
    pub fn new(url: impl Into<String>, stream_type: StreamType) -> Self {
        Self {
            url: url.into(),
            stream_type,
        }
    }

    /// Build a stream whose type is inferred from the URL
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let stream_type = StreamType::from_url(&url);
        Self { url, stream_type }
    }
}

// =============================================================================
// Mirror Models
// =============================================================================

/// One alternate backing endpoint a provider may try while resolving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorCandidate {
    pub id: String,
    pub label: String,
    /// Lower is tried first
    pub priority: i32,
}

impl MirrorCandidate {
    pub fn new(id: impl Into<String>, label: impl Into<String>, priority: i32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            priority,
        }
    }
}

impl fmt::Display for MirrorCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.label, self.priority)
    }
}
