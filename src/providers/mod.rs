//! Live channel providers
//!
//! - Streamed: live sports matches, resolved through per-source mirrors
//! - IPTV: M3U playlist of general/news channels, resolved by probing URLs
//! - PPV: pay-per-view event listings (listing only)
//! - Schedule: daily sports schedule (listing only)
//! - TvPass: flat channel directory (listing only)

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Channel, ResolvedStream};

pub mod iptv;
pub mod ppv;
pub mod schedule;
pub mod streamed;
pub mod tvpass;

pub use iptv::IptvProvider;
pub use ppv::PpvProvider;
pub use schedule::ScheduleProvider;
pub use streamed::StreamedProvider;
pub use tvpass::TvPassProvider;

/// Provider error types
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request cancelled")]
    Cancelled,
}

/// One independent source of live channels
///
/// A provider is the only party able to turn one of its own channel ids into
/// a playable stream.
#[async_trait]
pub trait LiveProvider: Send + Sync {
    /// Stable, globally unique id (used as `Channel::provider`)
    fn id(&self) -> &str;

    /// Display name
    fn name(&self) -> &str;

    /// Ordering key; lower is listed first
    fn priority(&self) -> i32;

    /// Current channel catalog
    async fn channels(&self) -> Result<Vec<Channel>, ProviderError>;

    /// Resolve one of this provider's channel ids
    ///
    /// `Ok(None)` means no stream is available right now, which is a normal
    /// outcome. `Err` is reserved for genuine faults.
    async fn resolve_stream(&self, channel_id: &str)
        -> Result<Option<ResolvedStream>, ProviderError>;
}

// =============================================================================
// Shared HTTP plumbing
// =============================================================================

/// Default per-request timeout for provider HTTP calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the shared reqwest client used by a provider
///
/// A builder failure falls back to a plain client, which has no request
/// timeout; mirror attempts stay bounded by their own timer.
pub(crate) fn http_client(timeout: Duration) -> reqwest::Client {
    match reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("livetv/", env!("CARGO_PKG_VERSION")))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "HTTP client setup failed, falling back to default client");
            reqwest::Client::new()
        }
    }
}

/// GET a URL and return the body, mapping non-2xx statuses to errors
pub(crate) async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, ProviderError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status(status.as_u16()));
    }

    Ok(response.text().await?)
}

/// GET a URL and decode its JSON body
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, ProviderError> {
    let body = fetch_text(client, url).await?;
    serde_json::from_str(&body)
        .map_err(|e| ProviderError::InvalidResponse(format!("JSON parse error: {}", e)))
}

/// GET a JSON endpoint, treating 404 as "nothing there"
pub(crate) async fn fetch_json_optional<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<Option<T>, ProviderError> {
    match fetch_json(client, url).await {
        Ok(value) => Ok(Some(value)),
        Err(ProviderError::Status(code)) if code == StatusCode::NOT_FOUND.as_u16() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Strip a provider's channel-id prefix, returning the upstream id
pub(crate) fn strip_channel_prefix<'a>(channel_id: &'a str, provider_id: &str) -> Option<&'a str> {
    channel_id
        .strip_prefix(provider_id)
        .and_then(|rest| rest.strip_prefix('-'))
        .filter(|rest| !rest.is_empty())
}

/// Lowercase, dash-separated slug for ids derived from display names
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = true;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
