//! Response envelopes for callers
//!
//! Listing: `{"success": true, "channels": [...]}`.
//! Resolution: `{"success": true, "stream": {...}}` or
//! `{"success": false, "error": "STREAM_UNAVAILABLE"}`.

use serde::{Deserialize, Serialize};

use crate::models::{Channel, ResolvedStream};
use crate::providers::ProviderError;

pub const STREAM_UNAVAILABLE: &str = "STREAM_UNAVAILABLE";
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const RESOLVE_FAILED: &str = "RESOLVE_FAILED";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelsResponse {
    pub success: bool,
    pub channels: Vec<Channel>,
}

impl ChannelsResponse {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self {
            success: true,
            channels,
        }
    }
}

/// Resolution envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<ResolvedStream>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StreamResponse {
    fn failure(error: &str, message: Option<String>) -> Self {
        Self {
            success: false,
            stream: None,
            error: Some(error.to_string()),
            message,
        }
    }

    pub fn unavailable() -> Self {
        Self::failure(STREAM_UNAVAILABLE, None)
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::failure(INVALID_REQUEST, Some(message.into()))
    }

    /// Map a resolution result onto the envelope
    pub fn from_result(result: Result<Option<ResolvedStream>, ProviderError>) -> Self {
        match result {
            Ok(Some(stream)) => Self {
                success: true,
                stream: Some(stream),
                error: None,
                message: None,
            },
            Ok(None) => Self::unavailable(),
            Err(e) => Self::failure(RESOLVE_FAILED, Some(e.to_string())),
        }
    }

    /// Validate request ids, rejecting missing or blank values
    pub fn validate_request<'a>(
        provider_id: Option<&'a str>,
        channel_id: Option<&'a str>,
    ) -> Result<(&'a str, &'a str), Self> {
        let provider = provider_id.map(str::trim).filter(|s| !s.is_empty());
        let channel = channel_id.map(str::trim).filter(|s| !s.is_empty());
        match (provider, channel) {
            (Some(p), Some(c)) => Ok((p, c)),
            (None, _) => Err(Self::invalid("missing provider id")),
            (_, None) => Err(Self::invalid("missing channel id")),
        }
    }

    /// HTTP-style status for this envelope
    pub fn status_code(&self) -> u16 {
        match self.error.as_deref() {
            None => 200,
            Some(INVALID_REQUEST) => 400,
            Some(STREAM_UNAVAILABLE) => 404,
            Some(_) => 502,
        }
    }
}
