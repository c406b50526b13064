//! Channel aggregation and stream dispatch
//!
//! [`LiveTv`] is the single entry point callers use. Listing fans out to every
//! provider at once and merges in registry order; a provider whose listing
//! fails or panics contributes nothing and never aborts the others.
//! Resolution goes to exactly one provider and passes its answer, or its
//! error, straight back.

use futures::future::join_all;
use futures::FutureExt;
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{Channel, ResolvedStream};
use crate::providers::ProviderError;
use crate::registry::ProviderRegistry;

/// One provider's share of a listing, for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ProviderListing {
    pub id: String,
    pub name: String,
    pub priority: i32,
    pub channels: Vec<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LiveTv {
    registry: Arc<ProviderRegistry>,
}

impl LiveTv {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Every provider's listing, in priority order, with failures captured
    pub async fn channels_by_provider(&self) -> Vec<ProviderListing> {
        let calls = self.registry.providers().iter().map(|provider| async move {
            // A panicking provider is reported like a failed one
            let result = match AssertUnwindSafe(provider.channels()).catch_unwind().await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(panic) => Err(panic_message(panic.as_ref())),
            };
            (provider, result)
        });

        // join_all yields results in input order, not completion order
        join_all(calls)
            .await
            .into_iter()
            .map(|(provider, result)| {
                let (channels, error) = match result {
                    Ok(channels) => {
                        debug!(provider = provider.id(), count = channels.len(), "listed channels");
                        (channels, None)
                    }
                    Err(e) => {
                        warn!(provider = provider.id(), error = %e, "channel listing failed");
                        (Vec::new(), Some(e))
                    }
                };
                ProviderListing {
                    id: provider.id().to_string(),
                    name: provider.name().to_string(),
                    priority: provider.priority(),
                    channels,
                    error,
                }
            })
            .collect()
    }

    /// All channels from all providers, provider by provider in priority order
    pub async fn all_channels(&self) -> Vec<Channel> {
        self.channels_by_provider()
            .await
            .into_iter()
            .flat_map(|listing| listing.channels)
            .collect()
    }

    /// Resolve a `(provider, channel)` pair
    ///
    /// An unknown provider is a miss (`Ok(None)`). Errors raised by the owning
    /// provider are returned unchanged.
    pub async fn resolve_stream(
        &self,
        provider_id: &str,
        channel_id: &str,
    ) -> Result<Option<ResolvedStream>, ProviderError> {
        let Some(provider) = self.registry.get(provider_id) else {
            debug!(provider = provider_id, "unknown provider");
            return Ok(None);
        };

        provider.resolve_stream(channel_id).await
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("provider panicked: {}", detail)
}

impl From<ProviderRegistry> for LiveTv {
    fn from(registry: ProviderRegistry) -> Self {
        Self::new(Arc::new(registry))
    }
}
