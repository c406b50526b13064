//! Provider registry
//!
//! A fixed, priority-ordered set of providers built once at startup and shared
//! read-only afterwards.

use std::sync::Arc;

use crate::config::Config;
use crate::providers::{
    iptv, ppv, schedule, streamed, tvpass, IptvProvider, LiveProvider, PpvProvider,
    ScheduleProvider, StreamedProvider, TvPassProvider,
};

pub struct ProviderRegistry {
    providers: Vec<Arc<dyn LiveProvider>>,
}

impl ProviderRegistry {
    /// Build a registry from an explicit provider list
    ///
    /// Providers are ordered by ascending priority; equal priorities keep
    /// their given order.
    pub fn new(mut providers: Vec<Arc<dyn LiveProvider>>) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self { providers }
    }

    /// Build the bundled providers from configuration
    pub fn from_config(config: &Config) -> Self {
        let request_timeout = config.request_timeout();
        let mirror_timeout = config.mirror_timeout();

        let candidates: Vec<Arc<dyn LiveProvider>> = vec![
            Arc::new(
                StreamedProvider::with_base_url(
                    config.provider_url(streamed::PROVIDER_ID, streamed::DEFAULT_BASE_URL),
                )
                .with_request_timeout(request_timeout)
                .with_mirror_timeout(mirror_timeout),
            ),
            Arc::new(
                IptvProvider::with_base_url(
                    config.provider_url(iptv::PROVIDER_ID, iptv::DEFAULT_BASE_URL),
                )
                .with_request_timeout(request_timeout)
                .with_mirror_timeout(mirror_timeout),
            ),
            Arc::new(
                PpvProvider::with_base_url(
                    config.provider_url(ppv::PROVIDER_ID, ppv::DEFAULT_BASE_URL),
                )
                .with_request_timeout(request_timeout),
            ),
            Arc::new(
                ScheduleProvider::with_base_url(
                    config.provider_url(schedule::PROVIDER_ID, schedule::DEFAULT_BASE_URL),
                )
                .with_request_timeout(request_timeout),
            ),
            Arc::new(
                TvPassProvider::with_base_url(
                    config.provider_url(tvpass::PROVIDER_ID, tvpass::DEFAULT_BASE_URL),
                )
                .with_request_timeout(request_timeout),
            ),
        ];

        Self::new(
            candidates
                .into_iter()
                .filter(|p| config.is_enabled(p.id()))
                .collect(),
        )
    }

    /// Providers in priority order
    pub fn providers(&self) -> &[Arc<dyn LiveProvider>] {
        &self.providers
    }

    /// Look up a provider by exact id
    pub fn get(&self, provider_id: &str) -> Option<&Arc<dyn LiveProvider>> {
        self.providers.iter().find(|p| p.id() == provider_id)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(|p| p.id()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_providers_in_priority_order() {
        let registry = ProviderRegistry::from_config(&Config::default());
        let ids: Vec<&str> = registry.providers().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["streamed", "iptv", "ppv", "schedule", "tvpass"]);
    }

    #[test]
    fn test_disabled_providers_are_left_out() {
        let config = Config {
            disabled_providers: vec!["ppv".into(), "streamed".into()],
            ..Config::default()
        };
        let registry = ProviderRegistry::from_config(&config);
        assert_eq!(registry.len(), 3);
        assert!(registry.get("ppv").is_none());
        assert!(registry.get("iptv").is_some());
    }

    #[test]
    fn test_get_is_exact_match() {
        let registry = ProviderRegistry::default();
        assert!(registry.get("IPTV").is_none());
        assert!(registry.get("iptv").is_some());
        assert!(registry.get("").is_none());
    }
}
