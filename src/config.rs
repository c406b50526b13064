//! Configuration management for livetv
//!
//! Handles config file loading/saving, command-line edits and environment
//! overrides.
//! Config is stored at ~/.config/livetv/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::mirror::DEFAULT_MIRROR_TIMEOUT;
use crate::providers::DEFAULT_REQUEST_TIMEOUT;

/// Environment variable overriding the mirror attempt timeout
pub const MIRROR_TIMEOUT_ENV: &str = "LIVETV_MIRROR_TIMEOUT_MS";

/// Per-provider base URL overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUrls {
    pub streamed: Option<String>,
    pub iptv: Option<String>,
    pub ppv: Option<String>,
    pub schedule: Option<String>,
    pub tvpass: Option<String>,
}

impl ProviderUrls {
    fn get(&self, provider_id: &str) -> Option<&String> {
        match provider_id {
            "streamed" => self.streamed.as_ref(),
            "iptv" => self.iptv.as_ref(),
            "ppv" => self.ppv.as_ref(),
            "schedule" => self.schedule.as_ref(),
            "tvpass" => self.tvpass.as_ref(),
            _ => None,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bound on a single mirror attempt, in milliseconds
    pub mirror_timeout_ms: Option<u64>,
    /// Per-request HTTP timeout, in seconds
    pub request_timeout_secs: Option<u64>,
    /// Provider ids to leave out of the registry
    pub disabled_providers: Vec<String>,
    pub providers: ProviderUrls,
}

impl Config {
    /// Get config file path (~/.config/livetv/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("livetv").join("config.toml"))
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from an explicit path; unreadable or invalid files yield defaults
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Set one key from the command line
    ///
    /// Keys are `mirror_timeout_ms`, `request_timeout_secs`,
    /// `disabled_providers` (comma separated) and `providers.<id>`. An empty
    /// value clears the key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let number = |v: &str| -> Result<Option<u64>> {
            if v.is_empty() {
                return Ok(None);
            }
            v.parse()
                .map(Some)
                .with_context(|| format!("{} expects a whole number, got {:?}", key, v))
        };
        let url = (!value.is_empty()).then(|| value.to_string());

        match key {
            "mirror_timeout_ms" => self.mirror_timeout_ms = number(value)?,
            "request_timeout_secs" => self.request_timeout_secs = number(value)?,
            "disabled_providers" => {
                self.disabled_providers = value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from)
                    .collect();
            }
            "providers.streamed" => self.providers.streamed = url,
            "providers.iptv" => self.providers.iptv = url,
            "providers.ppv" => self.providers.ppv = url,
            "providers.schedule" => self.providers.schedule = url,
            "providers.tvpass" => self.providers.tvpass = url,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Mirror attempt timeout with fallback chain:
    /// 1. Environment variable LIVETV_MIRROR_TIMEOUT_MS
    /// 2. Value from config file
    /// 3. Built-in default (6s)
    pub fn mirror_timeout(&self) -> Duration {
        std::env::var(MIRROR_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .or(self.mirror_timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_MIRROR_TIMEOUT)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Base URL for a provider: `LIVETV_<ID>_URL`, then config, then `default`
    pub fn provider_url(&self, provider_id: &str, default: &str) -> String {
        let env_key = format!("LIVETV_{}_URL", provider_id.to_uppercase());
        std::env::var(env_key)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.providers.get(provider_id).cloned())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn is_enabled(&self, provider_id: &str) -> bool {
        !self
            .disabled_providers
            .iter()
            .any(|d| d.eq_ignore_ascii_case(provider_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.mirror_timeout_ms.is_none());
        assert!(config.disabled_providers.is_empty());
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            mirror_timeout_ms = 2500
            disabled_providers = ["TvPass"]

            [providers]
            iptv = "http://localhost:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.mirror_timeout_ms, Some(2500));
        assert!(!config.is_enabled("tvpass"));
        assert!(config.is_enabled("iptv"));
        assert_eq!(
            config.provider_url("iptv", "https://default"),
            "http://localhost:9000"
        );
        assert_eq!(config.provider_url("ppv", "https://default"), "https://default");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            request_timeout_secs: Some(5),
            ..Config::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_set_keys() {
        let mut config = Config::default();
        config.set("mirror_timeout_ms", "2500").unwrap();
        config.set("disabled_providers", "ppv, tvpass,").unwrap();
        config.set("providers.iptv", "http://localhost:9000").unwrap();

        assert_eq!(config.mirror_timeout_ms, Some(2500));
        assert_eq!(config.disabled_providers, vec!["ppv", "tvpass"]);
        assert_eq!(config.providers.iptv.as_deref(), Some("http://localhost:9000"));

        config.set("providers.iptv", "").unwrap();
        config.set("mirror_timeout_ms", " ").unwrap();
        assert!(config.providers.iptv.is_none());
        assert!(config.mirror_timeout_ms.is_none());
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set("request_timeout_secs", "soon").is_err());
        assert!(config.set("providers.unknown", "http://x").is_err());
        assert!(config.set("volume", "3").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "mirror_timeout_ms = \"soon\"").unwrap();

        assert_eq!(Config::load_from(&path), Config::default());
        assert_eq!(Config::load_from(&dir.path().join("missing.toml")), Config::default());
    }
}
