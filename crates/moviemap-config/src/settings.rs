use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides any api key from config.toml.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub tmdb: TmdbSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbSettings {
    /// Access token for the metadata service. Its absence is not an
    /// error: enrichment degrades to manual-queue-only mode.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Politeness delay between successful calls, in milliseconds.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Total attempts per call for non-throttle failures.
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
    /// Fixed back-off window after an HTTP 429, in seconds.
    #[serde(default = "default_rate_limit_backoff_secs")]
    pub rate_limit_backoff_secs: u64,
}

fn default_request_delay_ms() -> u64 {
    250
}

fn default_retry_limit() -> u32 {
    3
}

fn default_rate_limit_backoff_secs() -> u64 {
    10
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            request_delay_ms: default_request_delay_ms(),
            retry_limit: default_retry_limit(),
            rate_limit_backoff_secs: default_rate_limit_backoff_secs(),
        }
    }
}

impl Settings {
    /// Load settings from an optional config.toml, then apply the
    /// environment override for the api key. A missing file yields
    /// defaults; a malformed file is an error.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut settings = match config_file {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&content)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            _ => Settings::default(),
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                settings.tmdb.api_key = Some(key);
            }
        }

        Ok(settings)
    }
}
