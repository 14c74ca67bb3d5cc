//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default host serving the education metadata document.
pub const DEFAULT_BASE_URL: &str = "https://myjar.app";

/// Default path of the education metadata document on the host.
pub const DEFAULT_METADATA_PATH: &str = "_assets/shared/education-metadata.json";

/// Onboarding session configuration.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Base URL of the metadata host.
    pub base_url: String,
    /// Path of the metadata document relative to `base_url`.
    pub metadata_path: String,
    /// Read the dataset from this file instead of the network.
    pub dataset_file: Option<PathBuf>,
    /// HTTP request timeout for the metadata fetch.
    pub request_timeout: Duration,
    /// Capacity of the session event broadcast channel.
    pub event_capacity: usize,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            metadata_path: DEFAULT_METADATA_PATH.to_string(),
            dataset_file: None,
            request_timeout: Duration::from_secs(30),
            event_capacity: 256,
        }
    }
}

impl OnboardingConfig {
    /// Build a config from `ONBOARDING_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("ONBOARDING_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        let metadata_path = lookup("ONBOARDING_METADATA_PATH")
            .map(|s| s.trim_start_matches('/').to_string())
            .unwrap_or(defaults.metadata_path);
        let dataset_file = lookup("ONBOARDING_DATASET_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let request_timeout = match lookup("ONBOARDING_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("ONBOARDING_REQUEST_TIMEOUT_SECS", &raw)?),
            None => defaults.request_timeout,
        };
        let event_capacity = match lookup("ONBOARDING_EVENT_CAPACITY") {
            Some(raw) => {
                let capacity = parse_number("ONBOARDING_EVENT_CAPACITY", &raw)? as usize;
                if capacity == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "ONBOARDING_EVENT_CAPACITY".into(),
                        message: "must be greater than zero".into(),
                    });
                }
                capacity
            }
            None => defaults.event_capacity,
        };

        Ok(Self {
            base_url,
            metadata_path,
            dataset_file,
            request_timeout,
            event_capacity,
        })
    }

    /// Full URL of the metadata document.
    pub fn metadata_url(&self) -> String {
        format!("{}/{}", self.base_url, self.metadata_path)
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        })
}
