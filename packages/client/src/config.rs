//! Client configuration, loaded from environment variables.

use std::{path::PathBuf, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/v1";
pub const DEFAULT_STORAGE_PATH: &str = ".sportify/storage.json";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Sportify client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL including the `/v1` prefix.
    pub api_base_url: String,
    /// File holding the persisted session (token and user id).
    pub storage_path: PathBuf,
    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from `SPORTIFY_API_URL`, `SPORTIFY_STORAGE_PATH` and
    /// `SPORTIFY_REQUEST_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let request_timeout = match var("SPORTIFY_REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(
                        "Ignoring invalid SPORTIFY_REQUEST_TIMEOUT_SECS '{}', using {}s",
                        raw,
                        DEFAULT_REQUEST_TIMEOUT_SECS
                    );
                    defaults.request_timeout
                }
            },
            None => defaults.request_timeout,
        };

        Self {
            api_base_url: var("SPORTIFY_API_URL").unwrap_or(defaults.api_base_url),
            storage_path: var("SPORTIFY_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            request_timeout,
        }
    }
}
