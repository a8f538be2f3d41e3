//! Remote service configuration

use std::time::Duration;

/// Environment variable holding the remote service base URL
pub const API_URL_ENV: &str = "CHAT_SYNC_API_URL";

/// Base URL used when no override is configured (local development server)
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Upper bound on a single remote call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the HTTP gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL without trailing slash (e.g., `http://localhost:8000/api`)
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            Some(url) => Self::default().with_base_url(url),
            None => Self::default(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().trim_end_matches('/').to_string();
        self
    }
}
