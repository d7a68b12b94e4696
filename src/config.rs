//! Settings file
//!
//! Optional YAML file that configures the HTTP client and the fetch loop:
//!
//! ```yaml
//! http:
//!   timeout_secs: 30
//!   user_agent: my-tool/1.0
//!   headers:
//!     Accept: application/vnd.github+json
//!   rate_limit:
//!     requests_per_second: 1
//!     burst_size: 10
//! fetch:
//!   max_rate_limit_retries: 5
//!   max_pages: 100
//!   max_wait_secs: 3600
//!   secondary_rate_limits: true
//! ```

use crate::error::{Result, ResultExt};
use crate::fetcher::FetcherConfig;
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::StringMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Settings
// ============================================================================

/// Complete settings loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Fetch loop limits
    #[serde(default)]
    pub fetch: FetchSettings,
}

impl Settings {
    /// Parse settings from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_yaml_str(&yaml)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// HTTP client configuration described by these settings
    pub fn http_config(&self) -> HttpClientConfig {
        let mut config = HttpClientConfig {
            default_headers: self.http.headers.clone(),
            rate_limit: self.http.rate_limit.clone(),
            ..HttpClientConfig::default()
        };
        if let Some(secs) = self.http.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = &self.http.user_agent {
            config.user_agent.clone_from(agent);
        }
        config
    }

    /// Fetch loop configuration described by these settings
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            max_rate_limit_retries: self.fetch.max_rate_limit_retries,
            max_pages: self.fetch.max_pages,
            max_wait: self.fetch.max_wait_secs.map(Duration::from_secs),
            secondary_rate_limits: self.fetch.secondary_rate_limits,
        }
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// Client-side pacing
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

// ============================================================================
// Fetch Settings
// ============================================================================

/// Fetch loop limits; omitted fields mean unbounded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchSettings {
    /// Consecutive rate-limit retries allowed per page
    #[serde(default)]
    pub max_rate_limit_retries: Option<u32>,

    /// Pages a paginated fetch may collect
    #[serde(default)]
    pub max_pages: Option<u32>,

    /// Longest single rate-limit wait to accept, in seconds
    #[serde(default)]
    pub max_wait_secs: Option<u64>,

    /// Wait out `retry-after` and 429 responses as well
    #[serde(default)]
    pub secondary_rate_limits: bool,
}
