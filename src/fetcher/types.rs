//! Fetcher configuration and loop decisions

use std::time::Duration;

/// Limits on the fetch loop.
///
/// Every limit is off by default: a fetch keeps waiting out rate-limit windows
/// and following next links for as long as the server asks it to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetcherConfig {
    /// Consecutive rate-limit retries allowed for one page
    pub max_rate_limit_retries: Option<u32>,
    /// Pages a paginated fetch may collect
    pub max_pages: Option<u32>,
    /// Longest single rate-limit wait to accept
    pub max_wait: Option<Duration>,
    /// Also wait out `retry-after` on 403 and quota or `retry-after` on 429.
    ///
    /// Off by default: only a 403 or 2xx with an exhausted quota is retried.
    pub secondary_rate_limits: bool,
}

impl FetcherConfig {
    /// Create a new config builder
    pub fn builder() -> FetcherConfigBuilder {
        FetcherConfigBuilder::default()
    }
}

/// Builder for fetcher config
#[derive(Default)]
pub struct FetcherConfigBuilder {
    config: FetcherConfig,
}

impl FetcherConfigBuilder {
    /// Cap consecutive rate-limit retries per page
    pub fn max_rate_limit_retries(mut self, retries: u32) -> Self {
        self.config.max_rate_limit_retries = Some(retries);
        self
    }

    /// Cap the number of pages collected
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.config.max_pages = Some(pages);
        self
    }

    /// Cap a single rate-limit wait
    pub fn max_wait(mut self, wait: Duration) -> Self {
        self.config.max_wait = Some(wait);
        self
    }

    /// Retry GitHub's secondary rate limits (`retry-after`, 429)
    pub fn secondary_rate_limits(mut self, enabled: bool) -> Self {
        self.config.secondary_rate_limits = enabled;
        self
    }

    /// Build the config
    pub fn build(self) -> FetcherConfig {
        self.config
    }
}

/// What the loop does with a response it just received
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Quota exhausted: sleep, then re-send the same request
    Retry {
        /// How long to sleep first
        wait: Duration,
    },
    /// Decode the body and move on to pagination
    Accept,
}

impl Decision {
    /// Check if this decision retries the request
    pub fn is_retry(&self) -> bool {
        matches!(self, Self::Retry { .. })
    }
}
