//! Fetcher module
//!
//! The request / retry / pagination loop.
//!
//! # Overview
//!
//! After every response the fetcher decides between three moves:
//! - return the decoded body (or the collected pages) to the caller
//! - follow the `rel="next"` link and request the next page
//! - sleep until the rate-limit window resets and re-send the same request
//!
//! ```text
//!              ┌──────────── wait, same URI ────────────┐
//!              ▼                                        │
//!   ──► Requesting ──► quota exhausted (2xx/403) ──► RateLimited
//!              │
//!              ├──► other non-2xx / transport error / bad JSON ──► Failed
//!              │
//!              └──► PageReceived ──► next link + following ──► Requesting (new URI)
//!                         │
//!                         └──► otherwise ──► Done
//! ```
//!
//! Each call owns its [`RequestSpec`] and page accumulator, so one fetcher can
//! serve many tasks at once without locking.

mod types;

pub use types::{Decision, FetcherConfig, FetcherConfigBuilder};

use crate::error::{Error, FetchStage, Result};
use crate::http::{
    retry_after, HttpClient, RateLimitStatus, RequestSpec, Transport, TransportResponse,
};
use crate::pagination::{next_link_from_headers, resolve_link, FetchResult, PageCollection};
use chrono::Utc;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Fetches one resource, waiting out rate limits and optionally following pagination
pub struct PaginatingFetcher<T = HttpClient> {
    transport: T,
    config: FetcherConfig,
}

impl PaginatingFetcher<HttpClient> {
    /// Create a fetcher over a default reqwest client
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpClient::new()?))
    }
}

impl<T: Transport> PaginatingFetcher<T> {
    /// Create a fetcher over a transport, with no loop limits
    pub fn with_transport(transport: T) -> Self {
        Self::with_config(transport, FetcherConfig::default())
    }

    /// Create a fetcher over a transport with loop limits
    pub fn with_config(transport: T, config: FetcherConfig) -> Self {
        Self { transport, config }
    }

    /// Get the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the loop limits
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch JSON.
    ///
    /// With `follow_pagination` the result is [`FetchResult::Pages`] holding every
    /// page in order; without it, [`FetchResult::Single`] holding the first
    /// response body.
    pub async fn fetch(&self, spec: RequestSpec, follow_pagination: bool) -> Result<FetchResult> {
        self.fetch_as(spec, follow_pagination).await
    }

    /// Fetch and decode every body as `B`
    pub async fn fetch_as<B: DeserializeOwned>(
        &self,
        spec: RequestSpec,
        follow_pagination: bool,
    ) -> Result<FetchResult<B>> {
        self.fetch_with_cancel(spec, follow_pagination, &CancellationToken::new())
            .await
    }

    /// Fetch, aborting with [`Error::Cancelled`] as soon as `cancel` fires.
    ///
    /// Cancellation interrupts both in-flight requests and rate-limit waits.
    pub async fn fetch_with_cancel<B: DeserializeOwned>(
        &self,
        mut spec: RequestSpec,
        follow_pagination: bool,
        cancel: &CancellationToken,
    ) -> Result<FetchResult<B>> {
        let mut pages: PageCollection<B> = Vec::new();
        let mut stage = FetchStage::Initial;
        let mut retries: u32 = 0;

        loop {
            let response = self
                .send(&spec, cancel)
                .await
                .map_err(|e| e.in_stage(stage))?;

            if let Decision::Retry { wait } = self.inspect(&response, stage)? {
                if let Some(max_retries) = self.config.max_rate_limit_retries {
                    if retries >= max_retries {
                        return Err(Error::MaxRetriesExceeded { max_retries });
                    }
                }
                retries += 1;
                self.sleep(wait, cancel).await?;
                debug!("Retrying {} {} after rate-limit wait", spec.method, spec.uri);
                continue;
            }

            let body: B = response
                .json()
                .map_err(|e| Error::decode(e.to_string(), stage))?;

            if !follow_pagination {
                return Ok(FetchResult::Single(body));
            }
            pages.push(body);

            let Some(link) = next_link_from_headers(&response.headers) else {
                debug!("Pagination finished after {} page(s)", pages.len());
                return Ok(FetchResult::Pages(pages));
            };

            if let Some(max_pages) = self.config.max_pages {
                if pages.len() >= max_pages as usize {
                    return Err(Error::PageLimitExceeded { max_pages });
                }
            }

            let next_uri = resolve_link(&spec.uri, &link).map_err(|e| e.in_stage(stage))?;
            debug!("Following next link to {}", next_uri);
            spec.advance_to(next_uri);
            stage = FetchStage::PageAdvance {
                page: pages.len() + 1,
            };
            retries = 0;
        }
    }

    /// Decide what to do with a response: accept it, wait and retry, or fail
    pub(crate) fn inspect(
        &self,
        response: &TransportResponse,
        stage: FetchStage,
    ) -> Result<Decision> {
        let quota = RateLimitStatus::from_headers(&response.headers);
        if let Some(quota) = quota {
            debug!("Rate limit: {}/{}", quota.limit, quota.remaining);
        }

        if response.is_success() {
            return match quota {
                Some(quota) if quota.is_exhausted() => self.quota_wait(&quota),
                _ => Ok(Decision::Accept),
            };
        }

        let status = response.status;
        let secondary = self.config.secondary_rate_limits;
        if status == StatusCode::FORBIDDEN
            || (secondary && status == StatusCode::TOO_MANY_REQUESTS)
        {
            if let Some(quota) = quota.filter(RateLimitStatus::is_exhausted) {
                return self.quota_wait(&quota);
            }

            // Secondary rate limits report spare quota but ask for a pause
            if let Some(wait) = retry_after(&response.headers).filter(|_| secondary) {
                warn!(
                    "Secondary rate limit ({}), waiting {}s before retry",
                    status.as_u16(),
                    wait.as_secs()
                );
                return self.bounded(wait);
            }
        }

        warn!(
            "Could not handle response during {}: HTTP {}",
            stage,
            status.as_u16()
        );
        Err(Error::http_status(
            status.as_u16(),
            response.body.clone(),
            stage,
        ))
    }

    /// Turn an exhausted quota into a wait until its reset
    fn quota_wait(&self, quota: &RateLimitStatus) -> Result<Decision> {
        let now = Utc::now();
        let wait = quota.wait_from(now.timestamp_millis());

        warn!(
            "Rate limit exceeded ({}/{}), waiting {}ms before retry",
            quota.limit,
            quota.remaining,
            wait.as_millis()
        );
        match quota.reset_time() {
            Some(reset) => info!("Current time is {}; reset at {}", now, reset),
            None => info!("Current time is {}; reset time out of range", now),
        }
        if wait.is_zero() {
            debug!("Reset time already passed, retrying immediately");
        }

        self.bounded(wait)
    }

    fn bounded(&self, wait: Duration) -> Result<Decision> {
        match self.config.max_wait {
            Some(max_wait) if wait > max_wait => Err(Error::RateLimited {
                retry_after_seconds: wait.as_secs_f64().ceil() as u64,
            }),
            _ => Ok(Decision::Retry { wait }),
        }
    }

    async fn send(
        &self,
        spec: &RequestSpec,
        cancel: &CancellationToken,
    ) -> Result<TransportResponse> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            result = self.transport.send(spec) => result,
        }
    }

    async fn sleep(&self, wait: Duration, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Error::Cancelled),
            () = tokio::time::sleep(wait) => Ok(()),
        }
    }
}

impl<T> std::fmt::Debug for PaginatingFetcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatingFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
