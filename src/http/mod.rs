//! HTTP module
//!
//! Provides the transport seam used by the fetcher and the rate-limit plumbing.
//!
//! # Features
//!
//! - **Transport trait**: anything that can deliver a [`RequestSpec`]
//! - **reqwest client**: default headers, per-request timeouts, opt-in pacing
//! - **Quota parsing**: `x-ratelimit-*` and `retry-after` headers

mod client;
mod rate_limit;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestSpec, Transport,
    TransportResponse,
};
pub use rate_limit::{
    retry_after, RateLimitStatus, RateLimiter, RateLimiterConfig, LIMIT_HEADER, REMAINING_HEADER,
    RESET_HEADER, RETRY_AFTER_HEADER,
};
