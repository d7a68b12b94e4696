//! Rate limiting
//!
//! Two separate concerns live here:
//!
//! - [`RateLimitStatus`]: the server's view of the caller's quota, parsed from the
//!   `x-ratelimit-*` headers of every response. The fetcher uses it to decide when
//!   to sleep until the window resets.
//! - [`RateLimiter`]: an optional client-side token bucket (governor) that paces
//!   outgoing requests before the server ever has to push back.

use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Header carrying the request limit for the current window
pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
/// Header carrying the requests left in the current window
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
/// Header carrying the window reset time, in Unix epoch seconds
pub const RESET_HEADER: &str = "x-ratelimit-reset";
/// Header carrying a server-requested delay in seconds
pub const RETRY_AFTER_HEADER: &str = "retry-after";

// ============================================================================
// Server-reported quota
// ============================================================================

/// Quota counters reported by the server on a single response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window
    pub limit: u64,
    /// Requests left in the window
    pub remaining: u64,
    /// When the window resets, in milliseconds since the Unix epoch
    pub reset_at_millis: i64,
}

impl RateLimitStatus {
    /// Parse the quota headers of a response.
    ///
    /// Returns `None` unless all three counters are present and numeric.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let limit = header_number::<u64>(headers, LIMIT_HEADER)?;
        let remaining = header_number::<u64>(headers, REMAINING_HEADER)?;
        let reset_secs = header_number::<i64>(headers, RESET_HEADER)?;

        Some(Self {
            limit,
            remaining,
            reset_at_millis: reset_secs.saturating_mul(1000),
        })
    }

    /// True when no requests are left in the window
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Time left until the reset, measured from `now_millis`.
    ///
    /// A reset already in the past yields zero.
    pub fn wait_from(&self, now_millis: i64) -> Duration {
        let millis = self.reset_at_millis.saturating_sub(now_millis).max(0);
        Duration::from_millis(millis as u64)
    }

    /// Wall-clock time of the reset
    pub fn reset_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.reset_at_millis)
    }
}

/// Parse a `retry-after` header given in delta-seconds
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    header_number::<u64>(headers, RETRY_AFTER_HEADER).map(Duration::from_secs)
}

fn header_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

// ============================================================================
// Client-side pacing
// ============================================================================

/// Configuration for client-side request pacing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per second
    pub requests_per_second: u32,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 10,
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN),
        )
        .allow_burst(NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN));

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}
