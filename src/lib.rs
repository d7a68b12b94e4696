//! # resilient-fetch
//!
//! A client for paginated, rate-limited REST APIs modeled on GitHub's.
//!
//! ## Features
//!
//! - **Link Header Pagination**: follows `rel="next"` until the last page
//! - **Rate-Limit Waits**: sleeps until `x-ratelimit-reset` when the quota runs out,
//!   then re-sends the same request
//! - **Secondary Limits**: optionally honours `retry-after` and 429 responses
//! - **Cancellation**: aborts in-flight requests and pending waits
//! - **Pluggable Transport**: reqwest by default, any [`http::Transport`] in tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use resilient_fetch::{FetchResult, PaginatingFetcher, RequestSpec, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let fetcher = PaginatingFetcher::new()?;
//!
//!     let spec = RequestSpec::new("https://api.github.com/repos/rust-lang/rust/issues")
//!         .header("Accept", "application/vnd.github+json");
//!
//!     // Every page, first page first
//!     let pages = fetcher.fetch(spec, true).await?.into_pages();
//!     println!("{} pages", pages.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                    PaginatingFetcher                      │
//! │  fetch(spec, follow) → Single(body) | Pages(Vec<body>)    │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────────┬───────────────────┐
//! │  Transport   │      Rate Limit        │    Pagination     │
//! ├──────────────┼────────────────────────┼───────────────────┤
//! │ reqwest      │ x-ratelimit-* headers  │ Link rel="next"   │
//! │ Pacing       │ retry-after            │ URI resolution    │
//! └──────────────┴────────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP transport and rate-limit headers
pub mod http;

/// Link header pagination
pub mod pagination;

/// The request / retry / pagination loop
pub mod fetcher;

/// Settings file
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FetchStage, Result};
pub use fetcher::{FetcherConfig, PaginatingFetcher};
pub use http::{HttpClient, HttpClientConfig, RateLimitStatus, RequestSpec, Transport};
pub use pagination::FetchResult;
pub use tokio_util::sync::CancellationToken;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
