//! Error types for resilient-fetch
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Rate-limit conditions are normally absorbed by the fetcher's retry loop and
//! never reach the caller; the variants below are what is left once a fetch
//! gives up.

use std::fmt;
use thiserror::Error;

/// Where in a fetch a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    /// The caller's original request
    Initial,
    /// A request for a page reached by following a next link (1-based page index)
    PageAdvance { page: usize },
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::Initial => write!(f, "initial fetch"),
            FetchStage::PageAdvance { page } => write!(f, "fetch of page {page}"),
        }
    }
}

/// The main error type for resilient-fetch
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} during {stage}: {body}")]
    HttpStatus {
        status: u16,
        body: String,
        stage: FetchStage,
    },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Page limit ({max_pages}) reached before pagination finished")]
    PageLimitExceeded { max_pages: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request cancelled")]
    Cancelled,

    #[error("{source} during {stage}")]
    Staged {
        stage: FetchStage,
        source: Box<Error>,
    },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response during {stage}: {message}")]
    Decode { message: String, stage: FetchStage },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>, stage: FetchStage) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
            stage,
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>, stage: FetchStage) -> Self {
        Self::Decode {
            message: message.into(),
            stage,
        }
    }

    /// Tag an error with the fetch stage it happened in.
    ///
    /// Errors that already carry a stage, and cancellation, are left as they are.
    pub fn in_stage(self, stage: FetchStage) -> Self {
        match self {
            Error::HttpStatus { .. }
            | Error::Decode { .. }
            | Error::Staged { .. }
            | Error::Cancelled => self,
            other => Error::Staged {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Stage a fetch failure happened in, if known
    pub fn stage(&self) -> Option<FetchStage> {
        match self {
            Error::HttpStatus { stage, .. }
            | Error::Decode { stage, .. }
            | Error::Staged { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Status code attached to this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            Error::Staged { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Check if this error came from cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type alias for resilient-fetch
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
