//! Typed errors for the key-points library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by key-point generation and dataset operations.
///
/// Verification never produces one of these: a claim that cannot be checked
/// is recorded as uncertain instead.
#[derive(Debug, Error)]
pub enum KeyPointsError {
    /// AI service unavailable or failed after all retries
    #[error("AI service error: {0}")]
    AI(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Model answered with nothing usable
    #[error("model returned an empty completion")]
    EmptyCompletion,

    /// Content fetch failed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Dataset persistence failed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Errors that can occur while fetching article content.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Server answered with a non-2xx status
    #[error("HTTP {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Page had no readable text
    #[error("no readable content at: {url}")]
    EmptyContent { url: String },
}

/// Errors from dataset persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File did not hold a dataset
    #[error("invalid dataset JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for key-points operations.
pub type Result<T> = std::result::Result<T, KeyPointsError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
