//! Error types for the chat-completions client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// Chat-completions client errors.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (invalid base URL, client construction failed)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection refused, DNS, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Non-2xx response from the endpoint
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Well-formed response that carried no usable completion
    #[error("API error: {0}")]
    Api(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// Whether a retry of the same request could plausibly succeed.
    ///
    /// Transport failures and HTTP errors are retryable. Decoding and
    /// configuration problems are not: the same bytes come back every time.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::Status { .. } | Self::Api(_)
        )
    }
}
