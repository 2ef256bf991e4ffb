//! Minimal OpenAI-compatible chat-completions client
//!
//! Talks to any server exposing `POST {base_url}/chat/completions` in the
//! OpenAI wire format: OpenAI itself, OpenRouter, vLLM, or a local Ollama.
//! Authentication is optional because local servers usually run without it.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{ChatRequest, Message, OpenAIClient};
//!
//! let client = OpenAIClient::new("http://localhost:11434/v1");
//!
//! let response = client
//!     .chat_completion(
//!         ChatRequest::new("bespoke-minicheck")
//!             .message(Message::user("Document: ...\n\nClaim: ..."))
//!             .temperature(0.1),
//!     )
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Default public OpenAI endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI-compatible chat-completions client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    timeout: Duration,
}

impl OpenAIClient {
    /// Create a client for the given base URL (without `/chat/completions`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: None,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Send `Authorization: Bearer <key>` with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Chat completion.
    ///
    /// Returns the content of the first choice. A `null` content is treated
    /// as an empty completion rather than an error.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let mut builder = self
            .http_client
            .post(self.completions_url())
            .timeout(self.timeout)
            .header("Content-Type", "application/json")
            .json(&request);

        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, url = %self.completions_url(), "Chat completion request failed");
            if e.is_timeout() {
                OpenAIError::Timeout(self.timeout)
            } else {
                OpenAIError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "Chat completion API error");
            return Err(OpenAIError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let content = raw
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| OpenAIError::Api("Response contained no choices".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            content_len = content.len(),
            "Chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: raw.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("https://custom.api.com/v1/")
            .with_api_key("sk-test")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(client.base_url(), "https://custom.api.com/v1");
        assert_eq!(client.completions_url(), "https://custom.api.com/v1/chat/completions");
        assert_eq!(client.timeout(), Duration::from_secs(30));
        assert!(client.has_api_key());
    }

    #[test]
    fn test_client_without_key() {
        let client = OpenAIClient::new("http://localhost:11434/v1");
        assert!(!client.has_api_key());
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_retryable() {
        // Port 9 (discard) is closed on CI machines; the connect fails fast.
        let client = OpenAIClient::new("http://127.0.0.1:9").with_timeout(Duration::from_secs(2));
        let err = client
            .chat_completion(ChatRequest::new("m").message(Message::user("hi")))
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
