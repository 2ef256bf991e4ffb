//! Key-point generation over an OpenAI-compatible chat API.
//!
//! # Example
//!
//! ```rust,ignore
//! use keypoints::ai::OpenAiGenerator;
//! use keypoints::GeneratorConfig;
//!
//! let generator = OpenAiGenerator::from_config(&GeneratorConfig {
//!     api_key: Some("sk-...".into()),
//!     ..Default::default()
//! });
//! let key_points = generator.generate_key_points(&article).await?;
//! ```

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};
use tracing::debug;

use super::retry::with_retry;
use crate::error::{KeyPointsError, Result};
use crate::pipeline::clean::clean_references;
use crate::pipeline::prompts::GENERATE_KEY_POINTS_PROMPT;
use crate::traits::ai::KeyPointGenerator;
use crate::types::config::{GeneratorConfig, RetryPolicy};

/// Generator backed by any OpenAI-compatible chat-completions endpoint.
///
/// Completions have citation markers stripped before they are returned.
#[derive(Clone)]
pub struct OpenAiGenerator {
    client: OpenAIClient,
    model: String,
    temperature: f32,
    top_p: f32,
    retry: RetryPolicy,
}

impl OpenAiGenerator {
    /// Build a generator from resolved configuration.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut client = OpenAIClient::new(&config.base_url).with_timeout(config.timeout());
        if let Some(key) = &config.api_key {
            client = client.with_api_key(key.expose());
        }

        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            retry: config.retry,
        }
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, document: &str) -> ChatRequest {
        ChatRequest::new(&self.model)
            .message(Message::system(GENERATE_KEY_POINTS_PROMPT))
            .message(Message::user(document))
            .temperature(self.temperature)
            .top_p(self.top_p)
    }
}

#[async_trait]
impl KeyPointGenerator for OpenAiGenerator {
    async fn generate_key_points(&self, document: &str) -> Result<String> {
        let request = self.build_request(document);

        let response = with_retry(
            &self.retry,
            "generate_key_points",
            OpenAIError::is_retryable,
            || self.client.chat_completion(request.clone()),
        )
        .await
        .map_err(|e| KeyPointsError::AI(Box::new(e)))?;

        let key_points = clean_references(&response.content);
        if key_points.is_empty() {
            return Err(KeyPointsError::EmptyCompletion);
        }

        debug!(
            model = %self.model,
            chars = key_points.len(),
            "Generated key points"
        );
        Ok(key_points)
    }
}
