//! Claim verification with a MiniCheck-style classifier.
//!
//! The classifier is served over an OpenAI-compatible chat endpoint (Ollama
//! exposes one under `/v1`) and answers each `Document:/Claim:` prompt
//! with "Yes" or "No".

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};
use tracing::{debug, warn};

use super::retry::with_retry;
use crate::pipeline::prompts::{format_fact_check_prompt, truncate_document};
use crate::traits::ai::FactChecker;
use crate::types::config::{FactCheckConfig, RetryPolicy};
use crate::types::verification::VerificationResult;

/// Fact checker backed by a binary-classification model.
#[derive(Clone)]
pub struct MiniCheckVerifier {
    client: OpenAIClient,
    model: String,
    temperature: f32,
    max_document_chars: usize,
    retry: RetryPolicy,
}

impl MiniCheckVerifier {
    /// Build a verifier from resolved configuration.
    pub fn from_config(config: &FactCheckConfig) -> Self {
        let mut client = OpenAIClient::new(&config.base_url).with_timeout(config.timeout());
        if let Some(key) = &config.api_key {
            client = client.with_api_key(key.expose());
        }

        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_document_chars: config.max_document_chars,
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

    fn build_request(&self, document: &str, claim: &str) -> ChatRequest {
        let document = truncate_document(document, self.max_document_chars);
        ChatRequest::new(&self.model)
            .message(Message::user(format_fact_check_prompt(&document, claim)))
            .temperature(self.temperature)
    }
}

#[async_trait]
impl FactChecker for MiniCheckVerifier {
    async fn check_claim(&self, document: &str, claim: &str) -> VerificationResult {
        let request = self.build_request(document, claim);

        let outcome = with_retry(
            &self.retry,
            "check_claim",
            OpenAIError::is_retryable,
            || self.client.chat_completion(request.clone()),
        )
        .await;

        match outcome {
            Ok(response) => {
                let result = interpret_response(response.content);
                debug!(model = %self.model, verdict = %result.verdict(), "Claim checked");
                result
            }
            Err(e) => {
                warn!(model = %self.model, error = %e, "Claim could not be checked");
                VerificationResult::failed(e)
            }
        }
    }
}

/// Leading whitespace is tolerated when reading the verdict, but the stored
/// response is kept exactly as the model sent it.
fn interpret_response(content: String) -> VerificationResult {
    VerificationResult::from_response(content)
}
