//! Configuration types for generation, fact-checking and dataset runs.
//!
//! Every value here is resolved once by the caller and handed to a
//! constructor. Nothing in the library reads the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::credentials::ApiKey;

/// Controls the regenerate-and-reverify loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Verify each generation and regenerate when a point is rejected.
    pub auto_check_enabled: bool,

    /// Regenerations allowed after the first generation.
    ///
    /// The loop makes at most `max_regeneration_attempts + 1` generation calls.
    pub max_regeneration_attempts: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            auto_check_enabled: false,
            max_regeneration_attempts: 2,
        }
    }
}

impl ExtractionConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable auto-checking.
    pub fn with_auto_check(mut self, enabled: bool) -> Self {
        self.auto_check_enabled = enabled;
        self
    }

    /// Set the regeneration budget.
    pub fn with_max_regeneration_attempts(mut self, attempts: u32) -> Self {
        self.max_regeneration_attempts = attempts;
        self
    }
}

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_retries: u32,

    /// Pause between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay_ms: 5_000,
        }
    }
}

impl RetryPolicy {
    /// Retry `max_retries` times with no pause. Mostly useful in tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            delay_ms: 0,
        }
    }

    /// Number of attempts actually made.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Settings for the key-point generation model.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,

    /// Bearer token; required by hosted providers
    pub api_key: Option<ApiKey>,

    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub timeout_secs: u64,
    pub retry: RetryPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.2,
            top_p: 0.9,
            timeout_secs: 30,
            retry: RetryPolicy::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for the claim-verification model.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FactCheckConfig {
    /// Base URL of an OpenAI-compatible API (Ollama serves one under `/v1`)
    pub base_url: String,

    /// Bearer token; local servers usually need none
    pub api_key: Option<ApiKey>,

    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,

    /// Documents longer than this many characters are cut before sending.
    pub max_document_chars: usize,

    pub retry: RetryPolicy,
}

impl Default for FactCheckConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            api_key: None,
            model: "bespoke-minicheck".to_string(),
            temperature: 0.1,
            timeout_secs: 60,
            max_document_chars: crate::pipeline::prompts::MAX_DOCUMENT_CHARS,
            retry: RetryPolicy::default(),
        }
    }
}

impl FactCheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for a dataset-wide verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyDatasetConfig {
    /// Persist the dataset after every this many processed entries.
    pub checkpoint_every: usize,

    /// Back up the previous output file before the first save.
    pub backup: bool,

    /// Pause between verified entries, in milliseconds.
    pub document_delay_ms: u64,
}

impl Default for VerifyDatasetConfig {
    fn default() -> Self {
        Self {
            checkpoint_every: 5,
            backup: true,
            document_delay_ms: 0,
        }
    }
}

impl VerifyDatasetConfig {
    pub fn document_delay(&self) -> Duration {
        Duration::from_millis(self.document_delay_ms)
    }
}

/// Options for turning a batch of URLs into dataset entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessOptions {
    /// Attach verification results to each new entry.
    pub verify: bool,

    /// Back up the dataset file before the first save of the run.
    pub backup: bool,

    /// Pause between URLs, in milliseconds.
    pub document_delay_ms: u64,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            verify: false,
            backup: true,
            document_delay_ms: 2_000,
        }
    }
}

impl ProcessOptions {
    pub fn document_delay(&self) -> Duration {
        Duration::from_millis(self.document_delay_ms)
    }
}
