//! Key-Point Extraction and Verification Library
//!
//! Builds fine-tuning datasets of (article, key points) pairs and checks
//! every generated key point against its source article.
//!
//! # How verification works
//!
//! - A generated summary is split into claims (one per bullet, or one per
//!   sentence when the model ignored the bullet format)
//! - Each claim goes to a binary classifier together with the article
//! - "Yes…" is accurate, "No…" is inaccurate, anything else is uncertain
//! - With auto-check on, summaries with inaccurate claims are regenerated
//!   until they pass or the attempt budget runs out
//!
//! # Usage
//!
//! ```rust,ignore
//! use keypoints::{Curator, ExtractionConfig, JsonDatasetStore};
//! use keypoints::ai::{MiniCheckVerifier, OpenAiGenerator};
//! use keypoints::fetchers::HttpFetcher;
//!
//! let curator = Curator::new(HttpFetcher::new()?, OpenAiGenerator::from_config(&gen), JsonDatasetStore::new())
//!     .with_fact_checker(Arc::new(MiniCheckVerifier::from_config(&check)))
//!     .with_config(ExtractionConfig::new().with_auto_check(true));
//!
//! let entry = curator.extract_from_url("https://example.com/article", true).await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator abstractions (generator, fact checker, fetcher, store)
//! - [`types`] - Dataset, verification and configuration types
//! - [`pipeline`] - Claim splitting, verification, regeneration and dataset runs
//! - [`ai`] - Model-backed generator and fact checker (`openai` feature)
//! - [`fetchers`] - HTTP article fetcher
//! - [`stores`] - JSON file and in-memory dataset stores
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod error;
pub mod fetchers;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{FetchError, KeyPointsError, Result, StoreError};
pub use traits::{
    ai::{FactChecker, KeyPointGenerator},
    fetcher::ContentFetcher,
    store::{backup_path, verified_output_path, DatasetStore},
};
pub use types::{
    config::{
        ExtractionConfig, FactCheckConfig, GeneratorConfig, ProcessOptions, RetryPolicy,
        VerifyDatasetConfig,
    },
    credentials::{is_plausible_api_key, ApiKey, MIN_API_KEY_LEN},
    dataset::{Dataset, DatasetEntry, DatasetStats, ShareGptRecord, ShareGptTurn, SHAREGPT_SOURCE},
    verification::{Verdict, VerificationResult, VerificationResults, VerifiedPoint},
};

// Re-export pipeline components
pub use pipeline::{
    // Claims and prompts
    clean_references, split_claims, truncate_document, MAX_DOCUMENT_CHARS,
    // Verification
    aggregate, generate_verified, RegenerationOutcome,
    // Dataset runs
    verify_dataset, verify_dataset_with_progress, EntryProgress, EntryStatus, VerificationReport,
    // Workflows
    Curator, ProcessReport, UrlProgress, UrlStatus, ValidationReport,
};

// Re-export implementations
pub use fetchers::HttpFetcher;
pub use stores::{JsonDatasetStore, MemoryDatasetStore};

// Re-export testing utilities
pub use testing::{MockFactChecker, MockFetcher, MockGenerator};
