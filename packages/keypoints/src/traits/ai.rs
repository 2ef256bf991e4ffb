//! AI traits for key-point generation and claim verification.
//!
//! Two model roles are involved:
//! - a generator that turns an article into a bulleted key-point list
//! - a fact checker that answers, per claim, whether the article supports it

use async_trait::async_trait;

use crate::error::Result;
use crate::pipeline::verify::aggregate;
use crate::types::verification::{VerificationResult, VerificationResults};

/// Key-point generation service.
///
/// Implementations retry transport failures themselves; an `Err` means the
/// retry budget is spent and the caller should treat the document as having
/// no key points.
#[async_trait]
pub trait KeyPointGenerator: Send + Sync {
    /// Produce a bulleted key-point summary of `document`.
    async fn generate_key_points(&self, document: &str) -> Result<String>;
}

/// Fact-checking service for individual claims.
#[async_trait]
pub trait FactChecker: Send + Sync {
    /// Check one claim against its source document.
    ///
    /// Infallible by contract: transport failures that outlast the retry
    /// budget come back as an uncertain result describing the failure.
    async fn check_claim(&self, document: &str, claim: &str) -> VerificationResult;

    /// Split `key_points` into claims and check each one in order.
    async fn verify_key_points(&self, document: &str, key_points: &str) -> VerificationResults {
        aggregate(self, document, key_points).await
    }
}
