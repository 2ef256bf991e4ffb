//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the key-points
//! library without making real model or network calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{FetchError, FetchResult, KeyPointsError, Result};
use crate::traits::{
    ai::{FactChecker, KeyPointGenerator},
    fetcher::ContentFetcher,
};
use crate::types::verification::VerificationResult;

// =============================================================================
// MockGenerator
// =============================================================================

/// A key-point generator that replays a scripted sequence of responses.
///
/// Each call consumes the next scripted step. Once the script runs out,
/// every further call fails.
#[derive(Default, Clone)]
pub struct MockGenerator {
    script: Arc<RwLock<VecDeque<Option<String>>>>,
    documents: Arc<RwLock<Vec<String>>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful generation.
    pub fn then_return(self, key_points: impl Into<String>) -> Self {
        self.script
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Some(key_points.into()));
        self
    }

    /// Queue a failed generation.
    pub fn then_fail(self) -> Self {
        self.script
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(None);
        self
    }

    /// Number of generation calls made.
    pub fn call_count(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Documents passed to each call, in order.
    pub fn documents(&self) -> Vec<String> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl KeyPointGenerator for MockGenerator {
    async fn generate_key_points(&self, document: &str) -> Result<String> {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(document.to_string());

        let step = self
            .script
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match step {
            Some(Some(text)) => Ok(text),
            Some(None) => Err(KeyPointsError::AI("mock generation failure".into())),
            None => Err(KeyPointsError::AI("mock generator script exhausted".into())),
        }
    }
}

// =============================================================================
// MockFactChecker
// =============================================================================

/// Record of a call made to the mock fact checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCheckCall {
    pub document: String,
    pub claim: String,
}

#[derive(Debug, Clone)]
enum Canned {
    Response(String),
    Failure(String),
}

/// A fact checker with canned responses per claim.
///
/// Claims without a canned response get the default response, which is
/// `"Yes"` unless overridden.
#[derive(Clone)]
pub struct MockFactChecker {
    responses: Arc<RwLock<HashMap<String, Canned>>>,
    default_response: String,
    calls: Arc<RwLock<Vec<MockCheckCall>>>,
}

impl Default for MockFactChecker {
    fn default() -> Self {
        Self {
            responses: Arc::default(),
            default_response: "Yes".to_string(),
            calls: Arc::default(),
        }
    }
}

impl MockFactChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `claim` with `response`.
    pub fn with_response(self, claim: impl Into<String>, response: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(claim.into(), Canned::Response(response.into()));
        self
    }

    /// Fail every check of `claim` as if retries were exhausted.
    pub fn with_failure(self, claim: impl Into<String>, reason: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(claim.into(), Canned::Failure(reason.into()));
        self
    }

    /// Response for claims without a canned answer.
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<MockCheckCall> {
        self.calls
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[async_trait]
impl FactChecker for MockFactChecker {
    async fn check_claim(&self, document: &str, claim: &str) -> VerificationResult {
        self.calls
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MockCheckCall {
                document: document.to_string(),
                claim: claim.to_string(),
            });

        let canned = self
            .responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(claim)
            .cloned();

        match canned {
            Some(Canned::Response(response)) => VerificationResult::from_response(response),
            Some(Canned::Failure(reason)) => VerificationResult::failed(reason),
            None => VerificationResult::from_response(self.default_response.clone()),
        }
    }
}

// =============================================================================
// MockFetcher
// =============================================================================

/// A content fetcher serving predefined pages.
///
/// Unknown URLs fail with a 404 status.
#[derive(Default, Clone)]
pub struct MockFetcher {
    pages: Arc<RwLock<HashMap<String, String>>>,
    fetched: Arc<RwLock<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `url`.
    pub fn with_page(self, url: impl Into<String>, content: impl Into<String>) -> Self {
        self.pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), content.into());
        self
    }

    /// URLs requested so far, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ContentFetcher for MockFetcher {
    async fn extract_content(&self, url: &str) -> FetchResult<String> {
        self.fetched
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}
