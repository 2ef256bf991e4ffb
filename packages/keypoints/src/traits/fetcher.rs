//! Content fetcher trait for retrieving article text.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Retrieves readable plain text for a URL.
///
/// Implementations strip markup and boilerplate; the result is used verbatim
/// as the document key points are generated from and checked against.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch `url` and return its readable text.
    async fn extract_content(&self, url: &str) -> FetchResult<String>;
}
