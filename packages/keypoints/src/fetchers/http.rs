//! HTTP content fetcher - reqwest for transport, scraper for HTML parsing.
//!
//! Limitations:
//! - No JavaScript rendering (static HTML only)

use async_trait::async_trait;
use scraper::Html;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::ContentFetcher;

/// Browser-like User-Agent; many news sites refuse obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Elements whose text never belongs to the article.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "iframe", "noscript"];

/// Fetches a page and flattens its visible text into one line.
///
/// # Example
///
/// ```rust,ignore
/// use keypoints::fetchers::HttpFetcher;
///
/// let fetcher = HttpFetcher::new()?;
/// let text = fetcher.extract_content("https://example.com/article").await?;
/// ```
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a 30 second timeout.
    pub fn new() -> FetchResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn extract_content(&self, url: &str) -> FetchResult<String> {
        let parsed = validate_url(url)?;

        debug!(url = %parsed, "Fetching article");
        let response = self.client.get(parsed.clone()).send().await.map_err(|e| {
            warn!(url = %parsed, error = %e, "HTTP request failed");
            FetchError::Http(Box::new(e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        let text = html_to_text(&html);
        if text.is_empty() {
            return Err(FetchError::EmptyContent {
                url: url.to_string(),
            });
        }

        debug!(url = %parsed, chars = text.len(), "Extracted article text");
        Ok(text)
    }
}

/// Accept only absolute `http`/`https` URLs.
pub fn validate_url(url: &str) -> FetchResult<Url> {
    let invalid = || FetchError::InvalidUrl {
        url: url.to_string(),
    };
    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }
    Ok(parsed)
}

/// Visible text of an HTML document, whitespace-trimmed fragments joined
/// by single spaces.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| SKIPPED_ELEMENTS.contains(&el.name()))
            });
            if hidden {
                return None;
            }
            let text = text.trim();
            (!text.is_empty()).then_some(text)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_strips_boilerplate() {
        let html = r#"<html><head><title>News</title><style>p { color: red }</style></head>
            <body>
              <nav><a href="/">Home</a></nav>
              <article><h1>Headline</h1>
                <p>The sky is  <b>blue</b>.</p>
                <script>track()</script>
              </article>
              <iframe src="ad"></iframe>
              <footer>Copyright</footer>
            </body></html>"#;

        assert_eq!(html_to_text(html), "News Headline The sky is blue .");
    }

    #[test]
    fn test_html_to_text_empty_page() {
        assert_eq!(html_to_text("<html><body><script>x()</script></body></html>"), "");
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/a").is_ok());
        assert!(validate_url("  http://example.com ").is_ok());
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(FetchError::InvalidUrl { .. })
        ));
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("example.com/path").is_err());
    }

    #[tokio::test]
    async fn test_invalid_url_rejected_before_request() {
        let fetcher = HttpFetcher::new().unwrap();
        let result = fetcher.extract_content("javascript:alert(1)").await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }
}
