//! Protocol traits for fetching.
//!
//! The crawler and orchestrator only see [`Fetcher`], so tests can swap the
//! network for canned pages.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::TransportError;

/// Result of a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// HTTP status code.
    pub status_code: u16,
    /// Response body as text.
    pub text: String,
    /// Final URL after redirects.
    pub final_url: String,
    /// Time taken to fetch in milliseconds.
    pub duration_ms: f64,
}

impl FetchResult {
    /// Creates a successful result with the given body.
    #[must_use]
    pub fn ok(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            text: text.into(),
            final_url: url.into(),
            duration_ms: 0.0,
        }
    }

    /// Whether the fetch was successful (2xx status).
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Protocol for page fetching.
///
/// Implementations return the body of a 2xx response and a
/// [`TransportError`] for everything else. No retries happen behind this seam.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL and returns the result.
    async fn fetch(&self, url: &str) -> Result<FetchResult, TransportError>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<FetchResult, TransportError> {
        (**self).fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Fetcher for Echo {
        async fn fetch(&self, url: &str) -> Result<FetchResult, TransportError> {
            Ok(FetchResult::ok(url, url.to_uppercase()))
        }
    }

    #[test]
    fn test_fetch_result_is_success() {
        let result = FetchResult::ok("https://example.com", "<html></html>");
        assert!(result.is_success());

        let not_found = FetchResult {
            status_code: 404,
            ..result
        };
        assert!(!not_found.is_success());
    }

    #[tokio::test]
    async fn test_shared_fetcher() {
        let shared: Arc<dyn Fetcher> = Arc::new(Echo);
        let result = shared.fetch("abc").await.unwrap();
        assert_eq!(result.text, "ABC");
        assert_eq!(result.final_url, "abc");
    }
}
