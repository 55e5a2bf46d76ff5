//! Mock fetchers for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use crate::errors::TransportError;
use crate::fetch::{FetchResult, Fetcher};

#[derive(Debug, Clone)]
enum MockResponse {
    Page(String),
    Status(u16),
    Error(String),
}

/// A fetcher serving canned pages by URL and recording every call.
///
/// Unknown URLs answer with a 404 transport error.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, MockResponse>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    /// Creates a fetcher with no pages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `html` for `url`.
    #[must_use]
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.set_page(url, html);
        self
    }

    /// Answers `url` with an HTTP status error.
    #[must_use]
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.responses
            .lock()
            .insert(url.into(), MockResponse::Status(status));
        self
    }

    /// Answers `url` with a connection-level error.
    #[must_use]
    pub fn with_error(self, url: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .lock()
            .insert(url.into(), MockResponse::Error(message.into()));
        self
    }

    /// Serves `html` for `url`, replacing any previous response.
    pub fn set_page(&self, url: impl Into<String>, html: impl Into<String>) {
        self.responses
            .lock()
            .insert(url.into(), MockResponse::Page(html.into()));
    }

    /// Returns the URLs fetched so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns the number of fetches.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Resets call tracking.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResult, TransportError> {
        self.calls.lock().push(url.to_string());
        let response = self.responses.lock().get(url).cloned();

        match response {
            Some(MockResponse::Page(html)) => Ok(FetchResult::ok(url, html)),
            Some(MockResponse::Status(status)) => Err(TransportError::status(url, status)),
            Some(MockResponse::Error(message)) => Err(TransportError::new(url, message)),
            None => Err(TransportError::status(url, 404)),
        }
    }
}
