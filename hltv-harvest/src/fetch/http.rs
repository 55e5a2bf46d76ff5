//! `reqwest` backed fetcher.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::time::Instant;
use tracing::debug;

use super::config::FetchConfig;
use super::protocols::{FetchResult, Fetcher};
use crate::errors::{HarvestError, Result, TransportError};

/// Fetches pages over HTTP with a shared connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Builds a fetcher from configuration.
    ///
    /// Fails when a configured header is not a valid HTTP header or the
    /// client cannot be constructed.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| HarvestError::Config(format!("user agent: {e}")))?;
        headers.insert(USER_AGENT, user_agent);

        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| HarvestError::Config(format!("header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| HarvestError::Config(format!("header '{key}': {e}")))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout()?)
            .default_headers(headers)
            .build()
            .map_err(|e| HarvestError::Config(format!("http client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<FetchResult, TransportError> {
        let start = Instant::now();
        debug!(url, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::new(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::status(url, status.as_u16()));
        }

        let final_url = response.url().to_string();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::new(url, format!("reading body: {e}")))?;

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(url, status = status.as_u16(), duration_ms, bytes = text.len(), "fetched page");

        Ok(FetchResult {
            status_code: status.as_u16(),
            text,
            final_url,
            duration_ms,
        })
    }
}
