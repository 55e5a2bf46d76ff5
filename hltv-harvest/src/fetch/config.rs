//! Configuration types for fetching pages from the statistics site.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::{HarvestError, Result};

/// Configuration for HTTP fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Additional headers to include.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_timeout() -> f64 {
    30.0
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) hltv-harvest/0.1".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
        }
    }
}

impl FetchConfig {
    /// Creates a new fetch configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Gets timeout as Duration.
    ///
    /// Zero, negative, non-finite and out-of-range values are rejected.
    pub fn timeout(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .ok()
            .filter(|timeout| !timeout.is_zero())
            .ok_or_else(|| {
                HarvestError::Config(format!(
                    "fetch.timeout_seconds must be a positive number of seconds, got {}",
                    self.timeout_seconds
                ))
            })
    }
}

/// Where the site lives and how its listing pages are addressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site root, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the results listing.
    #[serde(default = "default_results_path")]
    pub results_path: String,
    /// Path of the team rankings page.
    #[serde(default = "default_ranking_path")]
    pub ranking_path: String,
    /// Entries per listing page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_base_url() -> String {
    "https://www.hltv.org".to_string()
}

fn default_results_path() -> String {
    "/results".to_string()
}

fn default_ranking_path() -> String {
    "/ranking/teams/".to_string()
}

fn default_page_size() -> usize {
    100
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            results_path: default_results_path(),
            ranking_path: default_ranking_path(),
            page_size: default_page_size(),
        }
    }
}

impl SiteConfig {
    /// Creates a site configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the listing page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// URL of the results listing at `offset`.
    #[must_use]
    pub fn results_url(&self, offset: usize) -> String {
        format!("{}{}?offset={offset}", self.root(), self.results_path)
    }

    /// URL of a team's results listing at `offset`.
    #[must_use]
    pub fn team_results_url(&self, team_id: u64, offset: usize) -> String {
        format!(
            "{}{}?team={team_id}&offset={offset}",
            self.root(),
            self.results_path
        )
    }

    /// URL of the team rankings page.
    #[must_use]
    pub fn ranking_url(&self) -> String {
        format!("{}{}", self.root(), self.ranking_path)
    }
}
