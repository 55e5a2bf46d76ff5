//! Top-level harvest configuration.
//!
//! Groups the fetch, site, orchestrator and logging settings into one
//! document. Every section and field is optional in JSON and falls back to
//! its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{HarvestError, Result};
use crate::fetch::{FetchConfig, SiteConfig};
use crate::observability::LogConfig;
use crate::pipeline::OrchestratorConfig;

/// Configuration for a full harvest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// HTTP client settings.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Site URLs and paging.
    #[serde(default)]
    pub site: SiteConfig,
    /// Rate limiting, ceiling and checkpoint location.
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Log output.
    #[serde(default)]
    pub log: LogConfig,
}

impl HarvestConfig {
    /// Creates a configuration with all defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            HarvestError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&text)
    }

    /// Serializes the configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the fetch section.
    #[must_use]
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Sets the site section.
    #[must_use]
    pub fn with_site(mut self, site: SiteConfig) -> Self {
        self.site = site;
        self
    }

    /// Sets the orchestrator section.
    #[must_use]
    pub fn with_orchestrator(mut self, orchestrator: OrchestratorConfig) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    /// Sets the log section.
    #[must_use]
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Rejects values no run can work with.
    pub fn validate(&self) -> Result<()> {
        if self.site.page_size == 0 {
            return Err(HarvestError::Config("site.page_size must be positive".to_string()));
        }
        self.fetch.timeout()?;
        self.orchestrator.pause()?;
        Ok(())
    }
}
