//! Orchestrator configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::{HarvestError, Result};

/// Configuration for a normalization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Pause after every this many successful requests; zero disables pausing.
    #[serde(default = "default_rate_limit_every")]
    pub rate_limit_every: u64,
    /// Length of the courtesy pause in seconds.
    #[serde(default = "default_rate_limit_pause")]
    pub rate_limit_pause_seconds: f64,
    /// Stop and checkpoint once this many matches were processed.
    #[serde(default)]
    pub max_processed: Option<u64>,
    /// Directory holding the checkpoint files.
    #[serde(default = "default_checkpoint_dir")]
    pub checkpoint_dir: PathBuf,
}

fn default_rate_limit_every() -> u64 {
    15
}

fn default_rate_limit_pause() -> f64 {
    15.0
}

fn default_checkpoint_dir() -> PathBuf {
    PathBuf::from("checkpoints")
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            rate_limit_every: default_rate_limit_every(),
            rate_limit_pause_seconds: default_rate_limit_pause(),
            max_processed: None,
            checkpoint_dir: default_checkpoint_dir(),
        }
    }
}

impl OrchestratorConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rate-limit modulus and pause length.
    #[must_use]
    pub fn with_rate_limit(mut self, every: u64, pause_seconds: f64) -> Self {
        self.rate_limit_every = every;
        self.rate_limit_pause_seconds = pause_seconds;
        self
    }

    /// Sets the processing ceiling.
    #[must_use]
    pub fn with_max_processed(mut self, max: u64) -> Self {
        self.max_processed = Some(max);
        self
    }

    /// Sets the checkpoint directory.
    #[must_use]
    pub fn with_checkpoint_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.checkpoint_dir = dir.into();
        self
    }

    /// Gets the pause as Duration.
    ///
    /// Negative, non-finite and out-of-range values are rejected.
    pub fn pause(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.rate_limit_pause_seconds).map_err(|e| {
            HarvestError::Config(format!(
                "orchestrator.rate_limit_pause_seconds {}: {e}",
                self.rate_limit_pause_seconds
            ))
        })
    }

    /// Whether a pause is due at `requests` successful requests.
    #[must_use]
    pub fn pause_due(&self, requests: u64) -> bool {
        self.rate_limit_every > 0 && requests > 0 && requests % self.rate_limit_every == 0
    }
}
