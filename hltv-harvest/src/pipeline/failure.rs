//! Failure records and run statistics.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::errors::{FailureKind, HarvestError};
use crate::model::MatchReference;

/// Record of one isolated match failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// The reference that failed.
    pub reference: MatchReference,
    /// Failure family.
    pub kind: FailureKind,
    /// Error message.
    pub message: String,
    /// Unix timestamp of the failure.
    pub timestamp: f64,
}

impl FailureRecord {
    /// Creates a failure record for `reference`.
    #[must_use]
    pub fn new(reference: MatchReference, error: &HarvestError) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        Self {
            reference,
            kind: error.kind(),
            message: error.to_string(),
            timestamp: now,
        }
    }

    /// Converts to dictionary.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("match_id".to_string(), serde_json::json!(self.reference.match_id));
        map.insert("link".to_string(), serde_json::json!(self.reference.link));
        map.insert("kind".to_string(), serde_json::json!(self.kind));
        map.insert("message".to_string(), serde_json::json!(self.message));
        map.insert("timestamp".to_string(), serde_json::json!(self.timestamp));
        map
    }
}

/// Counters describing a finished (or stopped) run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Matches extracted and merged.
    pub processed: u64,
    /// Matches moved to the failed queue.
    pub failed: usize,
    /// References still queued.
    pub remaining: usize,
    /// Successful page requests.
    pub requests: u64,
    /// Wall time of the run in milliseconds.
    pub elapsed_ms: f64,
}

impl RunStats {
    /// Returns the success rate over attempted matches.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        let attempted = self.processed as f64 + self.failed as f64;
        if attempted == 0.0 {
            return 0.0;
        }
        self.processed as f64 / attempted
    }

    /// Converts to dictionary.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("processed".to_string(), serde_json::json!(self.processed));
        map.insert("failed".to_string(), serde_json::json!(self.failed));
        map.insert("remaining".to_string(), serde_json::json!(self.remaining));
        map.insert("requests".to_string(), serde_json::json!(self.requests));
        map.insert("elapsed_ms".to_string(), serde_json::json!(self.elapsed_ms));
        map.insert("success_rate".to_string(), serde_json::json!(self.success_rate()));
        map
    }
}
