//! Run lifecycle callbacks and timing.

use std::time::Instant;

use crate::errors::FailureKind;
use crate::model::MatchReference;

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}

/// Observability callbacks for orchestrator runs.
pub trait RunObserver: Send + Sync {
    /// Called when a run starts with `queued` references.
    fn on_run_start(&self, queued: usize);

    /// Called after a match was extracted and merged.
    fn on_match_processed(&self, reference: &MatchReference, duration_ms: f64);

    /// Called when a match was moved to the failed queue.
    fn on_match_failed(&self, reference: &MatchReference, kind: FailureKind, error: &str);

    /// Called before the courtesy pause.
    fn on_pause(&self, requests: u64, seconds: f64);

    /// Called after a checkpoint was persisted.
    fn on_checkpoint(&self, pending: usize, failed: usize);

    /// Called when the queue is drained.
    fn on_run_complete(&self, processed: u64, failed: usize, elapsed_ms: f64);
}

/// No-op implementation of [`RunObserver`].
#[derive(Debug, Clone, Default)]
pub struct NoOpRunObserver;

impl RunObserver for NoOpRunObserver {
    fn on_run_start(&self, _queued: usize) {}
    fn on_match_processed(&self, _reference: &MatchReference, _duration_ms: f64) {}
    fn on_match_failed(&self, _reference: &MatchReference, _kind: FailureKind, _error: &str) {}
    fn on_pause(&self, _requests: u64, _seconds: f64) {}
    fn on_checkpoint(&self, _pending: usize, _failed: usize) {}
    fn on_run_complete(&self, _processed: u64, _failed: usize, _elapsed_ms: f64) {}
}

/// Logging-based run observer.
#[derive(Debug, Clone, Default)]
pub struct LoggingRunObserver;

impl RunObserver for LoggingRunObserver {
    fn on_run_start(&self, queued: usize) {
        tracing::info!(queued, "Run started");
    }

    fn on_match_processed(&self, reference: &MatchReference, duration_ms: f64) {
        tracing::info!(match_id = reference.match_id, duration_ms, "Match processed");
    }

    fn on_match_failed(&self, reference: &MatchReference, kind: FailureKind, error: &str) {
        tracing::warn!(
            match_id = reference.match_id,
            link = %reference.link,
            %kind,
            error,
            "Match failed"
        );
    }

    fn on_pause(&self, requests: u64, seconds: f64) {
        tracing::info!(requests, seconds, "Pausing between requests");
    }

    fn on_checkpoint(&self, pending: usize, failed: usize) {
        tracing::info!(pending, failed, "Checkpoint written");
    }

    fn on_run_complete(&self, processed: u64, failed: usize, elapsed_ms: f64) {
        tracing::info!(processed, failed, elapsed_ms, "Run complete");
    }
}
