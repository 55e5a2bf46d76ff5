//! Explicit run state threaded through the orchestrator.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use super::checkpoint::Checkpoint;
use super::dimensions::DimensionTables;
use super::failure::{FailureRecord, RunStats};
use crate::errors::HarvestError;
use crate::model::MatchReference;
use crate::rows::{NormalizedRows, RowSet};

/// Lifecycle of a run: `Init -> Processing -> {Done, Checkpointed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Queue loaded, nothing attempted.
    Init,
    /// Draining the queue.
    Processing,
    /// The queue is empty.
    Done,
    /// The ceiling was reached and the remainder persisted.
    Checkpointed,
}

impl RunPhase {
    /// Returns true for `Done` and `Checkpointed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Checkpointed)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Processing => write!(f, "processing"),
            Self::Done => write!(f, "done"),
            Self::Checkpointed => write!(f, "checkpointed"),
        }
    }
}

/// Everything a run accumulates. Passed into and returned from each step.
#[derive(Debug, Clone)]
pub struct RunState<R = NormalizedRows> {
    /// Current phase.
    pub phase: RunPhase,
    /// Work queue; drained from the front.
    pub queue: VecDeque<MatchReference>,
    /// References that failed, in failure order.
    pub failed: Vec<MatchReference>,
    /// Details of each failure.
    pub failures: Vec<FailureRecord>,
    /// Deduplicated dimension entities.
    pub dimensions: DimensionTables,
    /// Accumulated fact rows.
    pub rows: R,
    /// Matches extracted and merged.
    pub processed: u64,
    /// Successful page requests.
    pub requests: u64,
    /// Request count at which the last pause happened.
    pub last_pause_at: Option<u64>,
    /// Checkpoint written when the run stopped early.
    pub checkpoint: Option<Checkpoint>,
    /// Accumulated processing time in milliseconds.
    pub elapsed_ms: f64,
}

impl<R: RowSet> RunState<R> {
    /// Creates the initial state over `references`, in caller order.
    pub fn new(references: impl IntoIterator<Item = MatchReference>) -> Self {
        Self {
            phase: RunPhase::Init,
            queue: references.into_iter().collect(),
            failed: Vec::new(),
            failures: Vec::new(),
            dimensions: DimensionTables::new(),
            rows: R::default(),
            processed: 0,
            requests: 0,
            last_pause_at: None,
            checkpoint: None,
            elapsed_ms: 0.0,
        }
    }

    /// Creates a state resuming `checkpoint`: pending work is queued in
    /// drain order and failed references are carried forward.
    #[must_use]
    pub fn resume(checkpoint: Checkpoint) -> Self {
        let mut state = Self::new(checkpoint.pending);
        state.failed = checkpoint.failed;
        state
    }

    /// The checkpoint describing the current remainder.
    #[must_use]
    pub fn remainder(&self) -> Checkpoint {
        Checkpoint::new(self.queue.iter().cloned().collect(), self.failed.clone())
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> RunStats {
        RunStats {
            processed: self.processed,
            failed: self.failed.len(),
            remaining: self.queue.len(),
            requests: self.requests,
            elapsed_ms: self.elapsed_ms,
        }
    }

    /// Consumes the state into the output bundle.
    #[must_use]
    pub fn into_bundle(self) -> HarvestBundle<R> {
        let stats = self.stats();
        HarvestBundle {
            rows: self.rows,
            dimensions: self.dimensions,
            failed: self.failed,
            failures: self.failures,
            stats,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct HarvestBundle<R = NormalizedRows> {
    /// Fact rows.
    pub rows: R,
    /// Dimension tables.
    pub dimensions: DimensionTables,
    /// References that failed.
    pub failed: Vec<MatchReference>,
    /// Failure details.
    pub failures: Vec<FailureRecord>,
    /// Final counters.
    pub stats: RunStats,
}

/// A step that could not complete.
///
/// Carries the state the step was working on, so processed rows and the
/// remaining queue survive the error.
#[derive(Debug)]
pub struct StepError<R = NormalizedRows> {
    /// What went wrong.
    pub error: HarvestError,
    /// The state as it stood when the step failed.
    pub state: RunState<R>,
}

impl<R> StepError<R> {
    /// Splits into the error and the recovered state.
    pub fn into_parts(self) -> (HarvestError, RunState<R>) {
        (self.error, self.state)
    }
}

impl<R> fmt::Display for StepError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step failed in {} phase: {}", self.state.phase, self.error)
    }
}

impl<R: fmt::Debug> std::error::Error for StepError<R> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Terminal result of a run.
#[derive(Debug)]
pub enum RunOutcome<R = NormalizedRows> {
    /// The queue was drained.
    Done(HarvestBundle<R>),
    /// The ceiling was reached; the remainder was persisted.
    Checkpointed {
        /// What was persisted.
        checkpoint: Checkpoint,
        /// What was processed before stopping.
        bundle: HarvestBundle<R>,
    },
    /// The run stopped on an error and its remainder was not persisted,
    /// e.g. the store rejected the checkpoint.
    Unsaved {
        /// The remainder that still needs processing.
        checkpoint: Checkpoint,
        /// What was processed before stopping.
        bundle: HarvestBundle<R>,
        /// Why the run stopped.
        error: HarvestError,
    },
}

impl<R> RunOutcome<R> {
    /// The bundle, whichever way the run ended.
    #[must_use]
    pub fn bundle(&self) -> &HarvestBundle<R> {
        match self {
            Self::Done(bundle)
            | Self::Checkpointed { bundle, .. }
            | Self::Unsaved { bundle, .. } => bundle,
        }
    }

    /// Consumes the outcome into its bundle.
    #[must_use]
    pub fn into_bundle(self) -> HarvestBundle<R> {
        match self {
            Self::Done(bundle)
            | Self::Checkpointed { bundle, .. }
            | Self::Unsaved { bundle, .. } => bundle,
        }
    }

    /// The unfinished work, if the run stopped early, whether or not it was
    /// persisted.
    #[must_use]
    pub fn checkpoint(&self) -> Option<&Checkpoint> {
        match self {
            Self::Done(_) => None,
            Self::Checkpointed { checkpoint, .. } | Self::Unsaved { checkpoint, .. } => {
                Some(checkpoint)
            }
        }
    }

    /// The error that stopped the run before its remainder was persisted.
    #[must_use]
    pub fn error(&self) -> Option<&HarvestError> {
        match self {
            Self::Unsaved { error, .. } => Some(error),
            Self::Done(_) | Self::Checkpointed { .. } => None,
        }
    }
}
