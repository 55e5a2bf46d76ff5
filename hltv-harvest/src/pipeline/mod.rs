//! Normalization runs.
//!
//! This module provides:
//! - [`NormalizationOrchestrator`], the queue-draining state machine
//! - Explicit [`RunState`] and [`RunOutcome`] values
//! - Dimension deduplication
//! - Replace-only checkpoint stores
//! - Failure records and run statistics

mod checkpoint;
mod config;
mod dimensions;
mod failure;
mod orchestrator;
mod state;

mod integration_tests;

pub use checkpoint::{
    Checkpoint, CheckpointStore, FileCheckpointStore, InMemoryCheckpointStore, FAILED_FILE,
    PENDING_FILE,
};
pub use config::OrchestratorConfig;
pub use dimensions::DimensionTables;
pub use failure::{FailureRecord, RunStats};
pub use orchestrator::NormalizationOrchestrator;
pub use state::{HarvestBundle, RunOutcome, RunPhase, RunState, StepError};
