//! The normalization orchestrator.
//!
//! Drains a queue of match references through fetch, extraction and row
//! building, one at a time. Item failures are isolated into the failed
//! queue; only checkpoint persistence errors abort a run.

use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::checkpoint::{CheckpointStore, FileCheckpointStore};
use super::config::OrchestratorConfig;
use super::failure::FailureRecord;
use super::state::{RunOutcome, RunPhase, RunState, StepError};
use crate::errors::{HarvestError, Result};
use crate::extract::MatchPageExtractor;
use crate::fetch::{Fetcher, SiteConfig};
use crate::model::{MatchRecord, MatchReference};
use crate::observability::{NoOpRunObserver, RunObserver, SpanTimer};
use crate::rows::{NormalizedRows, RowSet};

/// Drives match references through extraction and normalization.
pub struct NormalizationOrchestrator<F, R = NormalizedRows> {
    fetcher: F,
    site: SiteConfig,
    config: OrchestratorConfig,
    extractor: MatchPageExtractor,
    store: Arc<dyn CheckpointStore>,
    observer: Arc<dyn RunObserver>,
    _rows: PhantomData<fn() -> R>,
}

impl<F: Fetcher, R: RowSet> NormalizationOrchestrator<F, R> {
    /// Creates an orchestrator persisting checkpoints under
    /// `config.checkpoint_dir`.
    #[must_use]
    pub fn new(fetcher: F, site: SiteConfig, config: OrchestratorConfig) -> Self {
        let store = Arc::new(FileCheckpointStore::new(config.checkpoint_dir.clone()));
        Self {
            fetcher,
            site,
            config,
            extractor: MatchPageExtractor::new(),
            store,
            observer: Arc::new(NoOpRunObserver),
            _rows: PhantomData,
        }
    }

    /// Replaces the checkpoint store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.store = store;
        self
    }

    /// Sets the run observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Runs `references` in caller order until done or checkpointed.
    pub async fn run(
        &self,
        references: impl IntoIterator<Item = MatchReference>,
    ) -> Result<RunOutcome<R>> {
        self.drive(RunState::new(references)).await
    }

    /// Resumes the stored checkpoint's pending work.
    ///
    /// Previously failed references are carried forward, not retried.
    pub async fn resume(&self) -> Result<RunOutcome<R>> {
        let checkpoint = self
            .store
            .load()
            .await?
            .ok_or_else(|| HarvestError::Config("no checkpoint to resume".to_string()))?;
        info!(
            pending = checkpoint.pending.len(),
            failed = checkpoint.failed.len(),
            "resuming from checkpoint"
        );
        self.drive(RunState::resume(checkpoint)).await
    }

    /// Runs the stored checkpoint's failed references as new work.
    pub async fn retry_failed(&self) -> Result<RunOutcome<R>> {
        let checkpoint = self
            .store
            .load()
            .await?
            .ok_or_else(|| HarvestError::Config("no checkpoint to retry".to_string()))?;
        info!(failed = checkpoint.failed.len(), "retrying failed references");
        self.drive(RunState::new(checkpoint.failed)).await
    }

    /// Steps `state` until it reaches a terminal phase.
    ///
    /// A failed step (rejected checkpoint, unusable pause) ends the run as
    /// [`RunOutcome::Unsaved`], keeping the processed rows and the remainder.
    pub async fn drive(&self, mut state: RunState<R>) -> Result<RunOutcome<R>> {
        while !state.phase.is_terminal() {
            state = match self.step(state).await {
                Ok(next) => next,
                Err(StepError { error, state }) => {
                    return Ok(RunOutcome::Unsaved {
                        checkpoint: state.remainder(),
                        bundle: state.into_bundle(),
                        error,
                    });
                }
            };
        }

        Ok(match state.checkpoint.take() {
            Some(checkpoint) => RunOutcome::Checkpointed {
                checkpoint,
                bundle: state.into_bundle(),
            },
            None => RunOutcome::Done(state.into_bundle()),
        })
    }

    /// Advances the run by one transition.
    ///
    /// Terminal states are returned unchanged. On error the state is handed
    /// back inside the [`StepError`], still in the `Processing` phase.
    pub async fn step(&self, mut state: RunState<R>) -> Result<RunState<R>, StepError<R>> {
        match state.phase {
            RunPhase::Done | RunPhase::Checkpointed => return Ok(state),
            RunPhase::Init => {
                self.observer.on_run_start(state.queue.len());
                state.phase = RunPhase::Processing;
                return Ok(state);
            }
            RunPhase::Processing => {}
        }

        if state.queue.is_empty() {
            state.phase = RunPhase::Done;
            self.observer
                .on_run_complete(state.processed, state.failed.len(), state.elapsed_ms);
            return Ok(state);
        }

        if self.config.pause_due(state.requests) && state.last_pause_at != Some(state.requests) {
            let pause = match self.config.pause() {
                Ok(pause) => pause,
                Err(error) => return Err(StepError { error, state }),
            };
            self.observer
                .on_pause(state.requests, self.config.rate_limit_pause_seconds);
            tokio::time::sleep(pause).await;
            state.last_pause_at = Some(state.requests);
        }

        if let Some(ceiling) = self.config.max_processed {
            if state.processed >= ceiling {
                let checkpoint = state.remainder();
                if let Err(error) = self.store.save(&checkpoint).await {
                    warn!(
                        pending = checkpoint.pending.len(),
                        failed = checkpoint.failed.len(),
                        error = %error,
                        "checkpoint could not be saved"
                    );
                    return Err(StepError { error, state });
                }
                self.observer
                    .on_checkpoint(checkpoint.pending.len(), checkpoint.failed.len());
                state.checkpoint = Some(checkpoint);
                state.phase = RunPhase::Checkpointed;
                return Ok(state);
            }
        }

        let Some(reference) = state.queue.pop_front() else {
            return Ok(state);
        };

        let timer = SpanTimer::start(format!("match:{}", reference.match_id));
        match self.process(&reference).await {
            Ok(record) => {
                state.dimensions.merge(&record);
                state.rows.append(&record);
                state.processed += 1;
                state.requests += 1;
                let duration_ms = timer.finish();
                state.elapsed_ms += duration_ms;
                self.observer.on_match_processed(&reference, duration_ms);
            }
            Err(err) => {
                state.elapsed_ms += timer.finish();
                warn!(match_id = reference.match_id, kind = %err.kind(), error = %err, "match moved to failed queue");
                self.observer
                    .on_match_failed(&reference, err.kind(), &err.to_string());
                state.failures.push(FailureRecord::new(reference.clone(), &err));
                state.failed.push(reference);
            }
        }

        Ok(state)
    }

    async fn process(&self, reference: &MatchReference) -> Result<MatchRecord> {
        let url = reference.url(&self.site.base_url);
        let page = self.fetcher.fetch(&url).await?;
        let record = self.extractor.extract(reference.match_id, &page.text)?;
        debug!(match_id = reference.match_id, maps = record.maps.len(), "match extracted");
        Ok(record)
    }
}
