//! Integration tests for orchestrator runs.

#[cfg(test)]
mod tests {
    use crate::errors::{FailureKind, HarvestError, Result};
    use crate::fetch::SiteConfig;
    use crate::model::MatchReference;
    use crate::observability::RunObserver;
    use crate::pipeline::{
        Checkpoint, CheckpointStore, FileCheckpointStore, InMemoryCheckpointStore,
        NormalizationOrchestrator, OrchestratorConfig, RunOutcome, RunPhase, RunState, StepError,
    };
    use async_trait::async_trait;
    use crate::rows::{DenormalizedRows, NormalizedRows, RowSet};
    use crate::testing::{references, MatchPageFixture, MockFetcher, TEAM1_ID, TEAM2_ID};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct CountingObserver {
        pauses: AtomicUsize,
        processed: Mutex<Vec<u64>>,
        failed: Mutex<Vec<u64>>,
        checkpoints: AtomicUsize,
    }

    impl RunObserver for CountingObserver {
        fn on_run_start(&self, _queued: usize) {}

        fn on_match_processed(&self, reference: &MatchReference, _duration_ms: f64) {
            self.processed.lock().push(reference.match_id);
        }

        fn on_match_failed(&self, reference: &MatchReference, _kind: FailureKind, _error: &str) {
            self.failed.lock().push(reference.match_id);
        }

        fn on_pause(&self, _requests: u64, _seconds: f64) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
        }

        fn on_checkpoint(&self, _pending: usize, _failed: usize) {
            self.checkpoints.fetch_add(1, Ordering::SeqCst);
        }

        fn on_run_complete(&self, _processed: u64, _failed: usize, _elapsed_ms: f64) {}
    }

    /// Store whose disk is always full.
    #[derive(Debug, Default)]
    struct FullDiskStore;

    #[async_trait]
    impl CheckpointStore for FullDiskStore {
        async fn save(&self, _checkpoint: &Checkpoint) -> Result<()> {
            Err(HarvestError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }

        async fn load(&self) -> Result<Option<Checkpoint>> {
            Ok(None)
        }
    }

    fn site() -> SiteConfig {
        SiteConfig::new()
    }

    /// Serves a valid match page for every reference except `failing`.
    fn fetcher_for(refs: &[MatchReference], failing: &[u64]) -> Arc<MockFetcher> {
        let fetcher = MockFetcher::new();
        let page = MatchPageFixture::new().render();
        for reference in refs.iter().filter(|r| !failing.contains(&r.match_id)) {
            fetcher.set_page(reference.url(&site().base_url), page.clone());
        }
        Arc::new(fetcher)
    }

    fn config() -> OrchestratorConfig {
        OrchestratorConfig::new().with_rate_limit(15, 0.0)
    }

    fn orchestrator(
        fetcher: &Arc<MockFetcher>,
        config: OrchestratorConfig,
        store: Arc<dyn CheckpointStore>,
        observer: Arc<CountingObserver>,
    ) -> NormalizationOrchestrator<Arc<MockFetcher>> {
        NormalizationOrchestrator::new(Arc::clone(fetcher), site(), config)
            .with_store(store)
            .with_observer(observer)
    }

    fn ids(refs: &[MatchReference]) -> Vec<u64> {
        refs.iter().map(|r| r.match_id).collect()
    }

    #[tokio::test]
    async fn test_ceiling_checkpoints_remainder() {
        let refs = references(1, 20);
        let fetcher = fetcher_for(&refs, &[]);
        let store = Arc::new(InMemoryCheckpointStore::new());
        let observer = Arc::new(CountingObserver::default());
        let orch = orchestrator(
            &fetcher,
            config().with_max_processed(10),
            store.clone(),
            observer.clone(),
        );

        let outcome = orch.run(refs).await.unwrap();

        let RunOutcome::Checkpointed { checkpoint, bundle } = outcome else {
            panic!("expected a checkpoint");
        };
        assert_eq!(ids(&checkpoint.pending), (11..=20).collect::<Vec<_>>());
        assert!(checkpoint.failed.is_empty());
        assert_eq!(bundle.stats.processed, 10);
        assert_eq!(bundle.rows.match_count(), 10);
        assert_eq!(fetcher.call_count(), 10);
        assert_eq!(observer.pauses.load(Ordering::SeqCst), 0);
        assert_eq!(observer.checkpoints.load(Ordering::SeqCst), 1);
        assert_eq!(store.load().await.unwrap(), Some(checkpoint));
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let refs = references(1, 3);
        let fetcher = fetcher_for(&refs, &[2]);
        let observer = Arc::new(CountingObserver::default());
        let orch = orchestrator(
            &fetcher,
            config(),
            Arc::new(InMemoryCheckpointStore::new()),
            observer.clone(),
        );

        let outcome = orch.run(refs.clone()).await.unwrap();
        assert!(outcome.checkpoint().is_none());

        let bundle = outcome.into_bundle();
        assert_eq!(bundle.rows.match_count(), 2);
        assert_eq!(ids(&bundle.failed), vec![2]);
        assert_eq!(bundle.failures.len(), 1);
        assert_eq!(bundle.failures[0].kind, FailureKind::Transport);
        assert_eq!(bundle.stats.processed, 2);
        assert_eq!(bundle.stats.requests, 2);
        assert_eq!(*observer.processed.lock(), vec![1, 3]);
        assert_eq!(*observer.failed.lock(), vec![2]);
    }

    #[tokio::test]
    async fn test_malformed_page_is_extraction_failure() {
        let refs = references(1, 2);
        let fetcher = fetcher_for(&refs, &[]);
        fetcher.set_page(refs[0].url(&site().base_url), "<html><body>rate limited</body></html>");
        let orch = orchestrator(
            &fetcher,
            config(),
            Arc::new(InMemoryCheckpointStore::new()),
            Arc::new(CountingObserver::default()),
        );

        let bundle = orch.run(refs).await.unwrap().into_bundle();
        assert_eq!(bundle.failures[0].kind, FailureKind::Extraction);
        assert_eq!(bundle.failures[0].reference.match_id, 1);
        assert_eq!(bundle.rows.matches[0].id, 2);
    }

    #[tokio::test]
    async fn test_checkpoint_round_trip_preserves_drain_order() {
        let dir = tempfile::tempdir().unwrap();
        let refs = references(1, 5);
        let fetcher = fetcher_for(&refs, &[]);
        let store: Arc<dyn CheckpointStore> = Arc::new(FileCheckpointStore::new(dir.path()));

        let first = orchestrator(
            &fetcher,
            config().with_max_processed(2),
            store.clone(),
            Arc::new(CountingObserver::default()),
        );
        let outcome = first.run(refs.clone()).await.unwrap();
        assert_eq!(ids(&outcome.checkpoint().unwrap().pending), vec![3, 4, 5]);

        fetcher.reset();
        let observer = Arc::new(CountingObserver::default());
        let second = orchestrator(&fetcher, config(), store, observer.clone());
        let outcome = second.resume().await.unwrap();

        assert!(matches!(outcome, RunOutcome::Done(_)));
        assert_eq!(*observer.processed.lock(), vec![3, 4, 5]);
        let expected: Vec<String> = refs[2..]
            .iter()
            .map(|r| r.url(&site().base_url))
            .collect();
        assert_eq!(fetcher.calls(), expected);
    }

    #[tokio::test]
    async fn test_resume_carries_failed_and_retry_runs_them() {
        let refs = references(1, 4);
        let fetcher = fetcher_for(&refs, &[2]);
        let store: Arc<dyn CheckpointStore> = Arc::new(InMemoryCheckpointStore::new());

        let orch = orchestrator(
            &fetcher,
            config().with_max_processed(2),
            store.clone(),
            Arc::new(CountingObserver::default()),
        );
        let outcome = orch.run(refs.clone()).await.unwrap();
        let checkpoint = outcome.checkpoint().unwrap().clone();
        assert_eq!(checkpoint, Checkpoint::new(vec![refs[3].clone()], vec![refs[1].clone()]));

        // The failed match is carried through a resume untouched.
        let resumed = orchestrator(&fetcher, config(), store.clone(), Arc::new(CountingObserver::default()))
            .resume()
            .await
            .unwrap()
            .into_bundle();
        assert_eq!(resumed.stats.processed, 1);
        assert_eq!(ids(&resumed.failed), vec![2]);

        fetcher.set_page(refs[1].url(&site().base_url), MatchPageFixture::new().render());
        let retried = orchestrator(&fetcher, config(), store, Arc::new(CountingObserver::default()))
            .retry_failed()
            .await
            .unwrap()
            .into_bundle();
        assert_eq!(retried.rows.matches[0].id, 2);
        assert!(retried.failed.is_empty());
    }

    #[tokio::test]
    async fn test_resume_without_checkpoint_is_error() {
        let fetcher = Arc::new(MockFetcher::new());
        let orch = orchestrator(
            &fetcher,
            config(),
            Arc::new(InMemoryCheckpointStore::new()),
            Arc::new(CountingObserver::default()),
        );
        assert!(orch.resume().await.is_err());
    }

    #[tokio::test]
    async fn test_pause_once_per_request_count() {
        let refs = references(1, 18);
        // 16 and 17 fail right after the 15th success, then 18 succeeds.
        let fetcher = fetcher_for(&refs, &[16, 17]);
        let observer = Arc::new(CountingObserver::default());
        let orch = orchestrator(
            &fetcher,
            config(),
            Arc::new(InMemoryCheckpointStore::new()),
            observer.clone(),
        );

        let bundle = orch.run(refs).await.unwrap().into_bundle();
        assert_eq!(bundle.stats.requests, 16);
        assert_eq!(observer.pauses.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dimensions_deduplicated_across_matches() {
        let refs = references(1, 3);
        let fetcher = fetcher_for(&refs, &[]);
        let orch = orchestrator(
            &fetcher,
            config(),
            Arc::new(InMemoryCheckpointStore::new()),
            Arc::new(CountingObserver::default()),
        );

        let bundle = orch.run(refs).await.unwrap().into_bundle();
        assert_eq!(bundle.dimensions.teams.len(), 2);
        assert!(bundle.dimensions.teams.contains_key(&TEAM1_ID));
        assert!(bundle.dimensions.teams.contains_key(&TEAM2_ID));
        assert_eq!(bundle.dimensions.events.len(), 1);
        assert_eq!(bundle.dimensions.players.len(), 10);
        assert_eq!(bundle.rows.maps.len(), 12);
    }

    #[tokio::test]
    async fn test_explicit_steps() {
        let refs = references(1, 1);
        let fetcher = fetcher_for(&refs, &[]);
        let orch = orchestrator(
            &fetcher,
            config(),
            Arc::new(InMemoryCheckpointStore::new()),
            Arc::new(CountingObserver::default()),
        );

        let state: RunState<NormalizedRows> = RunState::new(refs);
        let state = orch.step(state).await.unwrap();
        assert_eq!(state.phase, RunPhase::Processing);
        assert_eq!(state.processed, 0);

        let state = orch.step(state).await.unwrap();
        assert_eq!(state.processed, 1);
        assert!(state.queue.is_empty());

        let state = orch.step(state).await.unwrap();
        assert_eq!(state.phase, RunPhase::Done);

        let state = orch.step(state).await.unwrap();
        assert_eq!(state.phase, RunPhase::Done);
    }

    #[tokio::test]
    async fn test_rejected_checkpoint_keeps_processed_work() {
        let refs = references(1, 20);
        let fetcher = fetcher_for(&refs, &[]);
        let orch = orchestrator(
            &fetcher,
            config().with_max_processed(10),
            Arc::new(FullDiskStore),
            Arc::new(CountingObserver::default()),
        );

        let outcome = orch.run(refs).await.unwrap();

        assert!(matches!(outcome.error(), Some(HarvestError::Io(_))));
        let RunOutcome::Unsaved { checkpoint, bundle, .. } = outcome else {
            panic!("expected an unsaved checkpoint");
        };
        assert_eq!(ids(&checkpoint.pending), (11..=20).collect::<Vec<_>>());
        assert_eq!(bundle.stats.processed, 10);
        assert_eq!(bundle.rows.match_count(), 10);
        assert_eq!(bundle.dimensions.teams.len(), 2);
        assert_eq!(fetcher.call_count(), 10);
    }

    #[tokio::test]
    async fn test_failed_step_returns_state() {
        let refs = references(1, 4);
        let fetcher = fetcher_for(&refs, &[2]);
        let orch = orchestrator(
            &fetcher,
            config().with_max_processed(2),
            Arc::new(FullDiskStore),
            Arc::new(CountingObserver::default()),
        );

        // Init, then matches 1, 2 (fails) and 3.
        let mut state: RunState<NormalizedRows> = RunState::new(refs);
        for _ in 0..4 {
            state = orch.step(state).await.unwrap();
        }
        assert_eq!(state.processed, 2);

        let StepError { error, state } = orch.step(state).await.unwrap_err();
        assert!(matches!(error, HarvestError::Io(_)));
        assert_eq!(state.phase, RunPhase::Processing);
        assert_eq!(ids(&state.remainder().pending), vec![4]);
        assert_eq!(ids(&state.remainder().failed), vec![2]);
        assert_eq!(state.rows.match_count(), 2);
    }

    #[tokio::test]
    async fn test_unusable_pause_stops_without_losing_rows() {
        let refs = references(1, 3);
        let fetcher = fetcher_for(&refs, &[]);
        let orch = orchestrator(
            &fetcher,
            OrchestratorConfig::new().with_rate_limit(1, f64::NAN),
            Arc::new(InMemoryCheckpointStore::new()),
            Arc::new(CountingObserver::default()),
        );

        let outcome = orch.run(refs).await.unwrap();

        assert!(matches!(outcome.error(), Some(HarvestError::Config(_))));
        assert_eq!(ids(&outcome.checkpoint().unwrap().pending), vec![2, 3]);
        assert_eq!(outcome.bundle().rows.match_count(), 1);
    }

    #[tokio::test]
    async fn test_denormalized_row_set() {
        let refs = references(1, 2);
        let fetcher = fetcher_for(&refs, &[]);
        let orch: NormalizationOrchestrator<_, DenormalizedRows> =
            NormalizationOrchestrator::new(Arc::clone(&fetcher), site(), config())
                .with_store(Arc::new(InMemoryCheckpointStore::new()));

        let bundle = orch.run(refs).await.unwrap().into_bundle();
        assert_eq!(bundle.rows.matches.len(), 2);
        assert_eq!(bundle.rows.matches[0].team1_name, "Natus Vincere");
    }
}
