//! Checkpoint persistence.
//!
//! A checkpoint is the unfinished remainder of a run: the pending queue in
//! drain order and the failed references. Saving always replaces whatever
//! was stored before.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::Result;
use crate::model::MatchReference;

/// File holding the pending references.
pub const PENDING_FILE: &str = "pending_matches.json";
/// File holding the failed references.
pub const FAILED_FILE: &str = "failed_matches.json";

/// Unfinished work of a stopped run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// References not yet attempted, front first.
    pub pending: Vec<MatchReference>,
    /// References that failed, in failure order.
    pub failed: Vec<MatchReference>,
}

impl Checkpoint {
    /// Creates a checkpoint.
    #[must_use]
    pub fn new(pending: Vec<MatchReference>, failed: Vec<MatchReference>) -> Self {
        Self { pending, failed }
    }

    /// Returns true if there is nothing to resume or retry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.failed.is_empty()
    }
}

/// Protocol for checkpoint storage backends.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Persists `checkpoint`, replacing any previous one.
    async fn save(&self, checkpoint: &Checkpoint) -> Result<()>;

    /// Loads the stored checkpoint, if any.
    async fn load(&self) -> Result<Option<Checkpoint>>;
}

/// Stores checkpoints as two JSON arrays in a directory.
#[derive(Debug, Clone)]
pub struct FileCheckpointStore {
    dir: PathBuf,
}

impl FileCheckpointStore {
    /// Creates a store rooted at `dir`. The directory is created on save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Gets the checkpoint directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn tmp_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.tmp"))
    }

    async fn stage(&self, name: &str, references: &[MatchReference]) -> Result<()> {
        let body = serde_json::to_vec_pretty(references)?;
        tokio::fs::write(self.tmp_path(name), body).await?;
        Ok(())
    }

    async fn discard_staged(&self) {
        for name in [PENDING_FILE, FAILED_FILE] {
            let _ = tokio::fs::remove_file(self.tmp_path(name)).await;
        }
    }

    async fn read(&self, name: &str) -> Result<Option<Vec<MatchReference>>> {
        let path = self.dir.join(name);
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(Some(serde_json::from_slice(&body)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl CheckpointStore for FileCheckpointStore {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Both files are fully written before either replaces the stored one.
        let staged = match self.stage(PENDING_FILE, &checkpoint.pending).await {
            Ok(()) => self.stage(FAILED_FILE, &checkpoint.failed).await,
            Err(e) => Err(e),
        };
        if let Err(e) = staged {
            self.discard_staged().await;
            return Err(e);
        }

        for name in [PENDING_FILE, FAILED_FILE] {
            tokio::fs::rename(self.tmp_path(name), self.dir.join(name)).await?;
        }
        debug!(
            dir = %self.dir.display(),
            pending = checkpoint.pending.len(),
            failed = checkpoint.failed.len(),
            "checkpoint saved"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<Checkpoint>> {
        let pending = self.read(PENDING_FILE).await?;
        let failed = self.read(FAILED_FILE).await?;
        if pending.is_none() && failed.is_none() {
            return Ok(None);
        }
        Ok(Some(Checkpoint::new(
            pending.unwrap_or_default(),
            failed.unwrap_or_default(),
        )))
    }
}

/// In-memory checkpoint store.
#[derive(Debug, Default)]
pub struct InMemoryCheckpointStore {
    slot: Mutex<Option<Checkpoint>>,
}

impl InMemoryCheckpointStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn save(&self, checkpoint: &Checkpoint) -> Result<()> {
        *self.slot.lock() = Some(checkpoint.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<Checkpoint>> {
        Ok(self.slot.lock().clone())
    }
}
