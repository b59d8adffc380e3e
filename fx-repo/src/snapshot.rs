//! Snapshot store adapters.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use fx_types::{RateSnapshot, RepoError, SnapshotStore};

// ─────────────────────────────────────────────────────────────────────────────
// JSON file store
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps the snapshot as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn load(&self) -> Result<Option<RateSnapshot>, RepoError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot on disk");
                return Ok(None);
            }
            Err(e) => return Err(RepoError::Io(e.to_string())),
        };

        let snapshot: RateSnapshot =
            serde_json::from_str(&raw).map_err(|e| RepoError::Serialization(e.to_string()))?;
        debug!(path = %self.path.display(), last_updated = %snapshot.last_updated, "Loaded snapshot");
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &RateSnapshot) -> Result<(), RepoError> {
        // Ensure target directory exists
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepoError::Io(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| RepoError::Serialization(e.to_string()))?;

        // Write then rename so readers never see a partial file. Each save
        // gets its own temp file; the last rename wins.
        let tmp = self
            .path
            .with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| RepoError::Io(e.to_string()))?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(RepoError::Io(e.to_string()));
        }

        debug!(path = %self.path.display(), "Saved snapshot");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// Process-local store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Option<RateSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `snapshot`.
    pub fn with_snapshot(snapshot: RateSnapshot) -> Self {
        Self {
            inner: Mutex::new(Some(snapshot)),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<RateSnapshot>, RepoError> {
        Ok(self.inner.lock().await.clone())
    }

    async fn save(&self, snapshot: &RateSnapshot) -> Result<(), RepoError> {
        *self.inner.lock().await = Some(snapshot.clone());
        Ok(())
    }
}
