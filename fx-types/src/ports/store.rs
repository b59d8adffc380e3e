//! Snapshot store port.
//!
//! Persists the last good rate table as an offline fallback.

use crate::domain::RateSnapshot;
use crate::error::RepoError;

#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync + 'static {
    /// Returns the stored snapshot, or `None` if nothing was saved yet.
    async fn load(&self) -> Result<Option<RateSnapshot>, RepoError>;

    /// Replaces the stored snapshot.
    async fn save(&self, snapshot: &RateSnapshot) -> Result<(), RepoError>;
}
