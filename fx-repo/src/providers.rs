//! Rate provider adapters.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use fx_types::{ProviderError, RateProvider, RateTable};

/// Serves a fixed table. Defaults to the development reference rates.
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    table: RateTable,
}

impl StaticRateProvider {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }

    pub fn reference() -> Self {
        Self::new(RateTable::reference())
    }
}

impl Default for StaticRateProvider {
    fn default() -> Self {
        Self::reference()
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn fetch_rates(&self) -> Result<RateTable, ProviderError> {
        Ok(self.table.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Reads a nested JSON rate table (`{"USD": {"EUR": 0.85}}`) from disk on every fetch.
#[derive(Debug, Clone)]
pub struct FileRateProvider {
    path: PathBuf,
}

impl FileRateProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RateProvider for FileRateProvider {
    async fn fetch_rates(&self) -> Result<RateTable, ProviderError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            ProviderError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;

        let table: RateTable = serde_json::from_str(&raw)
            .map_err(|e| ProviderError::Malformed(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), entries = table.len(), "Loaded rate file");
        Ok(table)
    }

    fn name(&self) -> &str {
        "file"
    }
}
