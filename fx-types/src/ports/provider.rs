//! Rate provider port.
//!
//! Supplies fresh authoritative rate tables. Implementations can read a file,
//! serve a fixed development table, etc.

use crate::domain::RateTable;
use crate::error::DomainError;

/// Error type for rate provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    InvalidTable(#[from] DomainError),

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed rate data: {0}")]
    Malformed(String),
}

/// Port trait for rate providers.
#[async_trait::async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches a complete authoritative table. Each call returns a new snapshot.
    async fn fetch_rates(&self) -> Result<RateTable, ProviderError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
