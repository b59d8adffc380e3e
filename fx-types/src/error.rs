//! Error types for the FX service.

use fx_currencies::{CurrencyCode, UnsupportedCurrency};

/// Domain-level errors (invalid inputs to the pure core).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error(transparent)]
    UnsupportedCurrency(#[from] UnsupportedCurrency),

    #[error("Invalid rate for {from} -> {to}: {rate}")]
    InvalidRate {
        from: CurrencyCode,
        to: CurrencyCode,
        rate: f64,
    },

    #[error("Identity rate for {0} is implicit and cannot be stored")]
    IdentityRate(CurrencyCode),

    #[error("Rate for {from} -> {to} is already set")]
    DuplicateRate { from: CurrencyCode, to: CurrencyCode },

    #[error("Amount cannot be negative")]
    NegativeAmount,

    #[error("Target rate must be a positive number, got {0}")]
    InvalidTargetRate(f64),

    #[error("Duplicate target currency: {0}")]
    DuplicateTarget(CurrencyCode),

    #[error("Converting {from} -> {to} gives an amount out of range")]
    AmountOutOfRange { from: CurrencyCode, to: CurrencyCode },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Snapshot store errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Application-level errors (for HTTP responses and CLI output).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<UnsupportedCurrency> for AppError {
    fn from(err: UnsupportedCurrency) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => AppError::BadRequest(e.to_string()),
            RepoError::Io(e) => AppError::Internal(e),
            RepoError::Serialization(e) => AppError::Internal(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_currency_maps_to_bad_request() {
        let err: DomainError = UnsupportedCurrency("XYZ".into()).into();
        assert_eq!(err.to_string(), "Unsupported currency: XYZ");

        let app: AppError = err.into();
        assert!(matches!(app, AppError::BadRequest(msg) if msg == "Unsupported currency: XYZ"));
    }

    #[test]
    fn test_repo_io_error_is_internal() {
        let app: AppError = RepoError::Io("disk full".into()).into();
        assert!(matches!(app, AppError::Internal(msg) if msg == "disk full"));
    }
}
