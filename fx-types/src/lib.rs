//! # FX Types
//!
//! Domain types, pure computations and port traits for the currency
//! conversion service. This crate has ZERO IO dependencies - only data
//! structures, the conversion algorithms, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of the hexagonal architecture:
//! - `domain/` - Rate tables, completion, conversion, fees, alerts
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AlertCondition, AlertEvaluation, AlertId, CompletedRateTable, CompletionPolicy, Conversion,
    ConversionRequest, FeeBreakdown, FeeSpec, MultiConversionResult, Quote, RateAlert, RateLookup,
    RateSnapshot, RateSource, RateTable,
};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use fx_currencies::{CurrencyCode, UnsupportedCurrency};
pub use ports::{AlertNotifier, NotifyError, ProviderError, RateProvider, SnapshotStore};
