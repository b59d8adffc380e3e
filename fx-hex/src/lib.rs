//! # FX Hex
//!
//! Application service layer and HTTP adapter for the FX service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates rate refresh, conversions and alerts)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `worker` - Periodic rate refresh and alert checking
//! - `openapi` - OpenAPI document served with swagger-ui
//!
//! The service is generic over `S: SnapshotStore`, allowing different
//! snapshot stores to be injected.

pub mod inbound;
pub mod openapi;
pub mod service;
pub mod worker;


pub use service::{FxService, RateState, ServiceOptions};
pub use worker::RefreshWorker;
