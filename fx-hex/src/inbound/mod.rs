//! HTTP Inbound Adapter
//!
//! Axum-based HTTP server that drives the application layer.

mod handlers;
mod server;

pub use handlers::{ApiError, CheckAlertsResponse, ErrorResponse};
pub use server::HttpServer;
