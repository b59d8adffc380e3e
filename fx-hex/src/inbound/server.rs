//! HTTP Server configuration and startup.

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use fx_types::SnapshotStore;

use super::handlers::{self, AppState};
use crate::FxService;
use crate::openapi::ApiDoc;

/// HTTP Server for the FX API.
pub struct HttpServer<S: SnapshotStore> {
    state: Arc<AppState<S>>,
}

impl<S: SnapshotStore> HttpServer<S> {
    /// Creates a new HTTP server around a shared service.
    ///
    /// The service is shared so a background worker can refresh rates while
    /// the server is running.
    pub fn new(service: Arc<FxService<S>>) -> Self {
        Self {
            state: Arc::new(AppState { service }),
        }
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        // Build HTTP metrics layer (uses globally set MeterProvider)
        let metrics = axum_otel_metrics::HttpMetricsLayerBuilder::new().build();

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/currencies", get(handlers::list_currencies))
            .route("/api/rates", get(handlers::list_rates::<S>))
            .route("/api/rates/refresh", post(handlers::refresh_rates::<S>))
            .route("/api/convert", post(handlers::convert::<S>))
            .route("/api/convert/multi", post(handlers::convert_many::<S>))
            .route("/api/quote", post(handlers::quote::<S>))
            .route(
                "/api/alerts",
                get(handlers::list_alerts::<S>).post(handlers::create_alert::<S>),
            )
            .route("/api/alerts/check", post(handlers::check_alerts::<S>))
            .route("/api/alerts/{id}", delete(handlers::remove_alert::<S>))
            .route("/api/alerts/{id}/toggle", post(handlers::toggle_alert::<S>))
            .merge(
                SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
            .layer(metrics)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address with graceful shutdown.
    pub async fn run(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
