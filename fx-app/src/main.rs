//! # FX Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Export traces over OTLP
//! - Pick the rate provider, snapshot store and alert notifier
//! - Load the initial rates and start the refresh worker
//! - Start the HTTP server

mod config;

use std::sync::Arc;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fx_hex::{FxService, RefreshWorker, ServiceOptions, inbound::HttpServer};
use fx_repo::{JsonFileStore, build_notifier, build_provider};

/// Installs the global OTLP tracer provider. The endpoint comes from the
/// standard `OTEL_EXPORTER_OTLP_*` variables.
fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("fx-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize OpenTelemetry tracing
    let (otel_tracer, otel_provider) = init_tracer()?;
    let telemetry = tracing_opentelemetry::layer().with_tracer(otel_tracer);

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fx_app=debug,fx_hex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env()?;

    tracing::info!("Starting FX server on port {}", config.port);
    tracing::info!("Snapshot path: {}", config.snapshot_path.display());
    if let Some(pivot) = config.pivot {
        tracing::info!("Filling cross rates through {}", pivot);
    }

    let service = Arc::new(FxService::new(
        build_provider(config.rates_file.as_deref()),
        JsonFileStore::new(&config.snapshot_path),
        build_notifier(config.alert_webhook_url.as_deref()),
        ServiceOptions {
            completion: config.completion_policy(),
            strict_fees: config.strict_fees,
        },
    ));

    // The server still starts without rates; a later refresh can recover.
    if let Err(e) = service.refresh().await {
        tracing::error!("Initial rate load failed: {}", e);
    }

    tokio::spawn(RefreshWorker::new(service.clone(), config.refresh_interval).run());

    // Create and run the HTTP server
    let server = HttpServer::new(service);
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Err(e) = otel_provider.shutdown() {
        tracing::warn!("Failed to flush traces: {}", e);
    }
    Ok(())
}
