//! # FX Repository
//!
//! Concrete adapters for the FX service ports:
//! - `providers` - where fresh rate tables come from (`RateProvider`)
//! - `snapshot` - where the last good table is cached (`SnapshotStore`)
//! - `notifiers` - where fired alerts are delivered (`AlertNotifier`)

pub mod notifiers;
pub mod providers;
pub mod snapshot;

use std::path::Path;

use fx_types::{AlertNotifier, RateProvider};

pub use notifiers::{LogNotifier, WebhookNotifier};
pub use providers::{FileRateProvider, StaticRateProvider};
pub use snapshot::{JsonFileStore, MemoryStore};

/// Picks the rate provider: a JSON file when a path is given, otherwise the
/// built-in reference table.
///
/// # Examples
///
/// ```ignore
/// let provider = build_provider(Some(Path::new("rates.json")));
/// let table = provider.fetch_rates().await?;
/// ```
pub fn build_provider(rates_file: Option<&Path>) -> Box<dyn RateProvider> {
    match rates_file {
        Some(path) => {
            tracing::info!("Using rate file {}", path.display());
            Box::new(FileRateProvider::new(path))
        }
        None => {
            tracing::info!("Using built-in reference rates");
            Box::new(StaticRateProvider::reference())
        }
    }
}

/// Picks the alert notifier: a webhook when a URL is given, otherwise the log.
pub fn build_notifier(webhook_url: Option<&str>) -> Box<dyn AlertNotifier> {
    match webhook_url {
        Some(url) => Box::new(WebhookNotifier::new(url)),
        None => Box::new(LogNotifier),
    }
}
