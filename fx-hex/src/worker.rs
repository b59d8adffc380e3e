//! Background rate refresh and alert checking.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, instrument};

use fx_types::SnapshotStore;

use crate::FxService;

/// Periodically refreshes rates and checks alerts against them.
pub struct RefreshWorker<S: SnapshotStore> {
    service: Arc<FxService<S>>,
    interval: Duration,
}

impl<S: SnapshotStore> RefreshWorker<S> {
    pub fn new(service: Arc<FxService<S>>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Runs forever; spawn it on the runtime.
    pub async fn run(self) {
        info!("Starting refresh worker every {:?}", self.interval);
        loop {
            sleep(self.interval).await;
            self.tick().await;
        }
    }

    /// One refresh followed by one alert check. Failures are logged and the
    /// previously installed rates stay in place.
    #[instrument(skip(self))]
    pub async fn tick(&self) {
        match self.service.refresh().await {
            Ok(state) => debug!(offline = state.offline, "Rates refreshed"),
            Err(e) => {
                error!("Rate refresh failed: {}", e);
                return;
            }
        }

        match self.service.check_alerts().await {
            Ok(evaluations) => {
                let fired = evaluations.iter().filter(|e| e.fired).count();
                if fired > 0 {
                    info!("{} of {} alerts firing", fired, evaluations.len());
                }
            }
            Err(e) => error!("Alert check failed: {}", e),
        }
    }
}
