//! Alert notifier adapters.

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use fx_types::{AlertEvaluation, AlertNotifier, NotifyError};

/// Writes fired alerts to the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl AlertNotifier for LogNotifier {
    async fn notify(&self, evaluation: &AlertEvaluation) -> Result<(), NotifyError> {
        warn!(
            alert_id = %evaluation.alert_id,
            pair = %format!("{}/{}", evaluation.from_currency, evaluation.to_currency),
            current_rate = ?evaluation.current_rate,
            "Rate alert: {}/{} is {} {}",
            evaluation.from_currency,
            evaluation.to_currency,
            evaluation.condition,
            evaluation.target_rate
        );
        Ok(())
    }
}

/// POSTs each fired alert as JSON to a fixed URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    target_url: String,
}

impl WebhookNotifier {
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            target_url: target_url.into(),
        }
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }
}

#[async_trait]
impl AlertNotifier for WebhookNotifier {
    #[instrument(skip(self, evaluation), fields(alert_id = %evaluation.alert_id))]
    async fn notify(&self, evaluation: &AlertEvaluation) -> Result<(), NotifyError> {
        info!("Sending alert webhook to {}", self.target_url);

        let payload = serde_json::json!({
            "event_type": "rate_alert.fired",
            "alert": evaluation,
            "sent_at": chrono::Utc::now(),
        });

        let resp = self
            .client
            .post(&self.target_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(NotifyError::Delivery(format!("HTTP {}", resp.status())));
        }
        Ok(())
    }
}
