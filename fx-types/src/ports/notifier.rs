//! Alert notification port.
//!
//! The evaluator only decides whether an alert fired; delivering that fact
//! somewhere is the notifier's job.

use crate::domain::AlertEvaluation;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

#[async_trait::async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, evaluation: &AlertEvaluation) -> Result<(), NotifyError>;
}
