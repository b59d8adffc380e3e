//! Rate alerts and their threshold evaluation.

use chrono::{DateTime, Utc};
use fx_currencies::CurrencyCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::rates::CompletedRateTable;
use crate::error::DomainError;

/// Unique identifier for a RateAlert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "550e8400-e29b-41d4-a716-446655440000")]
pub struct AlertId(Uuid);

impl AlertId {
    /// Creates a new random AlertId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an AlertId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AlertId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertCondition {
    Above,
    Below,
}

impl AsRef<str> for AlertCondition {
    fn as_ref(&self) -> &str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
        }
    }
}

impl std::fmt::Display for AlertCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl std::str::FromStr for AlertCondition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "above" => Ok(Self::Above),
            "below" => Ok(Self::Below),
            other => Err(DomainError::ValidationError(format!(
                "Unknown alert condition: {other} (expected above or below)"
            ))),
        }
    }
}

/// A user-defined threshold on a currency pair.
///
/// Once created, the only state change is [`toggle`](Self::toggle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateAlert {
    id: AlertId,
    from_currency: CurrencyCode,
    to_currency: CurrencyCode,
    target_rate: f64,
    condition: AlertCondition,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl RateAlert {
    /// Creates an active alert.
    ///
    /// # Validation
    /// - Target rate must be positive and finite
    pub fn new(
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
        target_rate: f64,
        condition: AlertCondition,
    ) -> Result<Self, DomainError> {
        if !target_rate.is_finite() || target_rate <= 0.0 {
            return Err(DomainError::InvalidTargetRate(target_rate));
        }
        Ok(Self {
            id: AlertId::new(),
            from_currency,
            to_currency,
            target_rate,
            condition,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> AlertId {
        self.id
    }

    pub fn from_currency(&self) -> CurrencyCode {
        self.from_currency
    }

    pub fn to_currency(&self) -> CurrencyCode {
        self.to_currency
    }

    pub fn target_rate(&self) -> f64 {
        self.target_rate
    }

    pub fn condition(&self) -> AlertCondition {
        self.condition
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Flips between active and paused.
    pub fn toggle(&mut self) {
        self.is_active = !self.is_active;
    }

    /// Whether the alert condition holds at `current_rate`.
    pub fn is_triggered_by(&self, current_rate: f64) -> bool {
        evaluate(self, current_rate)
    }
}

/// Returns true iff the alert is active and `current_rate` is strictly past
/// the target in the alert's direction. Inactive alerts never fire.
pub fn evaluate(alert: &RateAlert, current_rate: f64) -> bool {
    if !alert.is_active {
        return false;
    }
    match alert.condition {
        AlertCondition::Above => current_rate > alert.target_rate,
        AlertCondition::Below => current_rate < alert.target_rate,
    }
}

/// An alert checked against a rate table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AlertEvaluation {
    pub alert_id: AlertId,
    pub from_currency: CurrencyCode,
    pub to_currency: CurrencyCode,
    pub condition: AlertCondition,
    pub target_rate: f64,
    /// `None` when the table has no rate for the pair.
    pub current_rate: Option<f64>,
    pub fired: bool,
}

/// Evaluates each alert against the live rate for its pair.
///
/// Pairs without data never fire; the parity fallback is not used here.
pub fn evaluate_against(alerts: &[RateAlert], table: &CompletedRateTable) -> Vec<AlertEvaluation> {
    alerts
        .iter()
        .map(|alert| {
            let current_rate = table
                .lookup(alert.from_currency, alert.to_currency)
                .rate();
            AlertEvaluation {
                alert_id: alert.id,
                from_currency: alert.from_currency,
                to_currency: alert.to_currency,
                condition: alert.condition,
                target_rate: alert.target_rate,
                current_rate,
                fired: current_rate.is_some_and(|rate| evaluate(alert, rate)),
            }
        })
        .collect()
}
