//! Data Transfer Objects (DTOs) for requests and responses.
//!
//! Requests carry currencies as raw strings and amounts as either numbers or
//! user-entered text; the service parses them into domain types.

use chrono::{DateTime, Utc};
use fx_currencies::CurrencyCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AlertCondition, AlertId, CompletedRateTable, Conversion, ConvertedAmount, FeeBreakdown,
    MultiConversionResult, Quote, RateAlert, RateSource, parse_amount,
};

/// A numeric field that may arrive as a JSON number or as text.
///
/// Anything else (`null`, a bool, an object) is kept as-is and reads as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl AmountInput {
    /// Numeric value; malformed input is 0.
    pub fn value(&self) -> f64 {
        match self {
            AmountInput::Number(n) if n.is_finite() => *n,
            AmountInput::Number(_) | AmountInput::Other(_) => 0.0,
            AmountInput::Text(s) => parse_amount(s),
        }
    }
}

impl Default for AmountInput {
    fn default() -> Self {
        AmountInput::Number(0.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency & Rate DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrencyInfo {
    pub code: CurrencyCode,
    #[schema(example = "€")]
    pub symbol: String,
    #[schema(example = "Euro")]
    pub name: String,
    pub decimal_places: u32,
}

impl From<CurrencyCode> for CurrencyInfo {
    fn from(code: CurrencyCode) -> Self {
        Self {
            code,
            symbol: code.symbol().to_string(),
            name: code.name().to_string(),
            decimal_places: code.decimal_places(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RateEntry {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
    pub source: RateSource,
}

/// Every effective rate in the current table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RatesResponse {
    pub last_updated: DateTime<Utc>,
    /// True when the table came from the cached snapshot.
    pub offline: bool,
    pub rates: Vec<RateEntry>,
}

impl RatesResponse {
    pub fn new(table: &CompletedRateTable, last_updated: DateTime<Utc>, offline: bool) -> Self {
        Self {
            last_updated,
            offline,
            rates: table
                .entries()
                .map(|(from, to, effective)| RateEntry {
                    from,
                    to,
                    rate: effective.rate,
                    source: effective.source,
                })
                .collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to convert an amount between two currencies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConvertRequest {
    /// Number or numeric text; malformed input counts as 0.
    #[serde(default)]
    #[schema(value_type = f64, example = 100.0)]
    pub amount: AmountInput,
    #[schema(example = "USD")]
    pub from: String,
    #[schema(example = "EUR")]
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversionResponse {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
    pub converted: f64,
    /// Converted amount at the target's minor-unit precision.
    pub formatted: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_source: Option<RateSource>,
    pub rate_available: bool,
}

impl From<Conversion> for ConversionResponse {
    fn from(c: Conversion) -> Self {
        Self {
            amount: c.amount,
            from: c.from,
            to: c.to,
            rate: c.rate,
            converted: c.converted,
            formatted: c.to.format_amount(c.converted),
            rate_source: c.rate_source,
            rate_available: c.rate_available,
        }
    }
}

/// Request to convert one amount into several currencies.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MultiConvertRequest {
    /// Number or numeric text; malformed input counts as 0.
    #[serde(default)]
    #[schema(value_type = f64, example = 100.0)]
    pub amount: AmountInput,
    #[schema(example = "USD")]
    pub base: String,
    #[schema(example = json!(["EUR", "GBP", "JPY"]))]
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConvertedAmountResponse {
    pub currency: CurrencyCode,
    pub amount: f64,
    pub formatted: String,
    pub rate_available: bool,
}

impl From<ConvertedAmount> for ConvertedAmountResponse {
    fn from(c: ConvertedAmount) -> Self {
        Self {
            currency: c.currency,
            amount: c.amount,
            formatted: c.currency.format_amount(c.amount),
            rate_available: c.rate_available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MultiConvertResponse {
    pub base_amount: f64,
    pub base_currency: CurrencyCode,
    pub results: Vec<ConvertedAmountResponse>,
}

impl From<MultiConversionResult> for MultiConvertResponse {
    fn from(r: MultiConversionResult) -> Self {
        Self {
            base_amount: r.base_amount,
            base_currency: r.base_currency,
            results: r.results.into_iter().map(Into::into).collect(),
        }
    }
}

/// Request for a conversion with fee and tax applied.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteRequest {
    /// Number or numeric text; malformed input counts as 0.
    #[serde(default)]
    #[schema(value_type = f64, example = 100.0)]
    pub amount: AmountInput,
    pub from: String,
    pub to: String,
    /// Defaults to 2.5 when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>, example = 2.5)]
    pub fee_percent: Option<AmountInput>,
    /// Defaults to 0 when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>, example = 0.0)]
    pub tax_percent: Option<AmountInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub conversion: ConversionResponse,
    pub breakdown: FeeBreakdown,
    pub formatted_total: String,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self {
            formatted_total: q.conversion.to.format_amount(q.breakdown.total),
            conversion: q.conversion.into(),
            breakdown: q.breakdown,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Alert DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a rate alert.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAlertRequest {
    #[schema(example = "USD")]
    pub from: String,
    #[schema(example = "EUR")]
    pub to: String,
    #[schema(example = 0.9)]
    pub target_rate: f64,
    pub condition: AlertCondition,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertResponse {
    pub id: AlertId,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub target_rate: f64,
    pub condition: AlertCondition,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&RateAlert> for AlertResponse {
    fn from(alert: &RateAlert) -> Self {
        Self {
            id: alert.id(),
            from: alert.from_currency(),
            to: alert.to_currency(),
            target_rate: alert.target_rate(),
            condition: alert.condition(),
            is_active: alert.is_active(),
            created_at: alert.created_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_input_accepts_numbers_and_text() {
        let req: ConvertRequest =
            serde_json::from_str(r#"{"amount": 12.5, "from": "USD", "to": "EUR"}"#).unwrap();
        assert_eq!(req.amount.value(), 12.5);

        let req: ConvertRequest =
            serde_json::from_str(r#"{"amount": "100", "from": "USD", "to": "EUR"}"#).unwrap();
        assert_eq!(req.amount.value(), 100.0);

        let req: ConvertRequest =
            serde_json::from_str(r#"{"amount": "lots", "from": "USD", "to": "EUR"}"#).unwrap();
        assert_eq!(req.amount.value(), 0.0);

        let req: ConvertRequest = serde_json::from_str(r#"{"from": "USD", "to": "EUR"}"#).unwrap();
        assert_eq!(req.amount.value(), 0.0);
    }

    #[test]
    fn test_amount_input_reads_null_and_bools_as_zero() {
        for raw in ["null", "true", "{}", "[1]"] {
            let json = format!(r#"{{"amount": {}, "from": "USD", "to": "EUR"}}"#, raw);
            let req: ConvertRequest = serde_json::from_str(&json).unwrap();
            assert_eq!(req.amount.value(), 0.0, "{raw}");
        }

        let req: QuoteRequest = serde_json::from_str(
            r#"{"amount": 10, "from": "USD", "to": "EUR", "fee_percent": false}"#,
        )
        .unwrap();
        assert_eq!(req.fee_percent.map(|f| f.value()), Some(0.0));
    }

    #[test]
    fn test_conversion_response_formats_at_minor_units() {
        let conversion = Conversion {
            amount: 1.0,
            from: CurrencyCode::USD,
            to: CurrencyCode::BTC,
            rate: 0.000023,
            converted: 0.000023,
            rate_source: Some(RateSource::Authoritative),
            rate_available: true,
        };
        let response = ConversionResponse::from(conversion);
        assert_eq!(response.formatted, "₿0.00002300");
    }

    #[test]
    fn test_create_alert_request_condition_is_lowercase() {
        let req: CreateAlertRequest = serde_json::from_str(
            r#"{"from": "USD", "to": "EUR", "target_rate": 0.9, "condition": "below"}"#,
        )
        .unwrap();
        assert_eq!(req.condition, AlertCondition::Below);
    }
}
