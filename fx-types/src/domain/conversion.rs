//! Single-pair conversion over a completed rate table.

use fx_currencies::CurrencyCode;
use serde::{Deserialize, Serialize};

use super::rates::{CompletedRateTable, RateSource};
use crate::error::DomainError;

/// Parses user-entered numeric text. Anything that is not a finite number is 0.
pub fn parse_amount(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Converts `amount` from one currency to another.
///
/// Same-currency conversions return the amount untouched. A pair with no
/// known rate converts at parity; use [`CompletedRateTable::has_rate`] to tell
/// the two apart. No rounding is applied.
pub fn convert(amount: f64, from: CurrencyCode, to: CurrencyCode, table: &CompletedRateTable) -> f64 {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    if from == to {
        return amount;
    }
    amount * table.rate(from, to)
}

/// A single conversion request. Constructed per call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionRequest {
    amount: f64,
    from: CurrencyCode,
    to: CurrencyCode,
}

impl ConversionRequest {
    /// Creates a request.
    ///
    /// # Validation
    /// - Amount cannot be negative
    pub fn new(amount: f64, from: CurrencyCode, to: CurrencyCode) -> Result<Self, DomainError> {
        let amount = if amount.is_finite() { amount } else { 0.0 };
        if amount < 0.0 {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self { amount, from, to })
    }

    /// Creates a request from raw text inputs.
    ///
    /// Non-numeric amounts become 0; unsupported codes are rejected.
    pub fn parse(amount: &str, from: &str, to: &str) -> Result<Self, DomainError> {
        Self::new(parse_amount(amount), from.parse()?, to.parse()?)
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn from(&self) -> CurrencyCode {
        self.from
    }

    pub fn to(&self) -> CurrencyCode {
        self.to
    }

    /// The same amount with the direction reversed.
    pub fn swapped(&self) -> Self {
        Self {
            amount: self.amount,
            from: self.to,
            to: self.from,
        }
    }
}

/// Outcome of a conversion, including where the rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
    pub converted: f64,
    /// `None` for same-currency and missing-rate conversions.
    pub rate_source: Option<RateSource>,
    /// False when the parity fallback was used.
    pub rate_available: bool,
}

/// Converts a request and records the rate used.
pub fn convert_request(req: &ConversionRequest, table: &CompletedRateTable) -> Conversion {
    let lookup = table.lookup(req.from, req.to);
    Conversion {
        amount: req.amount,
        from: req.from,
        to: req.to,
        rate: lookup.effective_rate(),
        converted: convert(req.amount, req.from, req.to, table),
        rate_source: lookup.source(),
        rate_available: !lookup.is_missing(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rates::{RateTable, complete};
    use CurrencyCode::*;

    fn table() -> CompletedRateTable {
        complete(&RateTable::reference())
    }

    #[test]
    fn test_parse_amount_normalizes_malformed_input() {
        assert_eq!(parse_amount("100"), 100.0);
        assert_eq!(parse_amount(" 2.5 "), 2.5);
        assert_eq!(parse_amount("-3"), -3.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
    }

    #[test]
    fn test_identity_conversion_returns_amount() {
        let empty = complete(&RateTable::new());
        for &c in CurrencyCode::all() {
            assert_eq!(convert(123.45, c, c, &empty), 123.45);
            assert_eq!(convert(123.45, c, c, &table()), 123.45);
        }
    }

    #[test]
    fn test_convert_uses_authoritative_rate() {
        assert_eq!(convert(100.0, USD, EUR, &table()), 85.0);
        assert_eq!(convert(2.0, BTC, USD, &table()), 87000.0);
    }

    #[test]
    fn test_missing_rate_falls_back_to_parity() {
        let completed = complete(&RateTable::new().with_rate(USD, EUR, 0.85).unwrap());
        assert_eq!(convert(50.0, GBP, JPY, &completed), 50.0);

        let req = ConversionRequest::new(50.0, GBP, JPY).unwrap();
        let conversion = convert_request(&req, &completed);
        assert_eq!(conversion.rate, 1.0);
        assert!(!conversion.rate_available);
        assert_eq!(conversion.rate_source, None);
    }

    #[test]
    fn test_round_trip_through_reciprocal() {
        let completed = complete(&RateTable::new().with_rate(USD, CAD, 1.25).unwrap());
        let there = convert(80.0, USD, CAD, &completed);
        let back = convert(there, CAD, USD, &completed);
        assert!((back - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_amount_converts_to_zero() {
        assert_eq!(convert(f64::NAN, USD, EUR, &table()), 0.0);
        assert_eq!(convert(f64::INFINITY, USD, USD, &table()), 0.0);
    }

    #[test]
    fn test_request_validation() {
        assert_eq!(
            ConversionRequest::new(-1.0, USD, EUR),
            Err(DomainError::NegativeAmount)
        );

        let req = ConversionRequest::parse("not a number", "usd", "eur").unwrap();
        assert_eq!(req.amount(), 0.0);
        assert_eq!(req.from(), USD);

        let err = ConversionRequest::parse("10", "USD", "DOGE").unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedCurrency(_)));
    }

    #[test]
    fn test_swapped_request_reverses_direction() {
        let req = ConversionRequest::new(10.0, USD, GBP).unwrap().swapped();
        assert_eq!((req.from(), req.to(), req.amount()), (GBP, USD, 10.0));
    }

    #[test]
    fn test_convert_request_reports_source() {
        let req = ConversionRequest::new(100.0, CAD, USD).unwrap();
        let conversion = convert_request(&req, &table());
        assert_eq!(conversion.rate_source, Some(RateSource::Reciprocal));
        assert!(conversion.rate_available);
        assert!((conversion.converted - 80.0).abs() < 1e-9);
    }
}
