//! Percentage fee and tax on top of a converted amount.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::conversion::{Conversion, parse_amount};
use crate::error::DomainError;

/// Fee and tax percentages. Negative values act as discounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSpec {
    pub fee_percent: f64,
    pub tax_percent: f64,
}

impl Default for FeeSpec {
    fn default() -> Self {
        Self {
            fee_percent: 2.5,
            tax_percent: 0.0,
        }
    }
}

impl FeeSpec {
    pub fn new(fee_percent: f64, tax_percent: f64) -> Self {
        Self {
            fee_percent,
            tax_percent,
        }
    }

    /// Parses user-entered percentages; malformed text counts as 0.
    pub fn parse(fee_percent: &str, tax_percent: &str) -> Self {
        Self::new(parse_amount(fee_percent), parse_amount(tax_percent))
    }

    /// Rejects negative percentages for callers that want strict fees.
    pub fn ensure_non_negative(&self) -> Result<(), DomainError> {
        if self.fee_percent < 0.0 {
            return Err(DomainError::ValidationError(format!(
                "Fee percentage cannot be negative: {}",
                self.fee_percent
            )));
        }
        if self.tax_percent < 0.0 {
            return Err(DomainError::ValidationError(format!(
                "Tax percentage cannot be negative: {}",
                self.tax_percent
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeeBreakdown {
    pub converted: f64,
    pub fee: f64,
    pub tax: f64,
    pub total: f64,
}

pub fn apply_fees_and_tax(converted_amount: f64, fees: &FeeSpec) -> FeeBreakdown {
    let fee = converted_amount * fees.fee_percent / 100.0;
    let tax = converted_amount * fees.tax_percent / 100.0;
    FeeBreakdown {
        converted: converted_amount,
        fee,
        tax,
        total: converted_amount + fee + tax,
    }
}

/// A conversion with fee and tax applied to its converted amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub conversion: Conversion,
    pub breakdown: FeeBreakdown,
}

impl Quote {
    pub fn new(conversion: Conversion, fees: &FeeSpec) -> Self {
        Self {
            breakdown: apply_fees_and_tax(conversion.converted, fees),
            conversion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_only() {
        let breakdown = apply_fees_and_tax(1000.0, &FeeSpec::new(2.5, 0.0));
        assert_eq!(
            breakdown,
            FeeBreakdown {
                converted: 1000.0,
                fee: 25.0,
                tax: 0.0,
                total: 1025.0,
            }
        );
    }

    #[test]
    fn test_fee_and_tax_add_up() {
        let breakdown = apply_fees_and_tax(200.0, &FeeSpec::new(1.0, 10.0));
        assert_eq!(breakdown.fee, 2.0);
        assert_eq!(breakdown.tax, 20.0);
        assert_eq!(breakdown.total, 222.0);
    }

    #[test]
    fn test_negative_percent_is_a_discount() {
        let breakdown = apply_fees_and_tax(1000.0, &FeeSpec::new(-5.0, 0.0));
        assert_eq!(breakdown.fee, -50.0);
        assert_eq!(breakdown.total, 950.0);
    }

    #[test]
    fn test_parse_treats_malformed_text_as_zero() {
        assert_eq!(FeeSpec::parse("2.5", "abc"), FeeSpec::new(2.5, 0.0));
        assert_eq!(FeeSpec::parse("", " 7 "), FeeSpec::new(0.0, 7.0));
    }

    #[test]
    fn test_default_matches_calculator_defaults() {
        assert_eq!(FeeSpec::default(), FeeSpec::new(2.5, 0.0));
    }

    #[test]
    fn test_quote_applies_fees_to_converted_amount() {
        use crate::domain::{RateTable, complete, convert_request, ConversionRequest};
        use fx_currencies::CurrencyCode::*;

        let table = complete(&RateTable::from_entries([(USD, EUR, 0.5)]).unwrap());
        let conversion = convert_request(&ConversionRequest::new(2000.0, USD, EUR).unwrap(), &table);
        let quote = Quote::new(conversion, &FeeSpec::default());

        assert_eq!(quote.conversion.converted, 1000.0);
        assert_eq!(quote.breakdown.fee, 25.0);
        assert_eq!(quote.breakdown.total, 1025.0);
    }

    #[test]
    fn test_strict_check_rejects_negative_percentages() {
        assert!(FeeSpec::new(0.0, 0.0).ensure_non_negative().is_ok());
        assert!(FeeSpec::new(-1.0, 0.0).ensure_non_negative().is_err());
        assert!(FeeSpec::new(1.0, -0.5).ensure_non_negative().is_err());
    }
}
