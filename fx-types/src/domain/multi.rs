//! One base amount converted into several targets at once.

use fx_currencies::CurrencyCode;
use serde::{Deserialize, Serialize};

use super::conversion::convert;
use super::rates::CompletedRateTable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvertedAmount {
    pub currency: CurrencyCode,
    pub amount: f64,
    pub rate_available: bool,
}

/// Per-target results in the order the caller asked for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiConversionResult {
    pub base_amount: f64,
    pub base_currency: CurrencyCode,
    pub results: Vec<ConvertedAmount>,
}

impl MultiConversionResult {
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        self.results.iter().map(|r| r.currency).collect()
    }

    pub fn get(&self, currency: CurrencyCode) -> Option<f64> {
        self.results
            .iter()
            .find(|r| r.currency == currency)
            .map(|r| r.amount)
    }
}

/// Converts `base_amount` into every target independently.
///
/// Targets are assumed to be unique.
pub fn convert_many(
    base_amount: f64,
    base_currency: CurrencyCode,
    targets: &[CurrencyCode],
    table: &CompletedRateTable,
) -> MultiConversionResult {
    let results = targets
        .iter()
        .map(|&currency| ConvertedAmount {
            currency,
            amount: convert(base_amount, base_currency, currency, table),
            rate_available: table.has_rate(base_currency, currency),
        })
        .collect();

    MultiConversionResult {
        base_amount,
        base_currency,
        results,
    }
}

/// First supported currency that is neither the base nor already a target.
pub fn next_available_target(base: CurrencyCode, targets: &[CurrencyCode]) -> Option<CurrencyCode> {
    CurrencyCode::all()
        .iter()
        .copied()
        .find(|c| *c != base && !targets.contains(c))
}
