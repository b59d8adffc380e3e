//! Supported Currency Set with Macro-Based Code Generation
//!
//! The set of currencies the converter understands is closed: every code is
//! a variant of [`CurrencyCode`], and parsing anything else fails with
//! [`UnsupportedCurrency`] instead of silently defaulting.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     SEK => ("SEK", "kr", "Swedish Krona", 2),
//! }
//! ```
//!
//! # Example
//! ```
//! use fx_currencies::CurrencyCode;
//!
//! let btc: CurrencyCode = "btc".parse().unwrap();
//! assert_eq!(btc.decimal_places(), 8);
//! assert_eq!(CurrencyCode::USD.format_amount(1025.0), "$1025.00");
//! assert!("XYZ".parse::<CurrencyCode>().is_err());
//! ```

use std::fmt;

/// Error for a currency code outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported currency: {0}")]
pub struct UnsupportedCurrency(pub String);

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines the CurrencyCode enum and its metadata lookups
// ─────────────────────────────────────────────────────────────────────────────

/// Defines the supported currencies.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Variant => ("CODE", "SYMBOL", "Display name", minor_unit_decimals),
/// }
/// ```
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $display:literal, $decimals:expr)
        ),* $(,)?
    ) => {
        /// A currency from the fixed supported set.
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, utoipa::ToSchema,
        )]
        #[serde(rename_all = "UPPERCASE")]
        pub enum CurrencyCode {
            $($name),*
        }

        impl CurrencyCode {
            pub fn code(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $code),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $symbol),*
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(CurrencyCode::$name => $display),*
                }
            }

            /// Conventional number of decimal places when displaying an amount.
            pub fn decimal_places(&self) -> u32 {
                match self {
                    $(CurrencyCode::$name => $decimals),*
                }
            }

            /// Every supported currency, in declaration order.
            pub fn all() -> &'static [CurrencyCode] {
                &[$(CurrencyCode::$name),*]
            }
        }

        impl std::str::FromStr for CurrencyCode {
            type Err = UnsupportedCurrency;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($code => Ok(CurrencyCode::$name),)*
                    _ => Err(UnsupportedCurrency(s.to_string())),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    USD => ("USD", "$", "US Dollar", 2),
    EUR => ("EUR", "€", "Euro", 2),
    GBP => ("GBP", "£", "British Pound", 2),
    JPY => ("JPY", "¥", "Japanese Yen", 0),
    CAD => ("CAD", "C$", "Canadian Dollar", 2),
    AUD => ("AUD", "A$", "Australian Dollar", 2),
    CHF => ("CHF", "Fr", "Swiss Franc", 2),
    CNY => ("CNY", "¥", "Chinese Yuan", 2),
    BTC => ("BTC", "₿", "Bitcoin", 8),
    ETH => ("ETH", "Ξ", "Ethereum", 8),
}

impl CurrencyCode {
    /// Rounds `amount` to this currency's minor-unit precision.
    pub fn round_to_minor_units(&self, amount: f64) -> f64 {
        let factor = 10f64.powi(self.decimal_places() as i32);
        (amount * factor).round() / factor
    }

    /// Formats `amount` with the currency symbol at minor-unit precision.
    pub fn format_amount(&self, amount: f64) -> String {
        let decimals = self.decimal_places() as usize;
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{}{}{:.*}", sign, self.symbol(), decimals, amount.abs())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Accepts codes in any case, the same as `FromStr`.
impl<'de> serde::Deserialize<'de> for CurrencyCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Development reference rates
// ─────────────────────────────────────────────────────────────────────────────

/// Hardcoded directed rates for development and offline demos.
///
/// Each entry reads as "1 unit of the first currency buys `rate` units of the
/// second". Only six currencies carry rows; the rest are reachable through
/// reciprocal completion.
pub const REFERENCE_RATES: &[(CurrencyCode, CurrencyCode, f64)] = {
    use CurrencyCode::*;
    &[
        (USD, EUR, 0.85),
        (USD, GBP, 0.73),
        (USD, JPY, 110.0),
        (USD, CAD, 1.25),
        (USD, AUD, 1.35),
        (USD, CHF, 0.92),
        (USD, CNY, 6.45),
        (USD, BTC, 0.000023),
        (USD, ETH, 0.00036),
        (EUR, USD, 1.18),
        (EUR, GBP, 0.86),
        (EUR, JPY, 129.0),
        (EUR, CAD, 1.47),
        (EUR, AUD, 1.59),
        (EUR, CHF, 1.08),
        (EUR, CNY, 7.59),
        (EUR, BTC, 0.000027),
        (EUR, ETH, 0.00042),
        (GBP, USD, 1.37),
        (GBP, EUR, 1.16),
        (GBP, JPY, 151.0),
        (GBP, CAD, 1.71),
        (GBP, AUD, 1.85),
        (GBP, CHF, 1.26),
        (GBP, CNY, 8.84),
        (GBP, BTC, 0.000031),
        (GBP, ETH, 0.00049),
        (JPY, USD, 0.009),
        (JPY, EUR, 0.008),
        (JPY, GBP, 0.007),
        (JPY, CAD, 0.011),
        (JPY, AUD, 0.012),
        (JPY, CHF, 0.008),
        (JPY, CNY, 0.059),
        (JPY, BTC, 0.0000002),
        (JPY, ETH, 0.0000032),
        (BTC, USD, 43500.0),
        (BTC, EUR, 37000.0),
        (BTC, GBP, 31800.0),
        (BTC, JPY, 4785000.0),
        (BTC, CAD, 54375.0),
        (BTC, AUD, 58725.0),
        (BTC, CHF, 40020.0),
        (BTC, CNY, 280575.0),
        (BTC, ETH, 15.7),
        (ETH, USD, 2770.0),
        (ETH, EUR, 2355.0),
        (ETH, GBP, 2022.0),
        (ETH, JPY, 304700.0),
        (ETH, CAD, 3463.0),
        (ETH, AUD, 3740.0),
        (ETH, CHF, 2548.0),
        (ETH, CNY, 17877.0),
        (ETH, BTC, 0.064),
    ]
};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_parse() {
        assert_eq!("USD".parse::<CurrencyCode>().unwrap(), CurrencyCode::USD);
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::EUR);
        assert_eq!(" btc ".parse::<CurrencyCode>().unwrap(), CurrencyCode::BTC);
    }

    #[test]
    fn test_unsupported_code_is_rejected() {
        let err = "XYZ".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err, UnsupportedCurrency("XYZ".into()));
        assert_eq!(err.to_string(), "Unsupported currency: XYZ");
        assert!("".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_currency_code_display() {
        assert_eq!(CurrencyCode::USD.to_string(), "USD");
        assert_eq!(CurrencyCode::ETH.to_string(), "ETH");
    }

    #[test]
    fn test_currency_code_all() {
        let all = CurrencyCode::all();
        assert_eq!(all.len(), 10);
        assert_eq!(all[0], CurrencyCode::USD);
        assert_eq!(all[9], CurrencyCode::ETH);
    }

    #[test]
    fn test_minor_unit_precision() {
        assert_eq!(CurrencyCode::USD.decimal_places(), 2);
        assert_eq!(CurrencyCode::JPY.decimal_places(), 0);
        assert_eq!(CurrencyCode::BTC.decimal_places(), 8);
        assert_eq!(CurrencyCode::ETH.decimal_places(), 8);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(CurrencyCode::EUR.format_amount(85.0), "€85.00");
        assert_eq!(CurrencyCode::JPY.format_amount(11000.4), "¥11000");
        assert_eq!(CurrencyCode::BTC.format_amount(0.0023), "₿0.00230000");
        assert_eq!(CurrencyCode::USD.format_amount(-12.5), "-$12.50");
    }

    #[test]
    fn test_round_to_minor_units() {
        assert_eq!(CurrencyCode::USD.round_to_minor_units(10.456), 10.46);
        assert_eq!(CurrencyCode::JPY.round_to_minor_units(109.6), 110.0);
    }

    #[test]
    fn test_serde_uses_uppercase_codes() {
        let json = serde_json::to_string(&CurrencyCode::GBP).unwrap();
        assert_eq!(json, "\"GBP\"");
        let parsed: CurrencyCode = serde_json::from_str("\"CHF\"").unwrap();
        assert_eq!(parsed, CurrencyCode::CHF);
        assert!(serde_json::from_str::<CurrencyCode>("\"XYZ\"").is_err());
    }

    #[test]
    fn test_deserialize_is_case_insensitive() {
        let parsed: CurrencyCode = serde_json::from_str("\"usd\"").unwrap();
        assert_eq!(parsed, CurrencyCode::USD);
        let parsed: CurrencyCode = serde_json::from_str("\" eTh \"").unwrap();
        assert_eq!(parsed, CurrencyCode::ETH);

        let err = serde_json::from_str::<CurrencyCode>("\"doge\"").unwrap_err();
        assert!(err.to_string().contains("Unsupported currency: doge"));
    }

    #[test]
    fn test_lowercase_codes_work_as_map_keys() {
        let map: std::collections::BTreeMap<CurrencyCode, f64> =
            serde_json::from_str(r#"{"eur": 0.85, "Gbp": 0.73}"#).unwrap();
        assert_eq!(map[&CurrencyCode::EUR], 0.85);
        assert_eq!(map[&CurrencyCode::GBP], 0.73);
    }

    #[test]
    fn test_reference_rates_are_well_formed() {
        assert_eq!(REFERENCE_RATES.len(), 54);
        for (from, to, rate) in REFERENCE_RATES {
            assert_ne!(from, to);
            assert!(*rate > 0.0 && rate.is_finite());
        }
    }
}
