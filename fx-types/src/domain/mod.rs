//! Domain models and pure computations for the FX service.

pub mod alerts;
pub mod conversion;
pub mod fees;
pub mod multi;
pub mod rates;
pub mod snapshot;

pub use alerts::{AlertCondition, AlertEvaluation, AlertId, RateAlert, evaluate, evaluate_against};
pub use conversion::{Conversion, ConversionRequest, convert, convert_request, parse_amount};
pub use fees::{FeeBreakdown, FeeSpec, Quote, apply_fees_and_tax};
pub use multi::{ConvertedAmount, MultiConversionResult, convert_many, next_available_target};
pub use rates::{
    CompletedRateTable, CompletionPolicy, EffectiveRate, RateLookup, RateSource, RateTable,
    complete, complete_with,
};
pub use snapshot::RateSnapshot;
