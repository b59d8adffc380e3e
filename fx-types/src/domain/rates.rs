//! Directed exchange-rate tables and reciprocal completion.
//!
//! A [`RateTable`] holds only authoritative entries. [`complete`] turns it into
//! a [`CompletedRateTable`] where every gap whose reverse direction is known is
//! filled with the multiplicative inverse. Pairs that would need a third
//! currency stay undefined unless a [`CompletionPolicy::ViaPivot`] is chosen.

use std::collections::BTreeMap;

use fx_currencies::{CurrencyCode, REFERENCE_RATES};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

type RateMap = BTreeMap<CurrencyCode, BTreeMap<CurrencyCode, f64>>;

/// Authoritative directed rates: 1 unit of `from` equals `rate` units of `to`.
///
/// Serializes as a nested object, e.g. `{"USD": {"EUR": 0.85}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RateMap", into = "RateMap")]
pub struct RateTable {
    rates: RateMap,
}

impl RateTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The hardcoded development table.
    pub fn reference() -> Self {
        let mut rates = RateMap::new();
        for &(from, to, rate) in REFERENCE_RATES {
            rates.entry(from).or_default().insert(to, rate);
        }
        Self { rates }
    }

    /// Builds a table from typed entries.
    pub fn from_entries<I>(entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (CurrencyCode, CurrencyCode, f64)>,
    {
        let mut table = Self::new();
        for (from, to, rate) in entries {
            table.insert(from, to, rate)?;
        }
        Ok(table)
    }

    /// Builds a table from string-keyed entries.
    ///
    /// Any code outside the supported set fails the whole table.
    pub fn from_raw<I, S>(entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (from, to, rate) in entries {
            let from: CurrencyCode = from.as_ref().parse()?;
            let to: CurrencyCode = to.as_ref().parse()?;
            table.insert(from, to, rate)?;
        }
        Ok(table)
    }

    /// Adds an authoritative entry. Each pair can be set once per table.
    pub fn insert(&mut self, from: CurrencyCode, to: CurrencyCode, rate: f64) -> Result<(), DomainError> {
        validate_entry(from, to, rate)?;
        if self.contains(from, to) {
            return Err(DomainError::DuplicateRate { from, to });
        }
        self.rates.entry(from).or_default().insert(to, rate);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_rate(mut self, from: CurrencyCode, to: CurrencyCode, rate: f64) -> Result<Self, DomainError> {
        self.insert(from, to, rate)?;
        Ok(self)
    }

    pub fn get(&self, from: CurrencyCode, to: CurrencyCode) -> Option<f64> {
        self.rates.get(&from).and_then(|row| row.get(&to)).copied()
    }

    pub fn contains(&self, from: CurrencyCode, to: CurrencyCode) -> bool {
        self.get(from, to).is_some()
    }

    pub fn len(&self) -> usize {
        self.rates.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates authoritative entries in (from, to) order.
    pub fn iter(&self) -> impl Iterator<Item = (CurrencyCode, CurrencyCode, f64)> + '_ {
        self.rates
            .iter()
            .flat_map(|(&from, row)| row.iter().map(move |(&to, &rate)| (from, to, rate)))
    }
}

fn validate_entry(from: CurrencyCode, to: CurrencyCode, rate: f64) -> Result<(), DomainError> {
    if from == to {
        return Err(DomainError::IdentityRate(from));
    }
    // The inverse must be representable too, or completion would produce inf.
    if !rate.is_finite() || rate <= 0.0 || !(1.0 / rate).is_finite() {
        return Err(DomainError::InvalidRate { from, to, rate });
    }
    Ok(())
}

impl TryFrom<RateMap> for RateTable {
    type Error = DomainError;

    fn try_from(map: RateMap) -> Result<Self, Self::Error> {
        let mut table = Self::new();
        for (from, row) in map {
            for (to, rate) in row {
                table.insert(from, to, rate)?;
            }
        }
        Ok(table)
    }
}

impl From<RateTable> for RateMap {
    fn from(table: RateTable) -> Self {
        table.rates
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Completion
// ─────────────────────────────────────────────────────────────────────────────

/// How far completion is allowed to go beyond direct reciprocals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// Only fill (a,b) from an authoritative (b,a).
    #[default]
    ReciprocalOnly,
    /// After reciprocals, fill (a,b) as rate(a,p) * rate(p,b) for the pivot `p`.
    ViaPivot(CurrencyCode),
}

/// Where an effective rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Authoritative,
    Reciprocal,
    Pivot(CurrencyCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveRate {
    pub rate: f64,
    pub source: RateSource,
}

/// Result of looking a pair up in a [`CompletedRateTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateLookup {
    /// `from == to`; the rate is exactly 1 and never stored.
    Identity,
    Found(EffectiveRate),
    /// No authoritative or derivable entry.
    Missing,
}

impl RateLookup {
    pub fn rate(&self) -> Option<f64> {
        match self {
            RateLookup::Identity => Some(1.0),
            RateLookup::Found(effective) => Some(effective.rate),
            RateLookup::Missing => None,
        }
    }

    /// The rate to multiply by, falling back to parity when nothing is known.
    pub fn effective_rate(&self) -> f64 {
        self.rate().unwrap_or(1.0)
    }

    pub fn source(&self) -> Option<RateSource> {
        match self {
            RateLookup::Found(effective) => Some(effective.source),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RateLookup::Missing)
    }
}

/// Authoritative entries plus everything completion derived from them.
///
/// Has no mutators; a refresh builds a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletedRateTable {
    entries: BTreeMap<(CurrencyCode, CurrencyCode), EffectiveRate>,
}

impl CompletedRateTable {
    pub fn lookup(&self, from: CurrencyCode, to: CurrencyCode) -> RateLookup {
        if from == to {
            return RateLookup::Identity;
        }
        match self.entries.get(&(from, to)) {
            Some(effective) => RateLookup::Found(*effective),
            None => RateLookup::Missing,
        }
    }

    /// Effective rate with the parity fallback applied.
    pub fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> f64 {
        self.lookup(from, to).effective_rate()
    }

    /// Distinguishes real data from the parity fallback.
    pub fn has_rate(&self, from: CurrencyCode, to: CurrencyCode) -> bool {
        !self.lookup(from, to).is_missing()
    }

    pub fn entries(&self) -> impl Iterator<Item = (CurrencyCode, CurrencyCode, EffectiveRate)> + '_ {
        self.entries.iter().map(|(&(from, to), &effective)| (from, to, effective))
    }

    pub fn effective_rates(&self) -> BTreeMap<(CurrencyCode, CurrencyCode), f64> {
        self.entries.iter().map(|(&pair, effective)| (pair, effective.rate)).collect()
    }

    /// Flattens every effective rate into a plain table.
    pub fn to_rate_table(&self) -> RateTable {
        let mut rates = RateMap::new();
        for (&(from, to), effective) in &self.entries {
            rates.entry(from).or_default().insert(to, effective.rate);
        }
        RateTable { rates }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Completes `table` with reciprocals only.
pub fn complete(table: &RateTable) -> CompletedRateTable {
    complete_with(table, CompletionPolicy::ReciprocalOnly)
}

/// Completes `table` under the given policy.
///
/// Authoritative entries always win; derivation only fills gaps.
pub fn complete_with(table: &RateTable, policy: CompletionPolicy) -> CompletedRateTable {
    let currencies = CurrencyCode::all();
    let mut entries = BTreeMap::new();

    for &from in currencies {
        for &to in currencies {
            if from == to {
                continue;
            }
            let effective = if let Some(rate) = table.get(from, to) {
                EffectiveRate {
                    rate,
                    source: RateSource::Authoritative,
                }
            } else if let Some(reverse) = table.get(to, from) {
                EffectiveRate {
                    rate: 1.0 / reverse,
                    source: RateSource::Reciprocal,
                }
            } else {
                continue;
            };
            entries.insert((from, to), effective);
        }
    }

    if let CompletionPolicy::ViaPivot(pivot) = policy {
        let mut pivoted = Vec::new();
        for &from in currencies {
            for &to in currencies {
                if from == to || from == pivot || to == pivot || entries.contains_key(&(from, to)) {
                    continue;
                }
                let first_leg: Option<&EffectiveRate> = entries.get(&(from, pivot));
                let second_leg: Option<&EffectiveRate> = entries.get(&(pivot, to));
                if let (Some(first), Some(second)) = (first_leg, second_leg) {
                    pivoted.push((
                        (from, to),
                        EffectiveRate {
                            rate: first.rate * second.rate,
                            source: RateSource::Pivot(pivot),
                        },
                    ));
                }
            }
        }
        entries.extend(pivoted);
    }

    CompletedRateTable { entries }
}
