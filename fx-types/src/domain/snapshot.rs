//! Cached copy of the last good rate table.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::rates::RateTable;

/// Serialized offline fallback: `{"rates": {...}, "lastUpdated": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub rates: RateTable,
    pub last_updated: DateTime<Utc>,
}

impl RateSnapshot {
    /// Snapshot of `rates` taken now.
    pub fn new(rates: RateTable) -> Self {
        Self::at(rates, Utc::now())
    }

    pub fn at(rates: RateTable, last_updated: DateTime<Utc>) -> Self {
        Self {
            rates,
            last_updated,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_updated
    }

    pub fn is_stale(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        self.age(now) > max_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fx_currencies::CurrencyCode;

    #[test]
    fn test_snapshot_json_uses_camel_case() {
        let rates = RateTable::new()
            .with_rate(CurrencyCode::USD, CurrencyCode::EUR, 0.85)
            .unwrap();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let snapshot = RateSnapshot::at(rates, at);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["rates"]["USD"]["EUR"], 0.85);
        assert_eq!(json["lastUpdated"], "2024-03-01T12:00:00Z");

        let parsed: RateSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_staleness() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let snapshot = RateSnapshot::at(RateTable::reference(), at);
        let later = at + Duration::minutes(10);

        assert_eq!(snapshot.age(later), Duration::minutes(10));
        assert!(snapshot.is_stale(Duration::minutes(5), later));
        assert!(!snapshot.is_stale(Duration::minutes(15), later));
    }
}
