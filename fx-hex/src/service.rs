//! FX Application Service
//!
//! Orchestrates the pure conversion core through the provider, snapshot and
//! notifier ports. Contains NO infrastructure logic.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use fx_types::domain::{complete_with, convert_many, convert_request, evaluate_against};
use fx_types::{
    AlertEvaluation, AlertId, AlertNotifier, AppError, CompletedRateTable, CompletionPolicy,
    Conversion, ConversionRequest, ConvertRequest, CreateAlertRequest, CurrencyCode, DomainError,
    FeeSpec, MultiConversionResult, MultiConvertRequest, Quote, QuoteRequest, RateAlert,
    RateProvider, RateSnapshot, RatesResponse, SnapshotStore,
};

/// Knobs that change how the service treats its inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceOptions {
    pub completion: CompletionPolicy,
    /// Reject negative fee and tax percentages in quotes.
    pub strict_fees: bool,
}

/// The installed rate table and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RateState {
    pub table: CompletedRateTable,
    pub last_updated: DateTime<Utc>,
    /// True when the table was restored from the snapshot store.
    pub offline: bool,
}

impl RateState {
    pub fn to_response(&self) -> RatesResponse {
        RatesResponse::new(&self.table, self.last_updated, self.offline)
    }
}

/// Application service for conversions and rate alerts.
///
/// Generic over `S: SnapshotStore`; the provider and notifier are boxed since
/// the binary picks them from configuration at runtime.
pub struct FxService<S: SnapshotStore> {
    provider: Box<dyn RateProvider>,
    store: S,
    notifier: Box<dyn AlertNotifier>,
    options: ServiceOptions,
    state: RwLock<Option<Arc<RateState>>>,
    alerts: RwLock<Vec<RateAlert>>,
    firing: Mutex<HashSet<AlertId>>,
}

impl<S: SnapshotStore> FxService<S> {
    pub fn new(
        provider: Box<dyn RateProvider>,
        store: S,
        notifier: Box<dyn AlertNotifier>,
        options: ServiceOptions,
    ) -> Self {
        Self {
            provider,
            store,
            notifier,
            options,
            state: RwLock::new(None),
            alerts: RwLock::new(Vec::new()),
            firing: Mutex::new(HashSet::new()),
        }
    }

    pub fn options(&self) -> ServiceOptions {
        self.options
    }

    /// Returns a reference to the underlying snapshot store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rates
    // ─────────────────────────────────────────────────────────────────────────────

    /// Fetches a fresh table and installs it.
    ///
    /// When the provider fails, the last saved snapshot is installed instead
    /// and marked offline. Fails only when neither is available.
    pub async fn refresh(&self) -> Result<Arc<RateState>, AppError> {
        match self.provider.fetch_rates().await {
            Ok(table) => {
                let snapshot = RateSnapshot::new(table);
                let state = self.install(&snapshot, false);
                info!(
                    provider = self.provider.name(),
                    authoritative = snapshot.rates.len(),
                    effective = state.table.len(),
                    "Installed fresh rates"
                );

                if let Err(e) = self.store.save(&snapshot).await {
                    warn!(error = %e, "Failed to save rate snapshot");
                }
                Ok(state)
            }
            Err(err) => {
                warn!(provider = self.provider.name(), error = %err, "Rate provider failed, trying snapshot");
                match self.store.load().await {
                    Ok(Some(snapshot)) => {
                        let state = self.install(&snapshot, true);
                        info!(last_updated = %snapshot.last_updated, "Installed rates from snapshot");
                        Ok(state)
                    }
                    Ok(None) => Err(AppError::Unavailable(format!(
                        "{}; no rate snapshot available",
                        err
                    ))),
                    Err(e) => Err(AppError::Unavailable(format!(
                        "{}; rate snapshot unreadable: {}",
                        err, e
                    ))),
                }
            }
        }
    }

    /// Completes `snapshot` under the configured policy and swaps it in.
    pub fn install(&self, snapshot: &RateSnapshot, offline: bool) -> Arc<RateState> {
        let state = Arc::new(RateState {
            table: complete_with(&snapshot.rates, self.options.completion),
            last_updated: snapshot.last_updated,
            offline,
        });
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        state
    }

    /// The installed rate state.
    pub fn state(&self) -> Result<Arc<RateState>, AppError> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| AppError::Unavailable("Rates have not been loaded yet".into()))
    }

    /// Ids of alerts that fired at the last check and have not cleared.
    #[cfg(test)]
    pub(crate) fn firing_ids(&self) -> HashSet<AlertId> {
        self.firing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lists every effective rate with its source.
    pub fn rates(&self) -> Result<RatesResponse, AppError> {
        Ok(self.state()?.to_response())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Conversions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Converts a single amount.
    pub fn convert(&self, req: ConvertRequest) -> Result<Conversion, AppError> {
        let request = ConversionRequest::new(
            req.amount.value(),
            req.from.parse()?,
            req.to.parse()?,
        )?;
        let state = self.state()?;

        let conversion = convert_request(&request, &state.table);
        ensure_in_range(conversion.from, conversion.to, &[conversion.converted])?;
        if !conversion.rate_available {
            warn!(from = %conversion.from, to = %conversion.to, "No rate for pair, using parity");
        }
        Ok(conversion)
    }

    /// Converts one amount into several currencies.
    pub fn convert_many(&self, req: MultiConvertRequest) -> Result<MultiConversionResult, AppError> {
        let amount = req.amount.value();
        if amount < 0.0 {
            return Err(DomainError::NegativeAmount.into());
        }
        let base: CurrencyCode = req.base.parse()?;

        let mut targets = Vec::with_capacity(req.targets.len());
        for raw in &req.targets {
            let target: CurrencyCode = raw.parse()?;
            if targets.contains(&target) {
                return Err(DomainError::DuplicateTarget(target).into());
            }
            targets.push(target);
        }

        let state = self.state()?;
        let result = convert_many(amount, base, &targets, &state.table);
        for converted in &result.results {
            ensure_in_range(base, converted.currency, &[converted.amount])?;
        }
        for missing in result.results.iter().filter(|r| !r.rate_available) {
            warn!(from = %base, to = %missing.currency, "No rate for pair, using parity");
        }
        Ok(result)
    }

    /// Converts and applies fee and tax percentages.
    pub fn quote(&self, req: QuoteRequest) -> Result<Quote, AppError> {
        let defaults = FeeSpec::default();
        let fees = FeeSpec::new(
            req.fee_percent
                .as_ref()
                .map_or(defaults.fee_percent, |fee| fee.value()),
            req.tax_percent
                .as_ref()
                .map_or(defaults.tax_percent, |tax| tax.value()),
        );
        if self.options.strict_fees {
            fees.ensure_non_negative()?;
        }

        let conversion = self.convert(ConvertRequest {
            amount: req.amount,
            from: req.from,
            to: req.to,
        })?;
        let quote = Quote::new(conversion, &fees);
        let b = &quote.breakdown;
        ensure_in_range(
            quote.conversion.from,
            quote.conversion.to,
            &[b.converted, b.fee, b.tax, b.total],
        )?;
        Ok(quote)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Alerts
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates an active alert.
    pub fn create_alert(&self, req: CreateAlertRequest) -> Result<RateAlert, AppError> {
        let alert = RateAlert::new(
            req.from.parse()?,
            req.to.parse()?,
            req.target_rate,
            req.condition,
        )?;
        self.alerts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(alert.clone());

        debug!(alert_id = %alert.id(), "Created rate alert");
        Ok(alert)
    }

    /// Lists alerts in creation order.
    pub fn list_alerts(&self) -> Vec<RateAlert> {
        self.alerts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Flips an alert between active and inactive.
    pub fn toggle_alert(&self, id: AlertId) -> Result<RateAlert, AppError> {
        let mut alerts = self.alerts.write().unwrap_or_else(PoisonError::into_inner);
        let alert = alerts
            .iter_mut()
            .find(|a| a.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("Alert {}", id)))?;
        alert.toggle();

        debug!(alert_id = %id, active = alert.is_active(), "Toggled rate alert");
        Ok(alert.clone())
    }

    /// Deletes an alert.
    pub fn remove_alert(&self, id: AlertId) -> Result<RateAlert, AppError> {
        let removed = {
            let mut alerts = self.alerts.write().unwrap_or_else(PoisonError::into_inner);
            let index = alerts
                .iter()
                .position(|a| a.id() == id)
                .ok_or_else(|| AppError::NotFound(format!("Alert {}", id)))?;
            alerts.remove(index)
        };
        self.firing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);

        debug!(alert_id = %id, "Removed rate alert");
        Ok(removed)
    }

    /// Evaluates every alert against the installed rates.
    ///
    /// Only alerts that were not already firing at the previous check are
    /// passed to the notifier. Delivery failures are logged and do not fail
    /// the check.
    pub async fn check_alerts(&self) -> Result<Vec<AlertEvaluation>, AppError> {
        let state = self.state()?;
        let alerts = self.list_alerts();
        let evaluations = evaluate_against(&alerts, &state.table);

        let newly_fired = {
            let mut firing = self.firing.lock().unwrap_or_else(PoisonError::into_inner);
            // Read under the firing lock so a concurrent removal cannot leave its id behind.
            let live: HashSet<AlertId> = self
                .alerts
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .map(RateAlert::id)
                .collect();
            track_firing(&mut firing, &live, &evaluations)
        };

        for evaluation in newly_fired {
            if let Err(e) = self.notifier.notify(evaluation).await {
                warn!(alert_id = %evaluation.alert_id, error = %e, "Failed to deliver alert");
            }
        }

        debug!(checked = evaluations.len(), "Checked rate alerts");
        Ok(evaluations)
    }
}

/// Updates the set of firing alerts and returns the evaluations that just
/// started firing.
///
/// Ids not in `live` are dropped and never reported.
pub(crate) fn track_firing<'a>(
    firing: &mut HashSet<AlertId>,
    live: &HashSet<AlertId>,
    evaluations: &'a [AlertEvaluation],
) -> Vec<&'a AlertEvaluation> {
    let mut newly_fired = Vec::new();
    for evaluation in evaluations {
        if evaluation.fired && live.contains(&evaluation.alert_id) {
            if firing.insert(evaluation.alert_id) {
                newly_fired.push(evaluation);
            }
        } else {
            firing.remove(&evaluation.alert_id);
        }
    }
    firing.retain(|id| live.contains(id));
    newly_fired
}

/// Rejects results that overflowed to infinity or NaN.
fn ensure_in_range(from: CurrencyCode, to: CurrencyCode, values: &[f64]) -> Result<(), DomainError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(DomainError::AmountOutOfRange { from, to })
    }
}
