//! Configuration loading from environment.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use fx_types::{CompletionPolicy, CurrencyCode};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// JSON rate table to serve; the built-in reference rates when unset.
    pub rates_file: Option<PathBuf>,
    pub snapshot_path: PathBuf,
    pub refresh_interval: Duration,
    pub pivot: Option<CurrencyCode>,
    pub strict_fees: bool,
    pub alert_webhook_url: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid PORT: {}", e))?;

        let refresh_secs: u64 = var("FX_REFRESH_SECS")
            .unwrap_or_else(|| "300".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid FX_REFRESH_SECS: {}", e))?;
        if refresh_secs == 0 {
            anyhow::bail!("FX_REFRESH_SECS must be greater than zero");
        }

        let pivot = var("FX_PIVOT_CURRENCY")
            .map(|code| code.parse::<CurrencyCode>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("Invalid FX_PIVOT_CURRENCY: {}", e))?;

        let strict_fees: bool = match var("FX_STRICT_FEES") {
            Some(v) => v
                .parse()
                .map_err(|_| anyhow::anyhow!("FX_STRICT_FEES must be true or false, got {}", v))?,
            None => false,
        };

        Ok(Self {
            port,
            rates_file: var("FX_RATES_FILE").map(PathBuf::from),
            snapshot_path: var("FX_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data/rates-snapshot.json")),
            refresh_interval: Duration::from_secs(refresh_secs),
            pivot,
            strict_fees,
            alert_webhook_url: var("FX_ALERT_WEBHOOK_URL"),
        })
    }

    pub fn completion_policy(&self) -> CompletionPolicy {
        self.pivot
            .map_or(CompletionPolicy::ReciprocalOnly, CompletionPolicy::ViaPivot)
    }
}
