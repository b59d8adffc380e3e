//! FX CLI
//!
//! Command-line front end that runs conversions and alert checks locally
//! against the same rate provider and snapshot the server uses.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use fx_hex::{FxService, ServiceOptions};
use fx_repo::{JsonFileStore, LogNotifier, build_provider};
use fx_types::domain::next_available_target;
use fx_types::{
    AmountInput, CompletionPolicy, ConversionResponse, ConvertRequest, CreateAlertRequest,
    CurrencyCode, CurrencyInfo, MultiConvertRequest, MultiConvertResponse, QuoteRequest,
    QuoteResponse,
};

#[derive(Parser)]
#[command(name = "fx")]
#[command(author, version, about = "Currency conversion CLI", long_about = None)]
struct Cli {
    /// JSON rate table to use instead of the built-in reference rates
    #[arg(long, env = "FX_RATES_FILE")]
    rates_file: Option<PathBuf>,

    /// Where the last good rate table is cached
    #[arg(long, env = "FX_SNAPSHOT_PATH", default_value = "data/rates-snapshot.json")]
    snapshot: PathBuf,

    /// Fill missing cross rates through this currency
    #[arg(long, env = "FX_PIVOT_CURRENCY")]
    pivot: Option<String>,

    /// Reject negative fee and tax percentages
    #[arg(long, env = "FX_STRICT_FEES")]
    strict_fees: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported currencies
    Currencies,
    /// Show every effective rate
    Rates,
    /// Convert an amount between two currencies
    Convert {
        /// Amount (non-numeric text counts as 0)
        amount: String,
        from: String,
        to: String,
        /// Exchange the source and target currencies
        #[arg(long)]
        swap: bool,
    },
    /// Convert an amount into several currencies
    Multi {
        amount: String,
        base: String,
        /// Target currencies (comma-separated)
        #[arg(value_delimiter = ',')]
        targets: Vec<String>,
        /// Append this many further currencies not yet targeted
        #[arg(long, default_value_t = 0)]
        add: usize,
    },
    /// Convert and apply fee and tax
    Quote {
        amount: String,
        from: String,
        to: String,
        /// Fee percentage (default 2.5)
        #[arg(long)]
        fee: Option<String>,
        /// Tax percentage (default 0)
        #[arg(long)]
        tax: Option<String>,
    },
    /// Check whether a rate alert would fire right now
    AlertCheck {
        from: String,
        to: String,
        /// Target rate
        #[arg(long)]
        target: f64,
        /// above or below
        #[arg(long, default_value = "above")]
        condition: String,
    },
    /// Start a local listener that prints alert webhooks
    Listen {
        /// Port to listen on
        #[arg(long, default_value = "9000")]
        port: u16,
    },
}

/// Extends `targets` with `add` currencies that are neither the base nor
/// already present.
fn fill_targets(base: &str, targets: Vec<String>, add: usize) -> Result<Vec<String>> {
    let base: CurrencyCode = base.parse()?;
    let mut codes = targets
        .iter()
        .map(|t| t.parse::<CurrencyCode>())
        .collect::<Result<Vec<_>, _>>()?;

    for _ in 0..add {
        match next_available_target(base, &codes) {
            Some(next) => codes.push(next),
            None => break,
        }
    }
    Ok(codes.iter().map(|c| c.code().to_string()).collect())
}

async fn load_service(cli: &Cli) -> Result<FxService<JsonFileStore>> {
    let completion = match &cli.pivot {
        Some(code) => CompletionPolicy::ViaPivot(code.parse()?),
        None => CompletionPolicy::ReciprocalOnly,
    };

    let service = FxService::new(
        build_provider(cli.rates_file.as_deref()),
        JsonFileStore::new(&cli.snapshot),
        Box::new(LogNotifier),
        ServiceOptions {
            completion,
            strict_fees: cli.strict_fees,
        },
    );
    let state = service.refresh().await?;
    if state.offline {
        eprintln!(
            "⚠ Rate source unavailable, using snapshot from {}",
            state.last_updated
        );
    }
    Ok(service)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Currencies => {
            let currencies: Vec<CurrencyInfo> =
                CurrencyCode::all().iter().copied().map(Into::into).collect();
            println!("{}", serde_json::to_string_pretty(&currencies)?);
        }

        Commands::Rates => {
            let service = load_service(&cli).await?;
            println!("{}", serde_json::to_string_pretty(&service.rates()?)?);
        }

        Commands::Convert {
            amount,
            from,
            to,
            swap,
        } => {
            let (from, to) = if *swap { (to, from) } else { (from, to) };
            let service = load_service(&cli).await?;
            let conversion = service.convert(ConvertRequest {
                amount: AmountInput::Text(amount.clone()),
                from: from.clone(),
                to: to.clone(),
            })?;
            let response = ConversionResponse::from(conversion);
            if !response.rate_available {
                eprintln!("⚠ No rate for {}/{}, converted at parity", from, to);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Multi {
            amount,
            base,
            targets,
            add,
        } => {
            let targets = fill_targets(base, targets.clone(), *add)?;
            if targets.is_empty() {
                anyhow::bail!("No target currencies given");
            }
            let service = load_service(&cli).await?;
            let result = service.convert_many(MultiConvertRequest {
                amount: AmountInput::Text(amount.clone()),
                base: base.clone(),
                targets,
            })?;
            println!(
                "{}",
                serde_json::to_string_pretty(&MultiConvertResponse::from(result))?
            );
        }

        Commands::Quote {
            amount,
            from,
            to,
            fee,
            tax,
        } => {
            let service = load_service(&cli).await?;
            let quote = service.quote(QuoteRequest {
                amount: AmountInput::Text(amount.clone()),
                from: from.clone(),
                to: to.clone(),
                fee_percent: fee.clone().map(AmountInput::Text),
                tax_percent: tax.clone().map(AmountInput::Text),
            })?;
            println!(
                "{}",
                serde_json::to_string_pretty(&QuoteResponse::from(quote))?
            );
        }

        Commands::AlertCheck {
            from,
            to,
            target,
            condition,
        } => {
            let service = load_service(&cli).await?;
            service.create_alert(CreateAlertRequest {
                from: from.clone(),
                to: to.clone(),
                target_rate: *target,
                condition: condition.parse()?,
            })?;
            let evaluations = service.check_alerts().await?;
            println!("{}", serde_json::to_string_pretty(&evaluations)?);
            if evaluations.iter().any(|e| e.fired) {
                println!("🔔 Alert fired");
            } else {
                println!("✓ Alert not triggered");
            }
        }

        Commands::Listen { port } => {
            let app = axum::Router::new().route("/alerts", axum::routing::post(handle_alert));
            let addr = std::net::SocketAddr::from(([127, 0, 0, 1], *port));
            println!("Listening for alert webhooks on http://{}/alerts", addr);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

async fn handle_alert(body: String) -> impl axum::response::IntoResponse {
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => println!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or(body)
        ),
        Err(_) => println!("{}", body),
    }
    println!("----------------------------------------");
    axum::http::StatusCode::OK
}
