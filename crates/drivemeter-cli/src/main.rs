//! # drivemeter CLI entry point
//!
//! Loads configuration once, builds the lookup orchestrator, runs a single
//! lookup or paid-tier query and prints the JSON envelope to stdout.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use drivemeter_core::{LookupConfig, LookupResult, RegistrationNumber};
use drivemeter_lookup::{LookupOrchestrator, PaidTierAdapter};

/// Vehicle registration lookups with tiered fallback.
///
/// Results marked `"source": "simulated"` are synthetic.
#[derive(Parser, Debug)]
#[command(name = "drivemeter", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Full vehicle record.
    Vehicle {
        /// Registration number, e.g. "MH12AB1234"
        registration: String,
    },

    /// Traffic-violation entries.
    Challan {
        /// Registration number
        registration: String,
    },

    /// Registration certificate.
    Rc {
        /// Registration number
        registration: String,
    },

    /// Paid tier account balance.
    Balance,

    /// Status of a paid tier transaction.
    TxnStatus {
        /// Transaction id from an earlier paid lookup
        txn_id: String,
    },

    /// FASTag details from the paid tier.
    Fastag {
        /// Registration number
        registration: String,
    },

    /// Driving licence verification through the paid tier.
    #[command(alias = "license")]
    Licence {
        /// Licence number
        number: String,
        /// Date of birth, YYYY-MM-DD
        dob: NaiveDate,
    },
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Print an envelope and report whether it was successful.
fn emit<T: Serialize>(envelope: &T, success: bool) -> anyhow::Result<bool> {
    let json = serde_json::to_string_pretty(envelope).context("failed to serialize result")?;
    println!("{json}");
    Ok(success)
}

fn paid_adapter(config: &LookupConfig) -> anyhow::Result<PaidTierAdapter> {
    if !config.tiers.use_paid_tier {
        tracing::warn!("Paid tier is disabled in configuration; querying it anyway");
    }
    PaidTierAdapter::new(&config.paid_tier).context("failed to create paid tier client")
}

/// FASTag query; an invalid registration is a failure envelope, not an error.
async fn fastag(
    config: &LookupConfig,
    registration: &str,
) -> anyhow::Result<LookupResult<Value>> {
    match RegistrationNumber::parse(registration) {
        Ok(registration) => Ok(paid_adapter(config)?.get_fastag(&registration).await),
        Err(e) => Ok(LookupResult::failure(e.to_string())),
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = LookupConfig::load_with_env(cli.config.as_deref())
        .context("failed to load configuration")?;
    tracing::debug!("Loaded configuration: {:?}", config);

    match cli.command {
        Commands::Vehicle { registration } => {
            let orchestrator = LookupOrchestrator::from_config(&config)?;
            let result = orchestrator.get_vehicle_info(&registration).await;
            emit(&result, result.success)
        }
        Commands::Challan { registration } => {
            let orchestrator = LookupOrchestrator::from_config(&config)?;
            let result = orchestrator.get_challan_info(&registration).await;
            emit(&result, result.success)
        }
        Commands::Rc { registration } => {
            let orchestrator = LookupOrchestrator::from_config(&config)?;
            let result = orchestrator.get_rc_info(&registration).await;
            emit(&result, result.success)
        }
        Commands::Balance => {
            let result = paid_adapter(&config)?.check_balance().await;
            emit(&result, result.success)
        }
        Commands::TxnStatus { txn_id } => {
            let result = paid_adapter(&config)?
                .get_transaction_status(&txn_id)
                .await;
            emit(&result, result.success)
        }
        Commands::Fastag { registration } => {
            let result = fastag(&config, &registration).await?;
            emit(&result, result.success)
        }
        Commands::Licence { number, dob } => {
            let result = paid_adapter(&config)?
                .get_driving_license(&number, dob)
                .await;
            emit(&result, result.success)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("drivemeter v{} starting", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
