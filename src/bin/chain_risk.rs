//! Chain Risk CLI
//!
//! Reads a chain snapshot (JSON) and prints the risk report as JSON.
//!
//! Usage:
//!   cargo run --bin chain-risk -- --snapshot chain.json --days 30
//!   cargo run --bin chain-risk -- --snapshot chain.json --config risk.json

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;

use chain_risk::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "chain-risk")]
#[command(about = "Risk-neutral analytics for one option chain snapshot")]
struct Args {
    /// Snapshot JSON file (symbol, lastTrade, expiry, rows)
    #[arg(long)]
    snapshot: PathBuf,

    /// Days to expiry; defaults to the snapshot expiry counted from today
    #[arg(long)]
    days: Option<f64>,

    /// RiskConfig JSON file; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the risk-free rate
    #[arg(long)]
    rate: Option<f64>,

    /// Override the dividend yield
    #[arg(long)]
    dividend_yield: Option<f64>,

    /// Pretty-print the report
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RiskConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RiskConfig::default(),
    };
    if let Some(rate) = args.rate {
        config.risk_free_rate = rate;
    }
    if let Some(div) = args.dividend_yield {
        config.dividend_yield = div;
    }

    let snapshot = ChainSnapshot::from_path(&args.snapshot)
        .with_context(|| format!("loading snapshot {}", args.snapshot.display()))?;

    let days = match args.days {
        Some(days) => days,
        None => snapshot
            .days_to_expiry(Utc::now().date_naive())
            .ok_or_else(|| anyhow!("snapshot has no expiry; pass --days"))?,
    };

    info!(
        "Analyzing {} ({} rows, {:.0} days to expiry)",
        snapshot.symbol,
        snapshot.rows.len(),
        days
    );

    let result = RiskAnalyzer::with_config(config).analyze(&snapshot, days)?;

    for warning in &result.data_quality.warnings {
        tracing::warn!("{}", warning);
    }

    let out = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", out);

    Ok(())
}
