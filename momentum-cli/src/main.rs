//! Momentum CLI: validate configurations and run a one-shot ranking.
//!
//! Commands:
//! - `check`: validate a TOML config and print its fingerprint
//! - `rank`: warm the strategy from CSV bar files and print one cycle as JSON

mod data;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use momentum_core::components::RankedCandidate;
use momentum_core::domain::{OrderIntent, PortfolioSnapshot, Symbol};
use momentum_core::{MomentumStrategy, StrategyConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "momentum",
    about = "Momentum CLI: cross-sectional momentum ranking and rebalancing"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a TOML config file and print its fingerprint.
    Check {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,
    },
    /// Rank a universe of CSV bar files and print the resulting intents.
    Rank {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Directory of `<SYMBOL>.csv` files, including the benchmark.
        #[arg(long)]
        data_dir: PathBuf,

        /// Starting capital of the all-cash portfolio.
        #[arg(long, default_value_t = 100_000.0)]
        capital: f64,
    },
}

#[derive(Serialize)]
struct RankOutput {
    fingerprint: String,
    benchmark_price: Option<f64>,
    risk_on: bool,
    candidates: Vec<RankedCandidate>,
    intents: Vec<OrderIntent>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => run_check(&config),
        Commands::Rank {
            config,
            data_dir,
            capital,
        } => run_rank(&config, &data_dir, capital),
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: &Path) -> Result<StrategyConfig> {
    StrategyConfig::from_file(path)
        .with_context(|| format!("invalid config {}", path.display()))
}

fn run_check(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    println!("{}", config.fingerprint());
    Ok(())
}

fn run_rank(config_path: &Path, data_dir: &Path, capital: f64) -> Result<()> {
    let config = load_config(config_path)?;
    let fingerprint = config.fingerprint();
    let benchmark = config.benchmark.clone();
    let mut strategy = MomentumStrategy::new(config).context("failed to build strategy")?;

    let mut history = data::load_dir(data_dir)?;
    let benchmark_bars = history.remove(&benchmark).unwrap_or_default();
    if benchmark_bars.is_empty() {
        warn!(%benchmark, "no benchmark data; regime stays risk-off");
    }

    let mut added: Vec<Symbol> = history.keys().cloned().collect();
    added.sort();
    let portfolio = PortfolioSnapshot::flat(capital);
    strategy.on_universe_changed(&added, &[], &history, &portfolio);

    for bar in &benchmark_bars {
        strategy.on_bar(&benchmark, bar);
    }
    let benchmark_price = benchmark_bars.last().map(|b| b.close);

    let report = strategy.run_cycle(&portfolio, benchmark_price.unwrap_or(0.0));
    info!(
        universe = added.len(),
        candidates = report.candidates.len(),
        intents = report.intents.len(),
        "ranking complete"
    );

    let output = RankOutput {
        fingerprint,
        benchmark_price,
        risk_on: report.risk_on,
        candidates: report.candidates,
        intents: report.intents,
    };
    let json = serde_json::to_string_pretty(&output).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
