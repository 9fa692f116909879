//! Trident - Solana Triangular Arbitrage Scanner
//!
//! Run with: cargo run
//!
//! Each tick pulls a fresh pool snapshot from Raydium (and optionally
//! Lifinity), then walks every 3-hop cycle out of the base asset through
//! the constant-product simulator. Cycles clearing the profit threshold
//! get reported and handed to the executor.

use clap::Parser;
use color_eyre::eyre::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod engine;
mod executor;
mod mints;
mod pools;
mod report;

use config::{Config, ExecutionMode};
use engine::find_opportunities;
use executor::{ExecutionOutcome, Executor, Keypair};
use mints::MintBook;
use pools::SnapshotSource;

/// Triangular arbitrage scanner for Solana AMM pools
#[derive(Parser, Debug)]
#[command(name = "trident", version, about, long_about = None)]
struct Cli {
    /// Solana JSON-RPC endpoint
    #[arg(long)]
    rpc_url: Option<String>,

    /// Path to a Solana CLI keypair file (JSON array of 64 bytes)
    #[arg(long)]
    keypair: Option<String>,

    /// Base asset the cycles start and end in (ticker or raw mint address)
    #[arg(long)]
    base_token: Option<String>,

    /// Input amount in base asset units
    #[arg(long)]
    amount_in: Option<Decimal>,

    /// Minimum profit in base asset units for a cycle to qualify
    #[arg(long)]
    min_profit: Option<Decimal>,

    /// Seconds between scan ticks
    #[arg(long)]
    interval: Option<u64>,

    /// Force simulation mode regardless of EXECUTION_MODE
    #[arg(long)]
    simulate: bool,

    /// Run a single scan tick and exit
    #[arg(long)]
    once: bool,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🔱 TRIDENT - Solana Triangular Arbitrage Scanner")
            .cyan()
            .bold()
    );
    println!(
        "{}",
        style("    Raydium + Lifinity | 3-Hop Cycles | Exact Decimal Math").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

/// Flags beat environment variables; --simulate beats everything.
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(rpc_url) = &cli.rpc_url {
        config.rpc_url = rpc_url.clone();
    }
    if let Some(keypair) = &cli.keypair {
        config.keypair_path = keypair.clone();
    }
    if let Some(base_token) = &cli.base_token {
        config.base_token = base_token.clone();
    }
    if let Some(amount_in) = cli.amount_in {
        config.amount_in = amount_in;
    }
    if let Some(min_profit) = cli.min_profit {
        config.min_profit = min_profit;
    }
    if let Some(interval) = cli.interval {
        config.poll_interval_secs = interval;
    }
    if cli.simulate {
        config.execution_mode = ExecutionMode::Simulation;
    }
}

fn new_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trident=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    print_banner();

    // Load configuration
    let mut config = Config::from_env()?;
    apply_cli_overrides(&mut config, &cli);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file");
        return Err(e);
    }

    // Print configuration summary
    config.print_summary();
    println!();

    // =============================================
    // SETUP: SYMBOLS AND WALLET
    // =============================================
    println!("{}", style("═══ SETUP ═══").blue().bold());
    println!();

    let mut book = MintBook::from_config(&config);
    book.load().await;
    if book.is_empty() {
        warn!("Token list unavailable - reports will show raw mint addresses");
    } else {
        info!("Mint book ready: {} symbols", book.len());
    }

    let base_mint = book.resolve(&config.base_token);
    info!("Base asset: {} ({})", config.base_token, base_mint);

    // Production refuses to start without a loadable wallet. Simulation
    // never needs one.
    let signer = match config.execution_mode {
        ExecutionMode::Production => {
            let keypair = Keypair::from_file(&config.keypair_path)?;
            info!("Wallet loaded: {}", keypair.pubkey_hex());
            warn!("⚠️  Production mode selects the best cycle for submission!");
            Some(keypair)
        }
        ExecutionMode::Simulation => None,
    };

    let source = SnapshotSource::from_config(&config);
    if !source.lifinity_enabled() {
        debug!("Lifinity source disabled (LIFINITY_PROGRAM_ID not set)");
    }

    let executor = Executor::new(config.clone());

    // =============================================
    // SCAN LOOP
    // =============================================
    println!();
    println!("{}", style("═══ SCANNING ═══").blue().bold());
    println!();

    let mut tick: u64 = 0;
    loop {
        tick += 1;
        let start = Instant::now();

        // Fresh snapshot every tick; reserves go stale in seconds.
        let spinner = new_spinner(format!("Tick {}: fetching pool snapshot...", tick));
        let pools = source.fetch_snapshot().await;
        spinner.finish_and_clear();

        if pools.is_empty() {
            warn!("Tick {}: no pools fetched - retrying next tick", tick);
        } else {
            let opportunities =
                find_opportunities(&pools, &base_mint, config.amount_in, config.min_profit);

            report::print_tick_report(&opportunities, &book);

            match config.execution_mode {
                ExecutionMode::Simulation => {
                    for opportunity in &opportunities {
                        if let Err(e) = executor.execute(opportunity, signer.as_ref()).await {
                            warn!("Execution error: {}", e);
                        }
                    }
                }
                ExecutionMode::Production => {
                    // Submit only the single best cycle per tick
                    let best = opportunities
                        .iter()
                        .max_by(|a, b| a.profit.cmp(&b.profit));
                    if let Some(best) = best {
                        match executor.execute(best, signer.as_ref()).await {
                            Ok(ExecutionOutcome::Aborted { reason }) => {
                                warn!("Tick {}: execution aborted: {}", tick, reason);
                            }
                            Ok(_) => {}
                            Err(e) => error!("Execution failed: {}", e),
                        }
                    }
                }
            }

            info!(
                "Tick {}: {} pools, {} opportunities in {:?}",
                tick,
                pools.len(),
                opportunities.len(),
                start.elapsed()
            );
        }

        if cli.once {
            break;
        }

        tokio::time::sleep(Duration::from_secs(config.poll_interval_secs)).await;
    }

    Ok(())
}

// ============================================
// TESTS
// ============================================
