//! The Spotter - FX Arbitrage Scanner
//!
//! Run with: cargo run
//!
//! Pipeline: fetch per-base rate sheets from the quote service, assemble
//! the immutable rate matrix, then run the three read-only analyses over
//! it: triangular enumeration, Bellman-Ford negative-cycle detection, and
//! single-leg deviation ranking.

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod brain;
mod cartographer;
mod config;
mod currencies;
mod report;

use brain::NegativeCycleDetector;
use cartographer::{RateFetcher, RateGraph, RateMatrix};
use config::{Config, OpportunityLog};

#[derive(Parser, Debug)]
#[command(name = "spotter", version, about = "FX arbitrage scanner")]
struct Cli {
    /// Comma-separated currency codes to analyze
    #[arg(long)]
    currencies: Option<String>,

    /// Starting amount for the simulated triangular trade
    #[arg(long)]
    amount: Option<f64>,

    /// Notional for the single-leg profitability table
    #[arg(long)]
    notional: Option<f64>,

    /// Ranked rows to print per table
    #[arg(long)]
    top: Option<usize>,

    /// Load configuration from a TOML file instead of the environment
    #[arg(long)]
    config: Option<PathBuf>,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!(
        "{}",
        style(" 🎯 THE SPOTTER - FX Arbitrage Scanner").cyan().bold()
    );
    println!(
        "{}",
        style("    Rate Matrix | Triangular Loops | Negative Cycles | Single Leg").cyan()
    );
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spotter=info".parse()?),
        )
        .init();

    print_banner();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(raw) = &cli.currencies {
        config.currencies = config::parse_currency_list(raw)?;
    }
    if let Some(amount) = cli.amount {
        config.starting_amount = amount;
    }
    if let Some(notional) = cli.notional {
        config.single_leg_notional = notional;
    }
    if let Some(top) = cli.top {
        config.top_results = top;
    }

    config.validate().wrap_err("configuration validation failed")?;
    config.print_summary();
    println!();

    // =============================================
    // PHASE 1: THE CARTOGRAPHER
    // =============================================
    println!(
        "{}",
        style("═══ PHASE 1: THE CARTOGRAPHER ═══").blue().bold()
    );
    println!();

    println!(
        "{}",
        style(format!(
            "Step 1.1: Fetching rates for {} base currencies...",
            config.currencies.len()
        ))
        .blue()
    );
    let start = Instant::now();

    let fetcher = RateFetcher::new(
        config.api_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let bar = ProgressBar::new(config.currencies.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "  {msg:>4} [{bar:30}] {pos}/{len}",
    )?);

    // One request per base, sequentially; any failure aborts the snapshot
    let mut sheets = Vec::with_capacity(config.currencies.len());
    for &base in &config.currencies {
        bar.set_message(base.code().to_string());
        let targets: Vec<_> = config
            .currencies
            .iter()
            .copied()
            .filter(|&c| c != base)
            .collect();
        let sheet = fetcher
            .fetch(base, &targets)
            .await
            .wrap_err_with(|| format!("aborting: rate fetch failed for base {}", base))?;
        sheets.push(sheet);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let fetch_time = start.elapsed();
    println!(
        "{} Fetched {} rate sheets in {:?}",
        style("✓").green(),
        sheets.len(),
        fetch_time
    );

    println!();
    println!("{}", style("Step 1.2: Building the rate matrix...").blue());
    let matrix = RateMatrix::from_sheets(&config.currencies, &sheets);
    println!(
        "{} Matrix has {} quoted pairs across {} currencies",
        style("✓").green(),
        matrix.quoted_pairs(),
        matrix.currencies().len()
    );

    report::print_rate_matrix(&matrix);

    println!();
    println!(
        "{}",
        style("Step 1.3: Projecting into log space...").blue()
    );
    let graph = RateGraph::from_matrix(&matrix);
    println!(
        "{} Graph built: {} nodes, {} edges",
        style("✓").green(),
        graph.node_count(),
        graph.edge_count()
    );

    // =============================================
    // PHASE 2: THE BRAIN
    // =============================================
    println!();
    println!("{}", style("═══ PHASE 2: THE BRAIN ═══").magenta().bold());
    println!();

    println!(
        "{}",
        style("Step 2.1: Enumerating triangular loops...").magenta()
    );
    let start = Instant::now();
    let triangles = brain::scan_triangles(&matrix, config.starting_amount);
    println!(
        "{} Evaluated {} ordered triples in {:?}",
        style("✓").green(),
        triangles.len(),
        start.elapsed()
    );

    report::print_triangles(&triangles, config.top_results);

    println!();
    println!(
        "{}",
        style("Step 2.2: Scanning for negative cycles...").magenta()
    );
    let start = Instant::now();
    let findings = NegativeCycleDetector::new(&graph).detect_all();
    println!(
        "{} Relaxation scan finished in {:?}",
        style("✓").green(),
        start.elapsed()
    );

    report::print_findings(&findings, config.top_results);

    // =============================================
    // PHASE 3: THE SCALPEL
    // =============================================
    println!();
    println!("{}", style("═══ PHASE 3: THE SCALPEL ═══").cyan().bold());
    println!();

    println!(
        "{}",
        style("Step 3.1: Ranking single-leg deviations...").cyan()
    );
    let deviations = brain::analyze_pairs(&matrix);
    println!(
        "{} {} pairs have implied-rate coverage",
        style("✓").green(),
        deviations.len()
    );

    report::print_deviations(&deviations, config.top_results, config.single_leg_notional);

    if let Some(most_mispriced) = deviations.first() {
        report::print_pair_breakdown(most_mispriced);
    }
    report::print_spread_check(&deviations);

    // =============================================
    // OPPORTUNITY LOG
    // =============================================
    if config.opportunity_log {
        let mut logged = 0usize;
        for triangle in triangles.iter().filter(|t| t.is_profitable()) {
            let entry = OpportunityLog::from_triangle(triangle, matrix.date());
            match entry.append_to_file(&config.opportunity_log_path) {
                Ok(()) => logged += 1,
                Err(e) => {
                    warn!("failed to append opportunity log: {}", e);
                    break;
                }
            }
        }
        if logged > 0 {
            info!(
                "{} profitable paths logged to {}",
                logged, config.opportunity_log_path
            );
        }
    }

    // =============================================
    // SUMMARY
    // =============================================
    report::print_summary(&triangles, &findings, &deviations);

    Ok(())
}
