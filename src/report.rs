//! Console reporting
//!
//! Renders the cartographer's matrix and the brain's ranked results as
//! aligned tables. Presentation only: every number here is computed by
//! the analysis modules.

use console::style;

use crate::brain::{CycleFinding, PairDeviation, TriangleResult};
use crate::cartographer::RateMatrix;
use crate::currencies::{self, LiquidityTier};

/// Aligned N x N table of the fetched matrix; unquoted pairs print as a dash.
pub fn print_rate_matrix(matrix: &RateMatrix) {
    let currencies = matrix.currencies();

    println!();
    println!("{}", style("═══ EXCHANGE RATE MATRIX ═══").blue().bold());
    if let Some(date) = matrix.date() {
        println!("Snapshot date: {}", date);
    }
    println!();

    let mut header = format!("{:>6}", "");
    for c in currencies {
        header.push_str(&format!("{:>12}", c.code()));
    }
    println!("{}", style(header).bold());

    for &base in currencies {
        let mut row = format!("{:>6}", base.code());
        for &quote in currencies {
            match matrix.get(base, quote) {
                Some(rate) => row.push_str(&format!("{:>12.4}", rate)),
                None => row.push_str(&format!("{:>12}", "-")),
            }
        }
        println!("{}", row);
    }

    println!();
    for &currency in currencies {
        match currencies::info(currency) {
            Some(info) => println!(
                "  {}  {} ({:?})",
                currency.code(),
                info.name,
                info.tier
            ),
            None => println!("  {}  (unrecognized code)", currency.code()),
        }
    }
}

/// Ranked triangular paths.
pub fn print_triangles(results: &[TriangleResult], top: usize) {
    println!();
    println!(
        "{}",
        style("═══ TRIANGULAR ARBITRAGE ANALYSIS ═══").magenta().bold()
    );
    println!();

    if results.is_empty() {
        println!("{}", style("No fully-quoted triples to evaluate.").yellow());
        return;
    }

    println!("Top {} paths by absolute profit:", top.min(results.len()));
    println!(
        "{}",
        style(format!(
            "{:<30} {:>10} {:>14} {:>12} {:>11}",
            "Path", "Product", "End", "Profit", "Profit %"
        ))
        .bold()
    );
    println!("{}", "-".repeat(80));

    for r in results.iter().take(top) {
        let marker = if r.is_profitable() {
            style("▲").green()
        } else {
            style("▽").dim()
        };
        println!(
            "{} {:<28} {:>10.6} {:>14.4} {:>12.4} {:>10.6}%",
            marker,
            r.path_string(),
            r.product,
            r.end_amount,
            r.profit,
            r.profit_pct
        );
    }
}

/// Negative-cycle findings, or the arbitrage-free message.
pub fn print_findings(findings: &[CycleFinding], top: usize) {
    println!();
    println!(
        "{}",
        style("═══ NEGATIVE CYCLE DETECTION (Bellman-Ford) ═══")
            .magenta()
            .bold()
    );
    println!();

    if findings.is_empty() {
        println!(
            "{}",
            style("No negative cycles detected (snapshot is arbitrage-free within tolerance).")
                .green()
        );
        return;
    }

    println!(
        "Found {} negative cycle indicators:",
        style(findings.len()).red().bold()
    );
    for f in findings.iter().take(top) {
        print!(
            "  source {:>4} | edge {:<12} | improvement {:.8}",
            f.source.code(),
            f.edge_label(),
            f.improvement
        );
        match (f.cycle_path(), f.loop_product) {
            (Some(path), Some(product)) => {
                println!(" | loop {} ({:.6}x)", style(path).cyan(), product)
            }
            (Some(path), None) => println!(" | loop {}", style(path).cyan()),
            _ => println!(),
        }
    }
    if findings.len() > top {
        println!("  ... and {} more", findings.len() - top);
    }
}

/// Ranked pair deviations plus the linear profitability table.
pub fn print_deviations(deviations: &[PairDeviation], top: usize, notional: f64) {
    println!();
    println!(
        "{}",
        style("═══ SINGLE-LEG DEVIATION ANALYSIS ═══").cyan().bold()
    );
    println!();

    if deviations.is_empty() {
        println!(
            "{}",
            style("No pair has both a direct quote and a usable intermediary.").yellow()
        );
        return;
    }

    println!("Top {} pairs by deviation from implied cross-rate:", top.min(deviations.len()));
    println!(
        "{}",
        style(format!(
            "{:<10} {:>12} {:>12} {:>12} {:>9} {:>12}",
            "Pair", "Actual", "Avg Implied", "Deviation%", "Best Via", "Best Dev%"
        ))
        .bold()
    );
    println!("{}", "-".repeat(72));

    for d in deviations.iter().take(top) {
        println!(
            "{:<10} {:>12.6} {:>12.6} {:>+12.6} {:>9} {:>+12.6}",
            d.pair_label(),
            d.actual,
            d.avg_implied,
            d.deviation_pct,
            d.best_via.code(),
            d.best_deviation_pct
        );
    }

    println!();
    println!(
        "Profitability at ${:.0} notional (gross = notional x |deviation| / 100):",
        notional
    );
    println!(
        "{}",
        style(format!(
            "{:<10} {:>12} {:>14} {:>19} {:>10}",
            "Pair", "Deviation%", "Gross Profit", "Break-Even Spread", "Direction"
        ))
        .bold()
    );
    println!("{}", "-".repeat(70));

    for d in deviations.iter().take(top) {
        println!(
            "{:<10} {:>+12.6} {:>13.2} {:>18.6}% {:>10}",
            d.pair_label(),
            d.deviation_pct,
            d.gross_profit(notional),
            d.break_even_spread_pct(),
            d.direction()
        );
    }
}

/// Per-intermediary breakdown of the single most mispriced pair.
pub fn print_pair_breakdown(deviation: &PairDeviation) {
    println!();
    println!(
        "{}",
        style(format!("═══ DETAILED BREAKDOWN: {} ═══", deviation.pair_label()))
            .cyan()
            .bold()
    );
    println!();
    println!("Actual rate:          {:.6}", deviation.actual);
    println!("Average implied rate: {:.6}", deviation.avg_implied);
    println!("Deviation:            {:+.6}%", deviation.deviation_pct);
    println!();
    println!("Implied rates via each intermediary:");

    let mut implied = deviation.implied.clone();
    implied.sort_by(|x, y| {
        (deviation.actual - y.implied)
            .abs()
            .partial_cmp(&(deviation.actual - x.implied).abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for rate in &implied {
        let dev_pct = (deviation.actual - rate.implied) / rate.implied * 100.0;
        println!(
            "  via {:>4}: {:>12.6} = {:.6} x {:.6} (deviation: {:>+.6}%)",
            rate.via.code(),
            rate.implied,
            rate.leg_to_via,
            rate.leg_from_via,
            dev_pct
        );
    }
}

/// Compare deviations against typical spreads per liquidity tier.
pub fn print_spread_check(deviations: &[PairDeviation]) {
    println!();
    println!("{}", style("═══ SPREAD REALITY CHECK ═══").yellow().bold());
    println!();

    let above_retail: Vec<_> = deviations
        .iter()
        .filter(|d| {
            let tier = currencies::pair_tier(d.base, d.quote);
            d.break_even_spread_pct() > tier.typical_retail_spread_pct()
        })
        .collect();
    let above_institutional: Vec<_> = deviations
        .iter()
        .filter(|d| {
            let tier = currencies::pair_tier(d.base, d.quote);
            d.break_even_spread_pct() > tier.typical_institutional_spread_pct()
        })
        .collect();

    println!("Typical spreads by pair tier (retail / institutional):");
    for tier in [
        LiquidityTier::Major,
        LiquidityTier::Minor,
        LiquidityTier::Exotic,
    ] {
        println!(
            "  {:<8} {:>7.3}% / {:.3}%",
            format!("{:?}:", tier),
            tier.typical_retail_spread_pct(),
            tier.typical_institutional_spread_pct()
        );
    }

    println!();
    println!(
        "Pairs with deviation above their retail spread:        {}",
        above_retail.len()
    );
    println!(
        "Pairs with deviation above their institutional spread: {}",
        above_institutional.len()
    );

    if !above_institutional.is_empty() {
        println!();
        println!("Potentially tradeable at institutional level:");
        for d in above_institutional.iter().take(10) {
            println!(
                "  {}: {:+.6}% (via {})",
                d.pair_label(),
                d.deviation_pct,
                d.best_via.code()
            );
        }
    }
}

/// Closing summary across all three analyses.
pub fn print_summary(
    triangles: &[TriangleResult],
    findings: &[CycleFinding],
    deviations: &[PairDeviation],
) {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").green()
    );
    println!("{}", style(" ✅ SCAN COMPLETE").green().bold());
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").green()
    );
    println!();

    let profitable: Vec<_> = triangles.iter().filter(|r| r.is_profitable()).collect();

    if let Some(best) = profitable.first() {
        println!("Best path: {}", style(best.path_string()).cyan().bold());
        println!(
            "  Product: {:.8} (departure from parity: {:+.8})",
            best.product,
            best.departure()
        );
        println!("  Start:   ${:>14.2}", best.start_amount);
        println!("  End:     ${:>14.2}", best.end_amount);
        println!(
            "  Profit:  ${:>14.4} ({:.6}%)",
            best.profit, best.profit_pct
        );
        let [a, b, c] = best.legs;
        println!(
            "  Rates: {}->{} {:.6} | {}->{} {:.6} | {}->{} {:.6}",
            a, b, best.rates[0], b, c, best.rates[1], c, a, best.rates[2]
        );
        println!();
        println!(
            "Profitable paths: {} of {} evaluated",
            profitable.len(),
            triangles.len()
        );
    } else {
        println!("No profitable triangular paths at current rates.");
        println!("(Expected for daily reference rates; differentials live at the tick level.)");
    }

    if !triangles.is_empty() {
        let min = triangles
            .iter()
            .map(|r| r.profit_pct)
            .fold(f64::INFINITY, f64::min);
        let max = triangles
            .iter()
            .map(|r| r.profit_pct)
            .fold(f64::NEG_INFINITY, f64::max);
        println!("Profit range: {:.6}% to {:.6}%", min, max);
    }

    println!("Negative-cycle findings: {}", findings.len());
    println!("Pairs with implied-rate coverage: {}", deviations.len());
}
