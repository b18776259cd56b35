//! Configuration for The Spotter
//!
//! Every knob has an environment default so a bare `cargo run` works; a
//! TOML file or CLI flags can override.

use chrono::{DateTime, NaiveDate, Utc};
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::brain::TriangleResult;
use crate::cartographer;
use crate::currencies::{self, Currency};

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // ========== Quote Service ==========
    /// Endpoint serving per-base rate sheets
    pub api_url: String,

    /// Fixed per-request timeout in seconds
    pub request_timeout_secs: u64,

    // ========== Analysis Universe ==========
    /// The ordered currency set; every analysis runs over exactly this list
    pub currencies: Vec<Currency>,

    // ========== Trade Sizing ==========
    /// Starting amount for the simulated triangular trade
    pub starting_amount: f64,

    /// Notional for the single-leg profitability table
    pub single_leg_notional: f64,

    // ========== Reporting ==========
    /// Ranked rows to print per table
    pub top_results: usize,

    // ========== Opportunity Log ==========
    /// Append profitable triangular paths to a JSON-lines log
    pub opportunity_log: bool,

    pub opportunity_log_path: String,
}

impl Config {
    /// Load configuration from environment variables and a `.env` file.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let currencies = match env::var("CURRENCIES") {
            Ok(raw) => parse_currency_list(&raw)?,
            Err(_) => currencies::default_universe(),
        };

        Ok(Self {
            api_url: env::var("API_URL")
                .unwrap_or_else(|_| cartographer::DEFAULT_API_URL.to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(cartographer::REQUEST_TIMEOUT_SECS),
            currencies,
            starting_amount: env::var("STARTING_AMOUNT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10_000.0),
            single_leg_notional: env::var("SINGLE_LEG_NOTIONAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100_000.0),
            top_results: env::var("TOP_RESULTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(20),
            opportunity_log: env::var("OPPORTUNITY_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            opportunity_log_path: env::var("OPPORTUNITY_LOG_PATH")
                .unwrap_or_else(|_| "./logs/opportunities.log".to_string()),
        })
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .wrap_err_with(|| format!("cannot read {}", path.as_ref().display()))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Sanity-check before running.
    pub fn validate(&self) -> Result<()> {
        if self.currencies.len() < 3 {
            return Err(eyre!(
                "need at least 3 currencies for a triangular loop (got {})",
                self.currencies.len()
            ));
        }

        let mut seen = HashSet::new();
        for &currency in &self.currencies {
            if !seen.insert(currency) {
                return Err(eyre!("duplicate currency in CURRENCIES: {}", currency));
            }
        }

        if self.starting_amount <= 0.0 {
            return Err(eyre!("STARTING_AMOUNT must be positive"));
        }
        if self.single_leg_notional <= 0.0 {
            return Err(eyre!("SINGLE_LEG_NOTIONAL must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(eyre!("REQUEST_TIMEOUT_SECS must be at least 1"));
        }
        if self.top_results == 0 {
            return Err(eyre!("TOP_RESULTS must be at least 1"));
        }

        Ok(())
    }

    /// Number of ordered triples the enumerator will evaluate.
    pub fn triple_count(&self) -> usize {
        let n = self.currencies.len();
        n * n.saturating_sub(1) * n.saturating_sub(2)
    }

    /// Print configuration summary.
    pub fn print_summary(&self) {
        let codes = self
            .currencies
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(", ");

        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              THE SPOTTER - CONFIGURATION                   ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Currencies:        {:<39} ║", codes);
        println!("║ Ordered triples:   {:<39} ║", self.triple_count());
        println!("║ Starting Amount:   ${:<38.2} ║", self.starting_amount);
        println!("║ Single-Leg Size:   ${:<38.2} ║", self.single_leg_notional);
        println!("║ Request Timeout:   {:<37}s  ║", self.request_timeout_secs);
        println!("║ Top Results:       {:<39} ║", self.top_results);
        println!(
            "║ Opportunity Log:   {:<39} ║",
            if self.opportunity_log {
                "✓ Enabled"
            } else {
                "✗ Disabled"
            }
        );
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: cartographer::DEFAULT_API_URL.to_string(),
            request_timeout_secs: cartographer::REQUEST_TIMEOUT_SECS,
            currencies: currencies::default_universe(),
            starting_amount: 10_000.0,
            single_leg_notional: 100_000.0,
            top_results: 20,
            opportunity_log: false,
            opportunity_log_path: "./logs/opportunities.log".to_string(),
        }
    }
}

/// Parse a comma-separated code list, e.g. `"USD,EUR,GBP"`.
pub fn parse_currency_list(raw: &str) -> Result<Vec<Currency>> {
    raw.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse())
        .collect()
}

// ============================================
// OPPORTUNITY LOGGER
// ============================================

/// A profitable triangular path, appended as one JSON line per finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunityLog {
    pub timestamp: DateTime<Utc>,
    pub rate_date: Option<NaiveDate>,
    pub path: String,
    pub product: f64,
    pub start_amount: f64,
    pub end_amount: f64,
    pub profit: f64,
    pub profit_pct: f64,
}

impl OpportunityLog {
    pub fn from_triangle(triangle: &TriangleResult, rate_date: Option<NaiveDate>) -> Self {
        Self {
            timestamp: Utc::now(),
            rate_date,
            path: triangle.path_string(),
            product: triangle.product,
            start_amount: triangle.start_amount,
            end_amount: triangle.end_amount,
            profit: triangle.profit,
            profit_pct: triangle.profit_pct,
        }
    }

    /// Append this log to a file.
    pub fn append_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        let json = serde_json::to_string(self)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }
}
