//! Quote Service Client
//!
//! Fetches spot rates from the quote service, one request per base
//! currency. A failed or malformed request is fatal for the whole
//! snapshot: there is no partial-matrix fallback.

use chrono::NaiveDate;
use eyre::{eyre, Result, WrapErr};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::currencies::Currency;

// ============================================
// CONSTANTS
// ============================================

/// Default quote service endpoint (ECB reference rates, no API key)
pub const DEFAULT_API_URL: &str = "https://api.frankfurter.dev/v1/latest";

/// Fixed per-request timeout
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("spotter/", env!("CARGO_PKG_VERSION"));

// ============================================
// API RESPONSE TYPES
// ============================================

/// Raw response from the quote service. A payload without a `rates`
/// field fails deserialization and aborts the run.
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Currency,
    date: NaiveDate,
    rates: HashMap<Currency, f64>,
}

/// One base currency's quotes against a set of targets, plus the
/// snapshot date the service reported.
#[derive(Debug, Clone)]
pub struct RateSheet {
    pub base: Currency,
    pub date: NaiveDate,
    pub rates: HashMap<Currency, f64>,
}

// ============================================
// FETCHER
// ============================================

/// HTTP client for the quote service.
pub struct RateFetcher {
    client: Client,
    api_url: String,
}

impl RateFetcher {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .wrap_err("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    /// Fetch the rates quoted with `base` as the base currency, for the
    /// given targets.
    pub async fn fetch(&self, base: Currency, targets: &[Currency]) -> Result<RateSheet> {
        let symbols = targets
            .iter()
            .map(|c| c.code())
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("base", base.code()), ("symbols", symbols.as_str())])
            .send()
            .await
            .wrap_err_with(|| format!("rate request for base {} failed", base))?;

        let status = response.status();
        if !status.is_success() {
            return Err(eyre!(
                "quote service returned {} for base {}",
                status,
                base
            ));
        }

        let payload: LatestRatesResponse = response
            .json()
            .await
            .wrap_err_with(|| format!("malformed rate payload for base {}", base))?;

        if payload.base != base {
            warn!(
                "quote service answered for base {} (requested {})",
                payload.base, base
            );
        }

        debug!(
            "fetched {} rates for base {} (snapshot {})",
            payload.rates.len(),
            base,
            payload.date
        );

        Ok(RateSheet {
            base,
            date: payload.date,
            rates: payload.rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rates_payload() {
        let json = r#"{
            "amount": 1.0,
            "base": "USD",
            "date": "2026-08-06",
            "rates": { "EUR": 0.8571, "GBP": 0.7482, "JPY": 147.33 }
        }"#;

        let payload: LatestRatesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.base.code(), "USD");
        assert_eq!(payload.date, NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());
        assert_eq!(payload.rates.len(), 3);

        let eur: Currency = "EUR".parse().unwrap();
        assert_eq!(payload.rates[&eur], 0.8571);
    }

    #[test]
    fn test_missing_rates_field_is_an_error() {
        let json = r#"{ "amount": 1.0, "base": "USD", "date": "2026-08-06" }"#;
        assert!(serde_json::from_str::<LatestRatesResponse>(json).is_err());
    }

    #[test]
    fn test_malformed_currency_key_is_an_error() {
        let json = r#"{
            "base": "USD",
            "date": "2026-08-06",
            "rates": { "EURO": 0.85 }
        }"#;
        assert!(serde_json::from_str::<LatestRatesResponse>(json).is_err());
    }
}
