//! Rate Matrix
//!
//! Complete direct-rate lookup over the analyzed currency set. Built once
//! per snapshot, then read by every analysis; nothing mutates it afterwards.
//! A missing off-diagonal entry means "pair not quoted" and is an expected
//! condition, not an error.

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::fetcher::RateSheet;
use crate::currencies::Currency;

/// `rates[(base, quote)]` means "1 unit of base buys `rate` units of quote".
/// The diagonal is always 1.0; the matrix need not be reciprocal or
/// transitive, and that asymmetry is exactly what the detectors look for.
#[derive(Debug, Clone)]
pub struct RateMatrix {
    currencies: Vec<Currency>,
    rates: HashMap<(Currency, Currency), f64>,
    date: Option<NaiveDate>,
}

impl RateMatrix {
    /// Build from raw pair quotes. The identity diagonal is forced for every
    /// listed currency; entries for currencies outside the set are dropped.
    pub fn from_rates(
        currencies: Vec<Currency>,
        quotes: HashMap<(Currency, Currency), f64>,
        date: Option<NaiveDate>,
    ) -> Self {
        let mut rates = HashMap::with_capacity(currencies.len() * currencies.len());
        for &c in &currencies {
            rates.insert((c, c), 1.0);
        }

        let mut ignored = 0usize;
        for ((base, quote), rate) in quotes {
            if !currencies.contains(&base) || !currencies.contains(&quote) {
                ignored += 1;
                continue;
            }
            if base == quote {
                // The diagonal is fixed at 1.0 regardless of input
                continue;
            }
            rates.insert((base, quote), rate);
        }

        if ignored > 0 {
            debug!("ignored {} quotes outside the analyzed set", ignored);
        }

        Self {
            currencies,
            rates,
            date,
        }
    }

    /// Assemble the matrix from per-base sheets, one per fetch request.
    pub fn from_sheets(currencies: &[Currency], sheets: &[RateSheet]) -> Self {
        let mut quotes = HashMap::new();
        let mut date = None;

        for sheet in sheets {
            if !currencies.contains(&sheet.base) {
                warn!("dropping sheet for {}: not in the analyzed set", sheet.base);
                continue;
            }
            date = date.or(Some(sheet.date));
            for (&target, &rate) in &sheet.rates {
                quotes.insert((sheet.base, target), rate);
            }
        }

        let matrix = Self::from_rates(currencies.to_vec(), quotes, date);
        info!(
            "rate matrix built: {} currencies, {} quoted pairs",
            matrix.currencies.len(),
            matrix.quoted_pairs()
        );
        matrix
    }

    /// Direct rate for (base, quote), if the pair is quoted.
    pub fn get(&self, base: Currency, quote: Currency) -> Option<f64> {
        self.rates.get(&(base, quote)).copied()
    }

    /// The analyzed set, in its fixed order.
    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Snapshot date reported by the quote service, if any sheet carried one.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Number of quoted off-diagonal entries.
    pub fn quoted_pairs(&self) -> usize {
        self.rates.keys().filter(|(a, b)| a != b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(code: &str) -> Currency {
        code.parse().unwrap()
    }

    fn sheet(base: &str, rates: &[(&str, f64)]) -> RateSheet {
        RateSheet {
            base: c(base),
            date: NaiveDate::from_ymd_opt(2026, 8, 6).unwrap(),
            rates: rates.iter().map(|&(t, r)| (c(t), r)).collect(),
        }
    }

    #[test]
    fn test_diagonal_is_identity() {
        let currencies = vec![c("USD"), c("EUR"), c("GBP")];
        let matrix = RateMatrix::from_sheets(&currencies, &[sheet("USD", &[("EUR", 0.86)])]);

        for &x in &currencies {
            assert_eq!(matrix.get(x, x), Some(1.0));
        }
    }

    #[test]
    fn test_out_of_set_rates_are_ignored() {
        let currencies = vec![c("USD"), c("EUR")];
        let matrix = RateMatrix::from_sheets(
            &currencies,
            &[sheet("USD", &[("EUR", 0.86), ("JPY", 147.3)])],
        );

        assert_eq!(matrix.get(c("USD"), c("EUR")), Some(0.86));
        assert_eq!(matrix.get(c("USD"), c("JPY")), None);
        assert_eq!(matrix.quoted_pairs(), 1);
    }

    #[test]
    fn test_missing_pairs_stay_missing() {
        let currencies = vec![c("USD"), c("EUR"), c("GBP")];
        let matrix = RateMatrix::from_sheets(
            &currencies,
            &[
                sheet("USD", &[("EUR", 0.86)]),
                sheet("EUR", &[("USD", 1.16), ("GBP", 0.87)]),
            ],
        );

        // GBP never quoted anything and USD->GBP was not returned
        assert_eq!(matrix.get(c("USD"), c("GBP")), None);
        assert_eq!(matrix.get(c("GBP"), c("USD")), None);
        assert_eq!(matrix.get(c("GBP"), c("GBP")), Some(1.0));
    }

    #[test]
    fn test_snapshot_date_comes_from_first_sheet() {
        let currencies = vec![c("USD"), c("EUR")];
        let matrix = RateMatrix::from_sheets(&currencies, &[sheet("USD", &[("EUR", 0.86)])]);
        assert_eq!(matrix.date(), NaiveDate::from_ymd_opt(2026, 8, 6));
    }

    #[test]
    fn test_diagonal_cannot_be_overridden() {
        let currencies = vec![c("USD"), c("EUR")];
        let mut quotes = HashMap::new();
        quotes.insert((c("USD"), c("USD")), 2.0);
        let matrix = RateMatrix::from_rates(currencies, quotes, None);
        assert_eq!(matrix.get(c("USD"), c("USD")), Some(1.0));
    }
}
