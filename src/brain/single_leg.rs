//! Single-Leg Deviation Analyzer
//!
//! Full cycle trading pays transaction costs on every leg. A cheaper play
//! is to find the one pair whose quoted rate has drifted furthest from the
//! consensus implied by every third currency, and trade only that pair in
//! the correcting direction.
//!
//! The profitability model is deliberately linear: at a fixed notional,
//! gross profit is `notional * |deviation| / 100` and the break-even
//! spread equals the deviation itself. No slippage or liquidity effects.

use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

use crate::cartographer::RateMatrix;
use crate::currencies::Currency;

/// The rate implied for a pair by routing through one intermediary.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpliedRate {
    pub via: Currency,

    /// `rate(base, via) * rate(via, quote)`
    pub implied: f64,

    pub leg_to_via: f64,
    pub leg_from_via: f64,
}

/// Which way to trade a mispriced pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    /// Quoted below the implied consensus
    Buy,

    /// Quoted above the implied consensus
    Sell,
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Buy => write!(f, "BUY"),
            TradeDirection::Sell => write!(f, "SELL"),
        }
    }
}

/// How far one pair's quoted rate sits from its implied cross-rates.
#[derive(Debug, Clone, PartialEq)]
pub struct PairDeviation {
    pub base: Currency,
    pub quote: Currency,

    /// The directly quoted rate
    pub actual: f64,

    /// Arithmetic mean of the implied rates over all usable intermediaries
    pub avg_implied: f64,

    /// Deviation of the quote from the averaged consensus, in percent
    pub deviation_pct: f64,

    /// The intermediary whose implied rate diverges most from the quote
    pub best_via: Currency,
    pub best_implied: f64,
    pub best_deviation_pct: f64,

    /// Every usable intermediary's implied rate
    pub implied: Vec<ImpliedRate>,
}

impl PairDeviation {
    /// `"USD/EUR"`
    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }

    /// Overpriced pairs are sold, underpriced bought.
    pub fn direction(&self) -> TradeDirection {
        if self.deviation_pct > 0.0 {
            TradeDirection::Sell
        } else {
            TradeDirection::Buy
        }
    }

    /// Gross profit for trading the correction at a fixed notional.
    pub fn gross_profit(&self, notional: f64) -> f64 {
        notional * self.deviation_pct.abs() / 100.0
    }

    /// The transaction cost that would exactly erase the opportunity.
    pub fn break_even_spread_pct(&self) -> f64 {
        self.deviation_pct.abs()
    }
}

/// For every quoted ordered pair, derive the implied rate through each
/// third currency and measure how far the quote sits from the consensus.
/// Pairs with no usable intermediary are excluded. Results are ranked by
/// descending absolute deviation with the pair label as a stable tie-break.
pub fn analyze_pairs(matrix: &RateMatrix) -> Vec<PairDeviation> {
    let currencies = matrix.currencies();
    let mut results = Vec::new();

    for &base in currencies {
        for &quote in currencies {
            if base == quote {
                continue;
            }
            let Some(actual) = matrix.get(base, quote) else {
                continue;
            };

            let mut implied = Vec::new();
            for &via in currencies {
                if via == base || via == quote {
                    continue;
                }
                let (Some(leg_to_via), Some(leg_from_via)) =
                    (matrix.get(base, via), matrix.get(via, quote))
                else {
                    continue;
                };
                implied.push(ImpliedRate {
                    via,
                    implied: leg_to_via * leg_from_via,
                    leg_to_via,
                    leg_from_via,
                });
            }

            if implied.is_empty() {
                continue;
            }

            let avg_implied =
                implied.iter().map(|r| r.implied).sum::<f64>() / implied.len() as f64;
            let deviation_pct = (actual - avg_implied) / avg_implied * 100.0;

            // A zero implied average has no meaningful deviation; IEEE
            // division already yields the infinite sentinel, which we
            // treat as "no data" for this pair
            if !deviation_pct.is_finite() {
                debug!("dropping {}/{}: degenerate implied average", base, quote);
                continue;
            }

            let best = implied
                .iter()
                .max_by(|x, y| {
                    (actual - x.implied)
                        .abs()
                        .partial_cmp(&(actual - y.implied).abs())
                        .unwrap_or(Ordering::Equal)
                })
                .cloned();
            let Some(best) = best else {
                continue;
            };
            let best_deviation_pct = (actual - best.implied) / best.implied * 100.0;

            results.push(PairDeviation {
                base,
                quote,
                actual,
                avg_implied,
                deviation_pct,
                best_via: best.via,
                best_implied: best.implied,
                best_deviation_pct,
                implied,
            });
        }
    }

    results.sort_by(|x, y| {
        y.deviation_pct
            .abs()
            .partial_cmp(&x.deviation_pct.abs())
            .unwrap_or(Ordering::Equal)
            .then_with(|| x.pair_label().cmp(&y.pair_label()))
    });

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn c(code: &str) -> Currency {
        code.parse().unwrap()
    }

    fn matrix_of(currencies: &[&str], quotes: &[(&str, &str, f64)]) -> RateMatrix {
        let list: Vec<Currency> = currencies.iter().map(|s| c(s)).collect();
        let mut map = HashMap::new();
        for &(a, b, r) in quotes {
            map.insert((c(a), c(b)), r);
        }
        RateMatrix::from_rates(list, map, None)
    }

    /// A/B quoted at 1.10 while both intermediaries imply exactly 1.00.
    fn overpriced_pair() -> RateMatrix {
        matrix_of(
            &["AAA", "BBB", "CCC", "DDD"],
            &[
                ("AAA", "BBB", 1.10),
                ("AAA", "CCC", 2.0),
                ("CCC", "BBB", 0.5),
                ("AAA", "DDD", 4.0),
                ("DDD", "BBB", 0.25),
            ],
        )
    }

    #[test]
    fn test_average_and_deviation() {
        let results = analyze_pairs(&overpriced_pair());

        let ab = results
            .iter()
            .find(|r| r.base == c("AAA") && r.quote == c("BBB"))
            .expect("AAA/BBB should be analyzed");

        assert_eq!(ab.implied.len(), 2);
        assert!((ab.avg_implied - 1.0).abs() < 1e-12);
        assert!((ab.deviation_pct - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_profitability_model_is_linear() {
        let results = analyze_pairs(&overpriced_pair());
        let ab = results
            .iter()
            .find(|r| r.base == c("AAA") && r.quote == c("BBB"))
            .unwrap();

        assert_eq!(ab.direction(), TradeDirection::Sell);
        assert!((ab.gross_profit(100_000.0) - 10_000.0).abs() < 1e-6);
        assert!((ab.break_even_spread_pct() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_via_maximizes_divergence() {
        // Two intermediaries implying 1.00 and 1.50 against a quote of 1.10
        let matrix = matrix_of(
            &["AAA", "BBB", "CCC", "DDD"],
            &[
                ("AAA", "BBB", 1.10),
                ("AAA", "CCC", 2.0),
                ("CCC", "BBB", 0.5),
                ("AAA", "DDD", 3.0),
                ("DDD", "BBB", 0.5),
            ],
        );
        let results = analyze_pairs(&matrix);
        let ab = results
            .iter()
            .find(|r| r.base == c("AAA") && r.quote == c("BBB"))
            .unwrap();

        // |1.10 - 1.50| beats |1.10 - 1.00|
        assert_eq!(ab.best_via, c("DDD"));
        assert!((ab.best_implied - 1.5).abs() < 1e-12);
        assert!((ab.best_deviation_pct - (1.10 - 1.5) / 1.5 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_pair_without_intermediary_is_excluded() {
        // Only two currencies: no third leg exists
        let matrix = matrix_of(
            &["AAA", "BBB"],
            &[("AAA", "BBB", 1.10), ("BBB", "AAA", 0.9)],
        );
        assert!(analyze_pairs(&matrix).is_empty());
    }

    #[test]
    fn test_missing_leg_drops_only_that_intermediary() {
        // DDD is missing its second leg, CCC still works
        let matrix = matrix_of(
            &["AAA", "BBB", "CCC", "DDD"],
            &[
                ("AAA", "BBB", 1.10),
                ("AAA", "CCC", 2.0),
                ("CCC", "BBB", 0.5),
                ("AAA", "DDD", 4.0),
            ],
        );
        let results = analyze_pairs(&matrix);
        let ab = results
            .iter()
            .find(|r| r.base == c("AAA") && r.quote == c("BBB"))
            .unwrap();

        assert_eq!(ab.implied.len(), 1);
        assert_eq!(ab.implied[0].via, c("CCC"));
    }

    #[test]
    fn test_underpriced_pair_is_a_buy() {
        let matrix = matrix_of(
            &["AAA", "BBB", "CCC"],
            &[
                ("AAA", "BBB", 0.90),
                ("AAA", "CCC", 2.0),
                ("CCC", "BBB", 0.5),
            ],
        );
        let results = analyze_pairs(&matrix);
        let ab = results
            .iter()
            .find(|r| r.base == c("AAA") && r.quote == c("BBB"))
            .unwrap();

        assert!(ab.deviation_pct < 0.0);
        assert_eq!(ab.direction(), TradeDirection::Buy);
    }

    #[test]
    fn test_isolated_currency_never_appears() {
        let matrix = matrix_of(
            &["AAA", "BBB", "CCC", "ZZZ"],
            &[
                ("AAA", "BBB", 1.10),
                ("AAA", "CCC", 2.0),
                ("CCC", "BBB", 0.5),
            ],
        );
        let results = analyze_pairs(&matrix);

        assert!(!results.is_empty());
        assert!(results.iter().all(|r| {
            r.base != c("ZZZ")
                && r.quote != c("ZZZ")
                && r.implied.iter().all(|i| i.via != c("ZZZ"))
        }));
    }

    #[test]
    fn test_ranking_is_by_absolute_deviation() {
        let results = analyze_pairs(&overpriced_pair());
        for pair in results.windows(2) {
            assert!(pair[0].deviation_pct.abs() >= pair[1].deviation_pct.abs());
        }
    }
}
