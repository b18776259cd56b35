//! Triangular Cycle Enumerator
//!
//! Every ordered triple (A, B, C) of distinct currencies is a candidate
//! loop A -> B -> C -> A; direction matters, so (A, B, C) and (A, C, B)
//! are evaluated separately. The no-arbitrage invariant requires the
//! product of the three leg rates to equal 1.0 exactly.

use std::cmp::Ordering;
use tracing::debug;

use crate::cartographer::RateMatrix;
use crate::currencies::Currency;

/// One evaluated loop, with the simulated trade of a fixed starting amount
/// through its three legs.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleResult {
    /// The loop's corners in trade order; the loop closes back on `legs[0]`
    pub legs: [Currency; 3],

    /// The three leg rates, in trade order
    pub rates: [f64; 3],

    /// Product of the leg rates; 1.0 means no arbitrage
    pub product: f64,

    pub start_amount: f64,
    pub end_amount: f64,
    pub profit: f64,
    pub profit_pct: f64,
}

impl TriangleResult {
    /// Signed departure from the no-arbitrage invariant.
    pub fn departure(&self) -> f64 {
        self.product - 1.0
    }

    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }

    /// `"USD → EUR → GBP → USD"`
    pub fn path_string(&self) -> String {
        let [a, b, c] = self.legs;
        format!("{} → {} → {} → {}", a, b, c, a)
    }
}

/// Evaluate every ordered triple with all three edges quoted. Triples with
/// a missing edge are skipped, not reported. Results are ranked by
/// descending absolute profit, with the rendered path as a stable tie-break
/// so equal-profit loops always come out in the same order.
pub fn scan_triangles(matrix: &RateMatrix, start_amount: f64) -> Vec<TriangleResult> {
    let currencies = matrix.currencies();
    let mut results = Vec::new();
    let mut skipped_unquoted = 0usize;

    for &a in currencies {
        for &b in currencies {
            if b == a {
                continue;
            }
            for &c in currencies {
                if c == a || c == b {
                    continue;
                }

                let (Some(rate_ab), Some(rate_bc), Some(rate_ca)) =
                    (matrix.get(a, b), matrix.get(b, c), matrix.get(c, a))
                else {
                    skipped_unquoted += 1;
                    continue;
                };

                let product = rate_ab * rate_bc * rate_ca;

                // Walk the notional through the three legs
                let step1 = start_amount * rate_ab;
                let step2 = step1 * rate_bc;
                let end_amount = step2 * rate_ca;
                let profit = end_amount - start_amount;

                results.push(TriangleResult {
                    legs: [a, b, c],
                    rates: [rate_ab, rate_bc, rate_ca],
                    product,
                    start_amount,
                    end_amount,
                    profit,
                    profit_pct: profit / start_amount * 100.0,
                });
            }
        }
    }

    if skipped_unquoted > 0 {
        debug!("skipped {} triples with an unquoted leg", skipped_unquoted);
    }

    results.sort_by(|x, y| {
        y.profit
            .abs()
            .partial_cmp(&x.profit.abs())
            .unwrap_or(Ordering::Equal)
            .then_with(|| x.path_string().cmp(&y.path_string()))
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

    /// Fully quoted 3-currency matrix with an injected arbitrage:
    /// A -> B -> C -> A multiplies out to 4.0.
    fn injected_arbitrage() -> RateMatrix {
        matrix_of(
            &["AAA", "BBB", "CCC"],
            &[
                ("AAA", "BBB", 2.0),
                ("BBB", "CCC", 2.0),
                ("CCC", "AAA", 1.0),
                ("BBB", "AAA", 0.5),
                ("CCC", "BBB", 0.25),
                ("AAA", "CCC", 1.0),
            ],
        )
    }

    #[test]
    fn test_product_and_profit_are_consistent() {
        let matrix = injected_arbitrage();
        let results = scan_triangles(&matrix, 10_000.0);

        // 3 currencies, all pairs quoted: 3! = 6 ordered triples
        assert_eq!(results.len(), 6);

        for r in &results {
            let [a, b, c] = r.legs;
            let expected = matrix.get(a, b).unwrap()
                * matrix.get(b, c).unwrap()
                * matrix.get(c, a).unwrap();
            assert_eq!(r.product, expected);
            assert!((r.profit - r.start_amount * (r.product - 1.0)).abs() < 1e-9);
            assert!((r.end_amount - r.start_amount - r.profit).abs() < 1e-9);
        }
    }

    #[test]
    fn test_injected_arbitrage_ranks_first_with_positive_profit() {
        let results = scan_triangles(&injected_arbitrage(), 10_000.0);

        let best = &results[0];
        assert_eq!(best.path_string(), "AAA → BBB → CCC → AAA");
        assert!((best.product - 4.0).abs() < 1e-12);
        assert!(best.is_profitable());
        assert!((best.profit - 30_000.0).abs() < 1e-6);
        assert!((best.profit_pct - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_edge_skips_only_affected_triples() {
        let matrix = matrix_of(
            &["AAA", "BBB", "CCC"],
            &[
                ("AAA", "BBB", 2.0),
                ("BBB", "CCC", 2.0),
                // CCC -> AAA unquoted
                ("BBB", "AAA", 0.5),
                ("CCC", "BBB", 0.25),
                ("AAA", "CCC", 1.0),
            ],
        );
        let results = scan_triangles(&matrix, 10_000.0);

        // The three rotations of the loop that needs CCC -> AAA are gone,
        // the other three ordered triples survive
        assert_eq!(results.len(), 3);
        for r in &results {
            let [a, b, cc] = r.legs;
            for (u, v) in [(a, b), (b, cc), (cc, a)] {
                assert!(!(u == c("CCC") && v == c("AAA")));
            }
        }
    }

    #[test]
    fn test_isolated_currency_never_appears() {
        let matrix = matrix_of(
            &["AAA", "BBB", "CCC", "ZZZ"],
            &[
                ("AAA", "BBB", 2.0),
                ("BBB", "CCC", 2.0),
                ("CCC", "AAA", 1.0),
            ],
        );
        let results = scan_triangles(&matrix, 10_000.0);

        assert!(results
            .iter()
            .all(|r| r.legs.iter().all(|&leg| leg != c("ZZZ"))));
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let matrix = injected_arbitrage();
        let first = scan_triangles(&matrix, 10_000.0);
        let second = scan_triangles(&matrix, 10_000.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_equal_profit_ties_break_lexically() {
        // Perfectly consistent rates: every loop has product 1.0, profit 0
        let matrix = matrix_of(
            &["AAA", "BBB", "CCC"],
            &[
                ("AAA", "BBB", 2.0),
                ("BBB", "AAA", 0.5),
                ("BBB", "CCC", 4.0),
                ("CCC", "BBB", 0.25),
                ("AAA", "CCC", 8.0),
                ("CCC", "AAA", 0.125),
            ],
        );
        let results = scan_triangles(&matrix, 10_000.0);

        let paths: Vec<String> = results.iter().map(|r| r.path_string()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }
}
