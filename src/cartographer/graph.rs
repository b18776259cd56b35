//! Log-Space Rate Graph
//!
//! Taking `-ln(rate)` as the edge weight turns the multiplicative
//! no-arbitrage invariant into an additive one: a trading loop whose rate
//! product exceeds 1 becomes a cycle with negative total weight, which the
//! Bellman-Ford pass in the brain can detect.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::{debug, warn};

use super::matrix::RateMatrix;
use crate::currencies::Currency;

/// Edge data for one quoted direct rate
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// The quoted rate (units of target per unit of source)
    pub rate: f64,

    /// `-ln(rate)`
    pub weight: f64,
}

/// Directed graph over the analyzed currencies, one edge per quoted
/// off-diagonal pair.
pub struct RateGraph {
    pub graph: DiGraph<Currency, EdgeData>,
    currency_to_node: HashMap<Currency, NodeIndex>,
}

impl RateGraph {
    /// Build the edge list from a matrix. Self-rates are skipped, and
    /// non-positive rates are excluded rather than fed to the logarithm.
    pub fn from_matrix(matrix: &RateMatrix) -> Self {
        let mut graph = DiGraph::new();
        let mut currency_to_node = HashMap::new();

        for &currency in matrix.currencies() {
            let node = graph.add_node(currency);
            currency_to_node.insert(currency, node);
        }

        let mut skipped_invalid = 0usize;

        // Iterate in universe order so edge order (and with it the order of
        // detector findings) is stable across runs.
        for &src in matrix.currencies() {
            for &dst in matrix.currencies() {
                if src == dst {
                    continue;
                }
                let Some(rate) = matrix.get(src, dst) else {
                    continue;
                };
                if rate <= 0.0 || !rate.is_finite() {
                    skipped_invalid += 1;
                    continue;
                }
                graph.add_edge(
                    currency_to_node[&src],
                    currency_to_node[&dst],
                    EdgeData {
                        rate,
                        weight: -rate.ln(),
                    },
                );
            }
        }

        if skipped_invalid > 0 {
            warn!("skipped {} non-positive rates", skipped_invalid);
        }

        debug!(
            "rate graph built: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self {
            graph,
            currency_to_node,
        }
    }

    pub fn node(&self, currency: Currency) -> Option<NodeIndex> {
        self.currency_to_node.get(&currency).copied()
    }

    pub fn currency(&self, node: NodeIndex) -> Option<Currency> {
        self.graph.node_weight(node).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap as StdHashMap;

    fn c(code: &str) -> Currency {
        code.parse().unwrap()
    }

    fn matrix_of(currencies: &[&str], quotes: &[(&str, &str, f64)]) -> RateMatrix {
        let list: Vec<Currency> = currencies.iter().map(|s| c(s)).collect();
        let mut map = StdHashMap::new();
        for &(a, b, r) in quotes {
            map.insert((c(a), c(b)), r);
        }
        RateMatrix::from_rates(list, map, None)
    }

    #[test]
    fn test_weights_are_negative_log_rates() {
        let matrix = matrix_of(&["USD", "EUR"], &[("USD", "EUR", 2.0)]);
        let graph = RateGraph::from_matrix(&matrix);

        assert_eq!(graph.edge_count(), 1);
        let edge = graph.graph.edge_weights().next().unwrap();
        assert_eq!(edge.rate, 2.0);
        assert!((edge.weight - (-2.0f64.ln())).abs() < 1e-12);
    }

    #[test]
    fn test_self_rates_produce_no_edges() {
        let matrix = matrix_of(&["USD", "EUR"], &[]);
        let graph = RateGraph::from_matrix(&matrix);

        // Diagonal entries exist in the matrix but never become edges
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_non_positive_rates_are_excluded() {
        let matrix = matrix_of(
            &["USD", "EUR", "GBP"],
            &[
                ("USD", "EUR", 0.86),
                ("EUR", "GBP", 0.0),
                ("GBP", "USD", -1.5),
            ],
        );
        let graph = RateGraph::from_matrix(&matrix);

        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_isolated_currency_is_a_bare_node() {
        let matrix = matrix_of(
            &["USD", "EUR", "JPY"],
            &[("USD", "EUR", 0.86), ("EUR", "USD", 1.16)],
        );
        let graph = RateGraph::from_matrix(&matrix);

        let jpy = graph.node(c("JPY")).unwrap();
        assert_eq!(graph.graph.edges(jpy).count(), 0);
        assert_eq!(graph.currency(jpy), Some(c("JPY")));
    }
}
