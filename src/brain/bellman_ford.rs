//! Negative-Cycle Detector (Bellman-Ford in log space)
//!
//! Triangular enumeration only sees 3-hop loops; a cycle of any length is
//! an arbitrage once its rate product exceeds 1. In `-ln(rate)` space that
//! product becomes a sum, so the search reduces to negative-cycle
//! detection: relax every edge up to N-1 times from each source, then run
//! one more pass. Any edge that still improves sits on (or reaches) a
//! negative cycle; non-convergence is the finding, not an error.

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use tracing::{debug, info};

use crate::cartographer::RateGraph;
use crate::currencies::Currency;

/// Tolerance for the post-pass check; absorbs floating-point noise from
/// the log transform.
pub const RELAXATION_EPSILON: f64 = 1e-10;

/// One negative-cycle indication: relaxing from `source`, the edge
/// `from -> to` still improved after N-1 rounds.
#[derive(Debug, Clone)]
pub struct CycleFinding {
    /// The relaxation source this was detected from
    pub source: Currency,

    /// Triggering edge
    pub from: Currency,
    pub to: Currency,

    /// How far the edge still relaxed past the converged distance
    pub improvement: f64,

    /// The closed loop walked back out of the predecessor chain
    /// (first == last). `None` only if the chain degenerates under
    /// floating-point noise.
    pub cycle: Option<Vec<Currency>>,

    /// Product of the quoted rates around the reconstructed loop
    pub loop_product: Option<f64>,
}

impl CycleFinding {
    pub fn edge_label(&self) -> String {
        format!("{} -> {}", self.from, self.to)
    }

    pub fn cycle_path(&self) -> Option<String> {
        self.cycle.as_ref().map(|loop_nodes| {
            loop_nodes
                .iter()
                .map(|c| c.code().to_string())
                .collect::<Vec<_>>()
                .join(" → ")
        })
    }

    /// Does the reconstructed loop pass through this currency?
    pub fn touches(&self, currency: Currency) -> bool {
        self.from == currency
            || self.to == currency
            || self
                .cycle
                .as_ref()
                .is_some_and(|loop_nodes| loop_nodes.contains(&currency))
    }
}

/// Bellman-Ford negative-cycle scan over the log-space rate graph.
pub struct NegativeCycleDetector<'a> {
    graph: &'a RateGraph,
}

impl<'a> NegativeCycleDetector<'a> {
    pub fn new(graph: &'a RateGraph) -> Self {
        Self { graph }
    }

    /// Relax from every currency in turn and collect post-pass findings.
    /// An empty result means the snapshot is arbitrage-free (within
    /// epsilon) from every source.
    pub fn detect_all(&self) -> Vec<CycleFinding> {
        let g = &self.graph.graph;
        let n = g.node_count();

        let edges: Vec<(NodeIndex, NodeIndex, f64)> = g
            .edge_references()
            .map(|e| (e.source(), e.target(), e.weight().weight))
            .collect();

        let mut findings = Vec::new();

        for source in g.node_indices() {
            let mut dist = vec![f64::INFINITY; n];
            let mut pred: Vec<Option<NodeIndex>> = vec![None; n];
            dist[source.index()] = 0.0;

            // Relax up to N-1 rounds, stopping early once a full pass is
            // quiet. Early exit makes no negative-cycle assumption: a quiet
            // pass means the post-pass below cannot trigger either.
            for _ in 1..n {
                let mut changed = false;
                for &(u, v, w) in &edges {
                    if dist[u.index()] + w < dist[v.index()] {
                        dist[v.index()] = dist[u.index()] + w;
                        pred[v.index()] = Some(u);
                        changed = true;
                    }
                }
                if !changed {
                    break;
                }
            }

            // Post-pass: anything that still relaxes is a finding
            for &(u, v, w) in &edges {
                if dist[u.index()] + w < dist[v.index()] - RELAXATION_EPSILON {
                    let (Some(source_currency), Some(from), Some(to)) = (
                        self.graph.currency(source),
                        self.graph.currency(u),
                        self.graph.currency(v),
                    ) else {
                        continue;
                    };

                    let improvement = dist[v.index()] - (dist[u.index()] + w);
                    let cycle = self.reconstruct(&pred, u);
                    let loop_product = cycle.as_deref().and_then(|c| self.loop_product(c));

                    debug!(
                        "negative cycle from {}: edge {} -> {} relaxes by {:.3e}",
                        source_currency, from, to, improvement
                    );

                    findings.push(CycleFinding {
                        source: source_currency,
                        from,
                        to,
                        improvement,
                        cycle,
                        loop_product,
                    });
                }
            }
        }

        info!(
            "negative-cycle scan: {} findings across {} sources",
            findings.len(),
            n
        );

        findings
    }

    /// Walk the predecessor chain back from the tail of a triggering edge.
    /// N steps guarantee we are standing inside the cycle rather than on a
    /// path hanging off it; from there, collect nodes until the walk comes
    /// back around. The loop is returned in trade order, closed
    /// (first == last).
    fn reconstruct(
        &self,
        pred: &[Option<NodeIndex>],
        tail: NodeIndex,
    ) -> Option<Vec<Currency>> {
        let n = self.graph.graph.node_count();

        let mut inside = tail;
        for _ in 0..n {
            inside = pred[inside.index()]?;
        }

        let start = inside;
        let mut loop_nodes = vec![start];
        let mut cursor = pred[start.index()]?;
        while cursor != start {
            loop_nodes.push(cursor);
            cursor = pred[cursor.index()]?;
        }
        loop_nodes.push(start);

        // The predecessor walk runs against trade direction
        loop_nodes.reverse();

        loop_nodes
            .into_iter()
            .map(|node| self.graph.currency(node))
            .collect()
    }

    /// Multiply the quoted rates along a closed loop.
    fn loop_product(&self, loop_nodes: &[Currency]) -> Option<f64> {
        let mut product = 1.0;
        for pair in loop_nodes.windows(2) {
            let from = self.graph.node(pair[0])?;
            let to = self.graph.node(pair[1])?;
            let edge = self.graph.graph.find_edge(from, to)?;
            product *= self.graph.graph.edge_weight(edge)?.rate;
        }
        Some(product)
    }
}
