//! Phase 2: The Brain
//!
//! Responsible for:
//! - Enumerating triangular loops against the no-arbitrage invariant
//! - Finding negative cycles of any length (Bellman-Ford in log space)
//! - Ranking single-pair deviations from implied cross-rates

mod bellman_ford;
mod single_leg;
mod triangular;

pub use bellman_ford::{CycleFinding, NegativeCycleDetector, RELAXATION_EPSILON};
pub use single_leg::{analyze_pairs, ImpliedRate, PairDeviation, TradeDirection};
pub use triangular::{scan_triangles, TriangleResult};
