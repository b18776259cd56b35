//! Phase 1: The Cartographer (Data Ingest)
//!
//! Fetches per-base rate sheets from the quote service, assembles the
//! immutable rate matrix, and projects it into log space for the brain.

mod fetcher;
mod graph;
mod matrix;

pub use fetcher::{RateFetcher, RateSheet, DEFAULT_API_URL, REQUEST_TIMEOUT_SECS};
pub use graph::{EdgeData, RateGraph};
pub use matrix::RateMatrix;
