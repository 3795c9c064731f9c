//! Analysis modules.
//!
//! Aggregation of per-record summaries into comparison tables, and the
//! descriptive statistics they are built from.

pub mod aggregator;
pub mod stats;

pub use aggregator::*;
