//! Performance evaluation
//!
//! Rolling statistics recomputed on demand from the append-only history

mod evaluator;

pub use evaluator::{PerformanceEvaluator, PerformanceSnapshot};
