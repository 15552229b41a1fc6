//! Position sizing
//!
//! Pure notional-fraction and leverage computation

mod engine;

pub use engine::{SizedOrder, SizingEngine, SizingInputs};
