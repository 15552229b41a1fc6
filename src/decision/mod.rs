//! Decision proposal types
//!
//! Contract with the external reasoning component that proposes trades

mod types;

pub use types::{DecisionProposal, MarketRegime, TradeAction};
