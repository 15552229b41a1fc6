//! Portfolio state tracking
//!
//! Single source of truth for equity, peak equity, open positions and the
//! append-only trade history

mod position;
mod snapshot;
mod tracker;

pub use position::{ClosedTrade, Position, Side};
pub use snapshot::{PortfolioError, PortfolioSnapshot};
pub use tracker::{EquityPoint, PortfolioTracker};
