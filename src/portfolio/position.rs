//! Open positions and closed trade records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Long,
    Short,
}

/// An open position
///
/// Owned exclusively by the [`PortfolioTracker`](super::PortfolioTracker);
/// other components only ever see clones inside a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Position identifier
    pub id: Uuid,
    /// Asset symbol
    pub symbol: String,
    /// Trade side
    pub side: Side,
    /// Entry fill price
    pub entry_price: Decimal,
    /// Quantity in base asset
    pub quantity: Decimal,
    /// Leverage applied at entry
    pub leverage: u32,
    /// Entry timestamp
    pub opened_at: DateTime<Utc>,
}

impl Position {
    /// Dollar-equivalent size before leverage
    pub fn notional(&self) -> Decimal {
        self.entry_price * self.quantity
    }
}

/// A completed trade, immutable once appended to the history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    /// Asset symbol
    pub symbol: String,
    /// Trade side
    pub side: Side,
    /// Entry fill price
    pub entry_price: Decimal,
    /// Exit fill price
    pub exit_price: Decimal,
    /// Quantity in base asset
    pub quantity: Decimal,
    /// Leverage applied at entry
    pub leverage: u32,
    /// Realized P&L reported by the execution gateway
    pub realized_pnl: Decimal,
    /// Entry timestamp
    pub opened_at: DateTime<Utc>,
    /// Exit timestamp
    pub closed_at: DateTime<Utc>,
}

impl ClosedTrade {
    /// Whether the trade closed at a profit
    pub fn is_win(&self) -> bool {
        self.realized_pnl > Decimal::ZERO
    }
}
