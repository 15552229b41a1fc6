//! Portfolio state tracker

use super::{ClosedTrade, PortfolioError, PortfolioSnapshot, Position, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One equity observation on the equity curve
#[derive(Debug, Clone, Serialize)]
pub struct EquityPoint {
    /// Observation timestamp
    pub timestamp: DateTime<Utc>,
    /// Account equity at that instant
    pub equity: Decimal,
}

/// Owns all position and equity state
///
/// Positions are mutated only through [`open_position`](Self::open_position)
/// and [`close_position`](Self::close_position); the trade history and equity
/// curve are append-only.
pub struct PortfolioTracker {
    initial_capital: Decimal,
    equity: Decimal,
    peak_equity: Decimal,
    available_margin: Decimal,
    open: Vec<Position>,
    history: Vec<ClosedTrade>,
    equity_curve: Vec<EquityPoint>,
}

impl PortfolioTracker {
    /// Create a tracker with the starting capital as equity and peak
    pub fn new(initial_capital: Decimal) -> Self {
        Self {
            initial_capital,
            equity: initial_capital,
            peak_equity: initial_capital,
            available_margin: initial_capital,
            open: Vec::new(),
            history: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    /// Record the equity reported by the account collaborator this cycle
    ///
    /// Peak equity only ever moves upward here.
    pub fn record_equity(
        &mut self,
        equity: Decimal,
        available_margin: Decimal,
        at: DateTime<Utc>,
    ) {
        self.equity = equity;
        self.available_margin = available_margin;
        if equity > self.peak_equity {
            self.peak_equity = equity;
        }
        self.equity_curve.push(EquityPoint {
            timestamp: at,
            equity,
        });
    }

    /// Open a position from an execution-gateway fill
    pub fn open_position(
        &mut self,
        symbol: String,
        side: Side,
        fill_price: Decimal,
        quantity: Decimal,
        leverage: u32,
        at: DateTime<Utc>,
    ) -> Position {
        let position = Position {
            id: Uuid::new_v4(),
            symbol,
            side,
            entry_price: fill_price,
            quantity,
            leverage,
            opened_at: at,
        };
        self.open.push(position.clone());
        position
    }

    /// Close the oldest open position for `symbol`, appending to the history
    ///
    /// Returns `None` when no position exists for the symbol.
    pub fn close_position(
        &mut self,
        symbol: &str,
        exit_price: Decimal,
        realized_pnl: Decimal,
        at: DateTime<Utc>,
    ) -> Option<ClosedTrade> {
        let index = self.open.iter().position(|p| p.symbol == symbol)?;
        let position = self.open.remove(index);
        let trade = ClosedTrade {
            symbol: position.symbol,
            side: position.side,
            entry_price: position.entry_price,
            exit_price,
            quantity: position.quantity,
            leverage: position.leverage,
            realized_pnl,
            opened_at: position.opened_at,
            closed_at: at,
        };
        self.history.push(trade.clone());
        Some(trade)
    }

    /// Take the immutable snapshot used for a whole decision cycle
    pub fn snapshot(&self) -> Result<PortfolioSnapshot, PortfolioError> {
        PortfolioSnapshot::new(
            self.equity,
            self.peak_equity,
            self.available_margin,
            self.initial_capital,
            self.open.clone(),
        )
    }

    /// Open positions, in entry order
    pub fn open_positions(&self) -> &[Position] {
        &self.open
    }

    /// Append-only closed-trade history
    pub fn history(&self) -> &[ClosedTrade] {
        &self.history
    }

    /// Append-only equity curve
    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }

    /// Current equity
    pub fn equity(&self) -> Decimal {
        self.equity
    }

    /// Historical peak equity
    pub fn peak_equity(&self) -> Decimal {
        self.peak_equity
    }
}
