//! Consistent per-cycle view of the portfolio

use super::Position;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Portfolio state errors
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// Peak equity below current equity signals a corrupted data source
    /// feeding the safety system; surfaced, never silently corrected.
    #[error("state invariant violated: peak equity {peak} below equity {equity}")]
    InvariantViolation { equity: Decimal, peak: Decimal },
    /// Negative peak equity can only come from a broken snapshot producer
    #[error("state invariant violated: negative peak equity {peak}")]
    NegativePeak { peak: Decimal },
}

/// Immutable portfolio view taken once per decision cycle
///
/// All proposals within a cycle are validated against the same snapshot, so
/// concurrent proposals cannot each believe the last unit of capacity is
/// still available.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSnapshot {
    /// Current account equity
    pub equity: Decimal,
    /// Historical maximum equity; never decreases
    pub peak_equity: Decimal,
    /// Margin available for new entries
    pub available_margin: Decimal,
    /// Capital at the start of the run
    pub initial_capital: Decimal,
    /// Open positions, in entry order
    pub open_positions: Vec<Position>,
}

impl PortfolioSnapshot {
    /// Build a snapshot, enforcing the `peak_equity >= equity` invariant
    pub fn new(
        equity: Decimal,
        peak_equity: Decimal,
        available_margin: Decimal,
        initial_capital: Decimal,
        open_positions: Vec<Position>,
    ) -> Result<Self, PortfolioError> {
        if peak_equity < Decimal::ZERO {
            return Err(PortfolioError::NegativePeak { peak: peak_equity });
        }
        if peak_equity < equity {
            return Err(PortfolioError::InvariantViolation {
                equity,
                peak: peak_equity,
            });
        }
        Ok(Self {
            equity,
            peak_equity,
            available_margin,
            initial_capital,
            open_positions,
        })
    }

    /// Percentage decline from peak equity, as a fraction in [0, 1]
    ///
    /// A zero peak means drawdown is undefined; treated as 0 (no breach)
    /// rather than a division fault.
    pub fn drawdown(&self) -> Decimal {
        if self.peak_equity <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.peak_equity - self.equity) / self.peak_equity
    }

    /// Sum of open-position notional
    pub fn exposure(&self) -> Decimal {
        self.open_positions.iter().map(Position::notional).sum()
    }

    /// Exposure as a fraction of equity; 0 when equity is not positive
    pub fn exposure_fraction(&self) -> Decimal {
        if self.equity <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.exposure() / self.equity
    }

    /// Number of open positions
    pub fn open_count(&self) -> usize {
        self.open_positions.len()
    }

    /// Number of open positions for one symbol
    pub fn count_for_symbol(&self, symbol: &str) -> usize {
        self.open_positions
            .iter()
            .filter(|p| p.symbol == symbol)
            .count()
    }

    /// Whether any open position exists for the symbol
    pub fn has_position(&self, symbol: &str) -> bool {
        self.count_for_symbol(symbol) > 0
    }
}
