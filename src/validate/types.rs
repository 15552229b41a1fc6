//! Validation results and rejection reasons

use crate::portfolio::Side;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reason a proposal was rejected
///
/// Produced by a fixed, ordered rule pipeline, so identical inputs always
/// yield the identical reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Confidence outside the declared [0, 100] domain
    InvalidConfidence(Decimal),
    /// Mark price missing or non-positive
    InvalidMarkPrice(Decimal),
    /// CLOSE proposed with no open position for the symbol
    NoPositionToClose,
    /// Emergency stop active; trading disabled for the rest of the run
    TradingHalted,
    /// Entry cooldown has not lapsed
    InCooldown { until: DateTime<Utc> },
    /// Confidence below the effective floor
    LowConfidence { confidence: Decimal, required: Decimal },
    /// Open-position count at the limit
    MaxPositionsReached,
    /// Per-symbol position count at the limit
    SymbolLimitReached,
    /// Projected aggregate exposure above the portfolio risk limit
    PortfolioRiskExceeded { projected: Decimal, limit: Decimal },
    /// Required margin above available margin
    InsufficientMargin { required: Decimal, available: Decimal },
    /// Sized position too small to be worth placing
    BelowMinimumSize,
}

/// Fully-specified instruction for the execution gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OrderSpec {
    /// No action this cycle
    Hold,
    /// Close the open position for the symbol
    Close { symbol: String },
    /// Open a position
    Entry {
        symbol: String,
        side: Side,
        /// Dollar-equivalent size before leverage
        notional: Decimal,
        leverage: u32,
        /// Mandatory protective stop
        stop_loss_price: Decimal,
    },
}

/// Outcome of validating one proposal: exactly one of the two
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationResult {
    /// Proposal passed; the order spec is returned, nothing is mutated
    Accepted(OrderSpec),
    /// Proposal failed the named rule
    Rejected(RejectReason),
}

impl ValidationResult {
    /// Whether the proposal was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted(_))
    }

    /// The rejection reason, if rejected
    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            ValidationResult::Accepted(_) => None,
            ValidationResult::Rejected(reason) => Some(reason),
        }
    }
}
