//! Proposal types supplied by the reasoning component

use crate::portfolio::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Action proposed for an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    /// Open or add a long position
    Long,
    /// Open or add a short position
    Short,
    /// Close the existing position
    Close,
    /// Do nothing this cycle
    Hold,
}

impl TradeAction {
    /// Position side for entry actions, `None` for HOLD/CLOSE
    pub fn side(&self) -> Option<Side> {
        match self {
            TradeAction::Long => Some(Side::Long),
            TradeAction::Short => Some(Side::Short),
            TradeAction::Close | TradeAction::Hold => None,
        }
    }

    /// Whether this action opens new capital at risk
    pub fn is_entry(&self) -> bool {
        matches!(self, TradeAction::Long | TradeAction::Short)
    }
}

/// Market condition classification used as a sizing input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketRegime {
    /// Sustained directional move
    Trending,
    /// Price breaking a key level
    Breakout,
    /// Choppy sideways action
    Ranging,
    /// High uncertainty, wide swings
    Volatile,
    /// No clear classification
    Neutral,
}

impl MarketRegime {
    /// All regimes, for exhaustive sweeps in tests and benches
    pub const ALL: [MarketRegime; 5] = [
        MarketRegime::Trending,
        MarketRegime::Breakout,
        MarketRegime::Ranging,
        MarketRegime::Volatile,
        MarketRegime::Neutral,
    ];
}

/// A trade proposal from the reasoning component
///
/// `confidence` is declared to be in [0, 100] and `regime` a member of the
/// closed enum; the validator still checks the numeric domain defensively
/// rather than trusting the producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionProposal {
    /// Asset symbol, e.g. "BTCUSDT"
    pub asset: String,
    /// Proposed action
    pub action: TradeAction,
    /// Conviction score in [0, 100]
    pub confidence: Decimal,
    /// Leverage the reasoning component asked for
    pub suggested_leverage: u32,
    /// Market regime classification
    pub regime: MarketRegime,
    /// Free-text rationale, passed through to logs unchanged
    pub reason: String,
}
