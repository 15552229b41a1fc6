//! Circuit-breaker levels and their restriction policies

use crate::config::{BreakerConfig, LevelSpec};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trading-restriction tier, ordered by severity
///
/// Escalation only ever moves toward `Emergency`; the ordering is used to
/// pick the deepest breached level and to forbid demotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BreakerLevel {
    /// No restrictions
    Normal,
    /// Risk reduction active
    Warning,
    /// Reduced size, cooldown on entries
    Defensive,
    /// Minimal size, long cooldown
    Critical,
    /// Trading permanently disabled for the rest of the run
    Emergency,
}

impl BreakerLevel {
    /// Numeric tier, 0 through 4
    pub fn tier(&self) -> u8 {
        match self {
            BreakerLevel::Normal => 0,
            BreakerLevel::Warning => 1,
            BreakerLevel::Defensive => 2,
            BreakerLevel::Critical => 3,
            BreakerLevel::Emergency => 4,
        }
    }

    /// Whether this level ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(self, BreakerLevel::Emergency)
    }

    /// Deepest level whose threshold is at or below `drawdown`
    ///
    /// Evaluated highest-first so a single large move lands directly on the
    /// deepest breached tier.
    pub fn from_drawdown(drawdown: Decimal, config: &BreakerConfig) -> BreakerLevel {
        if drawdown >= config.emergency.drawdown {
            BreakerLevel::Emergency
        } else if drawdown >= config.critical.drawdown {
            BreakerLevel::Critical
        } else if drawdown >= config.defensive.drawdown {
            BreakerLevel::Defensive
        } else if drawdown >= config.warning.drawdown {
            BreakerLevel::Warning
        } else {
            BreakerLevel::Normal
        }
    }

    /// Restriction spec for this level; `None` at `Normal`
    pub fn spec<'a>(&self, config: &'a BreakerConfig) -> Option<&'a LevelSpec> {
        match self {
            BreakerLevel::Normal => None,
            BreakerLevel::Warning => Some(&config.warning),
            BreakerLevel::Defensive => Some(&config.defensive),
            BreakerLevel::Critical => Some(&config.critical),
            BreakerLevel::Emergency => Some(&config.emergency),
        }
    }
}

impl std::fmt::Display for BreakerLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BreakerLevel::Normal => "NORMAL",
            BreakerLevel::Warning => "WARNING",
            BreakerLevel::Defensive => "DEFENSIVE",
            BreakerLevel::Critical => "CRITICAL",
            BreakerLevel::Emergency => "EMERGENCY",
        };
        write!(f, "{name}")
    }
}
