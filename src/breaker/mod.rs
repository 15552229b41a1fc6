//! Circuit breaker
//!
//! Drawdown-driven state machine that escalates trading restrictions and
//! schedules entry cooldowns

mod level;

pub use level::BreakerLevel;

use crate::config::BreakerConfig;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Circuit-breaker operation errors
#[derive(Debug, Error)]
pub enum BreakerError {
    /// The emergency stop is the designed end state of the run
    #[error("reset rejected: emergency stop is terminal")]
    Terminal,
}

/// A level transition, returned exactly once per entry into a level
#[derive(Debug, Clone, Serialize)]
pub struct Escalation {
    /// Level before the transition
    pub from: BreakerLevel,
    /// Level after the transition
    pub to: BreakerLevel,
    /// Transition timestamp
    pub at: DateTime<Utc>,
    /// Entry cooldown deadline set by the new level, if any
    pub cooldown_until: Option<DateTime<Utc>>,
    /// Whether all open positions must be force-closed
    pub liquidate: bool,
}

/// Serializable view of the breaker state, for events and reporting
#[derive(Debug, Clone, Serialize)]
pub struct BreakerState {
    pub level: BreakerLevel,
    pub entered_at: Option<DateTime<Utc>>,
    pub cooldown_until: Option<DateTime<Utc>>,
}

/// Drawdown-driven trading-restriction state machine
///
/// The only long-lived mutable state in the core. Created once at `Normal`,
/// escalates monotonically on breach, and only the administrative
/// [`reset`](Self::reset) moves it back down.
pub struct CircuitBreaker {
    config: BreakerConfig,
    level: BreakerLevel,
    entered_at: Option<DateTime<Utc>>,
    cooldown_until: Option<DateTime<Utc>>,
}

impl CircuitBreaker {
    /// Create a breaker at `Normal`
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            level: BreakerLevel::Normal,
            entered_at: None,
            cooldown_until: None,
        }
    }

    /// Current restriction level
    pub fn level(&self) -> BreakerLevel {
        self.level
    }

    /// Entry cooldown deadline, if one is active or scheduled
    pub fn cooldown_until(&self) -> Option<DateTime<Utc>> {
        self.cooldown_until
    }

    /// Whether new entries are blocked by an unexpired cooldown
    pub fn in_cooldown(&self, now: DateTime<Utc>) -> bool {
        matches!(self.cooldown_until, Some(until) if now < until)
    }

    /// Confidence floor imposed by the active level
    pub fn min_confidence(&self) -> Option<Decimal> {
        self.level.spec(&self.config).and_then(|s| s.min_confidence)
    }

    /// Position-size cap imposed by the active level
    pub fn max_size(&self) -> Option<Decimal> {
        self.level.spec(&self.config).map(|s| s.max_size)
    }

    /// Leverage cap imposed by the active level
    pub fn max_leverage(&self) -> Option<u32> {
        self.level.spec(&self.config).map(|s| s.max_leverage)
    }

    /// Serializable state for events and reporting
    pub fn state(&self) -> BreakerState {
        BreakerState {
            level: self.level,
            entered_at: self.entered_at,
            cooldown_until: self.cooldown_until,
        }
    }

    /// Re-evaluate the ladder against the latest drawdown
    ///
    /// Escalates to the deepest breached level and returns the transition,
    /// or `None` when the level is unchanged. Recovery never demotes; only
    /// [`reset`](Self::reset) does. The returned `liquidate` flag is set on
    /// entry into `Defensive` or deeper and fires at most once per entry,
    /// so re-evaluation within a level cannot re-trigger liquidation.
    pub fn on_drawdown(&mut self, drawdown: Decimal, now: DateTime<Utc>) -> Option<Escalation> {
        let target = BreakerLevel::from_drawdown(drawdown, &self.config);
        if target <= self.level {
            return None;
        }

        let from = self.level;
        self.level = target;
        self.entered_at = Some(now);

        let cooldown_hours = target
            .spec(&self.config)
            .map(|s| s.cooldown_hours)
            .unwrap_or(0);
        self.cooldown_until = if target.is_terminal() || cooldown_hours == 0 {
            // Terminal and zero-cooldown tiers carry no deadline; any
            // previously scheduled one is superseded
            None
        } else {
            Some(now + Duration::hours(cooldown_hours))
        };

        Some(Escalation {
            from,
            to: target,
            at: now,
            cooldown_until: self.cooldown_until,
            liquidate: target >= BreakerLevel::Defensive,
        })
    }

    /// Administrative reset back to `Normal` after manual review
    ///
    /// Never invoked automatically. Rejected at `Emergency`.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Result<BreakerLevel, BreakerError> {
        if self.level.is_terminal() {
            return Err(BreakerError::Terminal);
        }
        let from = self.level;
        self.level = BreakerLevel::Normal;
        self.entered_at = Some(now);
        self.cooldown_until = None;
        Ok(from)
    }
}
