//! Position sizing engine

use crate::config::{RiskConfig, SizingConfig};
use crate::decision::MarketRegime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Inputs to one sizing computation
///
/// The level caps come from the active circuit-breaker level; `None` means
/// the level imposes no cap (Normal).
#[derive(Debug, Clone)]
pub struct SizingInputs {
    /// Conviction score in [0, 100]; clamped on entry
    pub confidence: Decimal,
    /// Market regime classification
    pub regime: MarketRegime,
    /// Fraction of the competition elapsed, in [0, 1]; clamped on entry
    pub day_fraction: Decimal,
    /// Current drawdown fraction; negatives clamp to 0
    pub drawdown: Decimal,
    /// Leverage requested by the reasoning component
    pub suggested_leverage: u32,
    /// Size cap from the active circuit-breaker level
    pub level_max_size: Option<Decimal>,
    /// Leverage cap from the active circuit-breaker level
    pub level_max_leverage: Option<u32>,
}

/// Sizing result: notional fraction of equity plus leverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizedOrder {
    /// Position size as a fraction of equity; zero means "do not trade"
    pub fraction: Decimal,
    /// Leverage, always at least 1
    pub leverage: u32,
}

/// Pure position sizing function
///
/// Deterministic and total: every input combination produces a finite,
/// non-negative fraction within the configured ceilings and a leverage
/// within `[1, min(global, level cap)]`.
#[derive(Debug, Clone)]
pub struct SizingEngine {
    sizing: SizingConfig,
    risk: RiskConfig,
}

impl SizingEngine {
    /// Create an engine from configuration
    pub fn new(sizing: SizingConfig, risk: RiskConfig) -> Self {
        Self { sizing, risk }
    }

    /// Compute the target size and leverage for a proposal
    pub fn size(&self, inputs: &SizingInputs) -> SizedOrder {
        let confidence = inputs.confidence.clamp(Decimal::ZERO, dec!(100));
        let day_fraction = inputs.day_fraction.clamp(Decimal::ZERO, Decimal::ONE);
        let drawdown = inputs.drawdown.max(Decimal::ZERO);

        let mut fraction = self.sizing.base_fraction
            * confidence_multiplier(confidence)
            * regime_multiplier(inputs.regime)
            * time_multiplier(day_fraction)
            * drawdown_multiplier(drawdown);

        // Smallest of the computed value and the two ceilings wins
        fraction = fraction.min(self.sizing.max_position_fraction);
        if let Some(cap) = inputs.level_max_size {
            fraction = fraction.min(cap);
        }
        fraction = fraction.max(Decimal::ZERO);

        if fraction < self.sizing.min_viable_fraction {
            fraction = Decimal::ZERO;
        }

        SizedOrder {
            fraction,
            leverage: self.leverage_for(confidence, inputs),
        }
    }

    fn leverage_for(&self, confidence: Decimal, inputs: &SizingInputs) -> u32 {
        let level_cap = inputs.level_max_leverage.unwrap_or(self.risk.max_leverage);
        let hard_cap = self.risk.max_leverage.min(level_cap).max(1);

        let mut leverage = inputs.suggested_leverage.clamp(1, hard_cap);

        // High-conviction entries earn the configured bump, but the caps
        // still win
        if confidence >= self.risk.high_confidence_threshold {
            let bumped = self.risk.high_confidence_leverage.min(hard_cap);
            leverage = leverage.max(bumped);
        }

        leverage
    }
}

/// Linear, non-decreasing over [0, 100]: 0.5x at zero up to 1.5x at 100
fn confidence_multiplier(confidence: Decimal) -> Decimal {
    dec!(0.5) + confidence / dec!(100)
}

fn regime_multiplier(regime: MarketRegime) -> Decimal {
    match regime {
        MarketRegime::Trending => dec!(1.3),
        MarketRegime::Breakout => dec!(1.4),
        MarketRegime::Ranging => dec!(0.7),
        MarketRegime::Volatile => dec!(0.8),
        MarketRegime::Neutral => dec!(0.9),
    }
}

/// Aggression steps up as the competition progresses
fn time_multiplier(day_fraction: Decimal) -> Decimal {
    if day_fraction < dec!(0.36) {
        dec!(1.0)
    } else if day_fraction < dec!(0.72) {
        dec!(1.15)
    } else {
        dec!(1.25)
    }
}

/// Non-increasing in drawdown; the 0.3 floor lands on the warning threshold
fn drawdown_multiplier(drawdown: Decimal) -> Decimal {
    if drawdown < dec!(0.15) {
        dec!(1.0)
    } else if drawdown < dec!(0.20) {
        dec!(0.8)
    } else if drawdown < dec!(0.25) {
        dec!(0.5)
    } else {
        dec!(0.3)
    }
}
