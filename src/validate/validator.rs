//! Ordered rule pipeline for trade proposals

use super::{OrderSpec, RejectReason, ValidationResult};
use crate::breaker::CircuitBreaker;
use crate::config::RiskConfig;
use crate::decision::{DecisionProposal, MarketRegime, TradeAction};
use crate::portfolio::{PortfolioSnapshot, Side};
use crate::sizing::{SizedOrder, SizingEngine, SizingInputs};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// State visible to the pre-sizing gate rules
struct GateContext<'a> {
    proposal: &'a DecisionProposal,
    snapshot: &'a PortfolioSnapshot,
    breaker: &'a CircuitBreaker,
    risk: &'a RiskConfig,
    now: DateTime<Utc>,
}

/// State visible to the rules that inspect the sized candidate
struct SizedContext<'a> {
    snapshot: &'a PortfolioSnapshot,
    risk: &'a RiskConfig,
    candidate: SizedOrder,
    notional: Decimal,
}

type GateRule = fn(&GateContext<'_>) -> Option<RejectReason>;
type SizedRule = fn(&SizedContext<'_>) -> Option<RejectReason>;

/// Entry rules in their fixed evaluation order; the first failure wins.
/// Gate rules run before the sizing engine is consulted, so a proposal that
/// fails one never reaches it. New rules are inserted without disturbing
/// the others, which keeps existing rejection codes stable.
const GATE_RULES: &[GateRule] = &[
    rule_terminal_halt,
    rule_cooldown,
    rule_confidence,
    rule_position_count,
    rule_symbol_limit,
];

/// Rules over the computed candidate size, after the gates pass
const SIZED_RULES: &[SizedRule] = &[rule_portfolio_risk, rule_margin, rule_min_size];

/// Turns a proposal plus portfolio and breaker state into a
/// [`ValidationResult`]
///
/// Pure with respect to portfolio state: acceptance returns an order spec
/// and mutates nothing, so a retried call yields the identical result.
pub struct DecisionValidator {
    risk: RiskConfig,
    sizing: SizingEngine,
}

impl DecisionValidator {
    /// Create a validator around a sizing engine
    pub fn new(risk: RiskConfig, sizing: SizingEngine) -> Self {
        Self { risk, sizing }
    }

    /// Validate one proposal against a cycle's snapshot
    pub fn validate(
        &self,
        proposal: &DecisionProposal,
        snapshot: &PortfolioSnapshot,
        breaker: &CircuitBreaker,
        mark_price: Decimal,
        day_fraction: Decimal,
        now: DateTime<Utc>,
    ) -> ValidationResult {
        // Confidence must be inside its declared [0, 100] domain
        if proposal.confidence < Decimal::ZERO || proposal.confidence > Decimal::new(100, 0) {
            return ValidationResult::Rejected(RejectReason::InvalidConfidence(
                proposal.confidence,
            ));
        }

        // HOLD and CLOSE bypass sizing entirely
        let side = match proposal.action {
            TradeAction::Hold => return ValidationResult::Accepted(OrderSpec::Hold),
            TradeAction::Close => {
                return if snapshot.has_position(&proposal.asset) {
                    ValidationResult::Accepted(OrderSpec::Close {
                        symbol: proposal.asset.clone(),
                    })
                } else {
                    ValidationResult::Rejected(RejectReason::NoPositionToClose)
                };
            }
            TradeAction::Long => Side::Long,
            TradeAction::Short => Side::Short,
        };

        if mark_price <= Decimal::ZERO {
            return ValidationResult::Rejected(RejectReason::InvalidMarkPrice(mark_price));
        }

        let gate = GateContext {
            proposal,
            snapshot,
            breaker,
            risk: &self.risk,
            now,
        };
        for rule in GATE_RULES {
            if let Some(reason) = rule(&gate) {
                return ValidationResult::Rejected(reason);
            }
        }

        let candidate = self.sizing.size(&SizingInputs {
            confidence: proposal.confidence,
            regime: proposal.regime,
            day_fraction,
            drawdown: snapshot.drawdown(),
            suggested_leverage: proposal.suggested_leverage,
            level_max_size: breaker.max_size(),
            level_max_leverage: breaker.max_leverage(),
        });
        let sized = SizedContext {
            snapshot,
            risk: &self.risk,
            candidate,
            notional: candidate.fraction * snapshot.equity.max(Decimal::ZERO),
        };
        for rule in SIZED_RULES {
            if let Some(reason) = rule(&sized) {
                return ValidationResult::Rejected(reason);
            }
        }

        let stop_loss_price = match side {
            Side::Long => mark_price * (Decimal::ONE - self.risk.stop_loss_pct),
            Side::Short => mark_price * (Decimal::ONE + self.risk.stop_loss_pct),
        };

        ValidationResult::Accepted(OrderSpec::Entry {
            symbol: proposal.asset.clone(),
            side,
            notional: sized.notional,
            leverage: candidate.leverage,
            stop_loss_price,
        })
    }
}

fn rule_terminal_halt(ctx: &GateContext<'_>) -> Option<RejectReason> {
    if ctx.breaker.level().is_terminal() {
        return Some(RejectReason::TradingHalted);
    }
    None
}

fn rule_cooldown(ctx: &GateContext<'_>) -> Option<RejectReason> {
    if ctx.breaker.in_cooldown(ctx.now) {
        return ctx
            .breaker
            .cooldown_until()
            .map(|until| RejectReason::InCooldown { until });
    }
    None
}

fn rule_confidence(ctx: &GateContext<'_>) -> Option<RejectReason> {
    let base = if ctx.proposal.regime == MarketRegime::Volatile {
        ctx.risk.volatile_min_confidence
    } else {
        ctx.risk.min_confidence
    };
    let required = match ctx.breaker.min_confidence() {
        Some(floor) => base.max(floor),
        None => base,
    };
    if ctx.proposal.confidence < required {
        return Some(RejectReason::LowConfidence {
            confidence: ctx.proposal.confidence,
            required,
        });
    }
    None
}

fn rule_position_count(ctx: &GateContext<'_>) -> Option<RejectReason> {
    if ctx.snapshot.open_count() >= ctx.risk.max_open_positions {
        return Some(RejectReason::MaxPositionsReached);
    }
    None
}

fn rule_symbol_limit(ctx: &GateContext<'_>) -> Option<RejectReason> {
    if ctx.snapshot.count_for_symbol(&ctx.proposal.asset) >= ctx.risk.max_positions_per_symbol {
        return Some(RejectReason::SymbolLimitReached);
    }
    None
}

fn rule_portfolio_risk(ctx: &SizedContext<'_>) -> Option<RejectReason> {
    if ctx.snapshot.equity <= Decimal::ZERO {
        // Exposure fraction is undefined; the margin and minimum-size rules
        // below handle rejection
        return None;
    }
    let projected = (ctx.snapshot.exposure() + ctx.notional) / ctx.snapshot.equity;
    if projected > ctx.risk.max_portfolio_risk {
        return Some(RejectReason::PortfolioRiskExceeded {
            projected,
            limit: ctx.risk.max_portfolio_risk,
        });
    }
    None
}

fn rule_margin(ctx: &SizedContext<'_>) -> Option<RejectReason> {
    let required = ctx.notional / Decimal::from(ctx.candidate.leverage.max(1));
    if required > ctx.snapshot.available_margin {
        return Some(RejectReason::InsufficientMargin {
            required,
            available: ctx.snapshot.available_margin,
        });
    }
    None
}

fn rule_min_size(ctx: &SizedContext<'_>) -> Option<RejectReason> {
    if ctx.candidate.fraction == Decimal::ZERO {
        return Some(RejectReason::BelowMinimumSize);
    }
    None
}
