//! Decision cycle engine
//!
//! Owns the long-lived circuit breaker and portfolio tracker and runs the
//! per-cycle pipeline: fills, equity, performance, breaker, validation

use crate::breaker::{BreakerError, BreakerLevel, BreakerState, CircuitBreaker, Escalation};
use crate::config::Config;
use crate::decision::DecisionProposal;
use crate::perf::{PerformanceEvaluator, PerformanceSnapshot};
use crate::portfolio::{PortfolioError, PortfolioTracker, Side};
use crate::sizing::SizingEngine;
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use crate::validate::{DecisionValidator, OrderSpec, ValidationResult};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// A broken portfolio invariant aborts the cycle loudly; it signals an
    /// unreliable snapshot producer.
    #[error(transparent)]
    Portfolio(#[from] PortfolioError),
}

/// A fill reported back by the execution gateway
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FillEvent {
    /// An entry order was filled
    Entry {
        symbol: String,
        side: Side,
        fill_price: Decimal,
        quantity: Decimal,
        leverage: u32,
        timestamp: DateTime<Utc>,
    },
    /// A position was closed
    Close {
        symbol: String,
        exit_price: Decimal,
        realized_pnl: Decimal,
        timestamp: DateTime<Utc>,
    },
}

/// One proposal plus the mark price for its asset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalInput {
    pub proposal: DecisionProposal,
    pub mark_price: Decimal,
}

/// Everything one decision cycle consumes
///
/// Fills from the previous cycle's accepted orders arrive here and are
/// applied before anything is evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleInput {
    /// Cycle timestamp, supplied by the scheduler
    pub now: DateTime<Utc>,
    /// Account equity reported by the account collaborator
    pub equity: Decimal,
    /// Margin available for new entries
    pub available_margin: Decimal,
    /// Fills reported since the last cycle
    #[serde(default)]
    pub fills: Vec<FillEvent>,
    /// Proposals to gate this cycle
    #[serde(default)]
    pub proposals: Vec<ProposalInput>,
}

/// Outcome for one proposal
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub asset: String,
    pub result: ValidationResult,
}

/// Everything one decision cycle produced
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub at: DateTime<Utc>,
    pub performance: PerformanceSnapshot,
    pub breaker: BreakerState,
    /// Level transition, when one occurred this cycle
    pub escalation: Option<Escalation>,
    /// Batch close-all instructions for the execution gateway
    pub liquidations: Vec<OrderSpec>,
    pub decisions: Vec<Decision>,
}

/// Single-writer context for the decision loop
///
/// One instance owns all mutable core state; each cycle's pipeline runs
/// sequentially against one immutable snapshot, so the engine can be driven
/// by any scheduler without internal locking.
pub struct RiskEngine {
    config: Config,
    validator: DecisionValidator,
    evaluator: PerformanceEvaluator,
    breaker: CircuitBreaker,
    tracker: PortfolioTracker,
}

impl RiskEngine {
    /// Create an engine from configuration
    pub fn new(config: Config) -> Self {
        let sizing = SizingEngine::new(config.sizing.clone(), config.risk.clone());
        let validator = DecisionValidator::new(config.risk.clone(), sizing);
        let evaluator = PerformanceEvaluator::new(&config.performance);
        let breaker = CircuitBreaker::new(config.breaker.clone());
        let tracker = PortfolioTracker::new(config.risk.initial_capital);
        Self {
            config,
            validator,
            evaluator,
            breaker,
            tracker,
        }
    }

    /// Run one decision cycle
    pub fn run_cycle(&mut self, input: CycleInput) -> Result<CycleReport, EngineError> {
        for fill in &input.fills {
            self.apply_fill(fill);
        }

        self.tracker
            .record_equity(input.equity, input.available_margin, input.now);
        let snapshot = self.tracker.snapshot()?;

        let performance = self.evaluator.evaluate(
            &snapshot,
            self.tracker.history(),
            self.tracker.equity_curve(),
        );

        let escalation = self
            .breaker
            .on_drawdown(performance.drawdown, input.now);
        let mut liquidations = Vec::new();
        if let Some(ref esc) = escalation {
            telemetry::increment(CounterMetric::Escalations);
            tracing::warn!(
                from = %esc.from,
                to = %esc.to,
                drawdown = %performance.drawdown,
                cooldown_until = ?esc.cooldown_until,
                "circuit breaker escalated"
            );
            if esc.to.is_terminal() {
                // Designed end state, not a failure; flagged for the operator
                tracing::error!(
                    "emergency stop entered; trading disabled for the remainder of the run"
                );
            }
            if esc.liquidate {
                for position in &snapshot.open_positions {
                    liquidations.push(OrderSpec::Close {
                        symbol: position.symbol.clone(),
                    });
                }
                if !liquidations.is_empty() {
                    telemetry::increment(CounterMetric::Liquidations);
                    tracing::warn!(
                        count = liquidations.len(),
                        "forced liquidation of all open positions"
                    );
                }
            }
        }

        let day_fraction = self.config.competition.day_fraction(input.now);
        let mut decisions = Vec::with_capacity(input.proposals.len());
        for entry in &input.proposals {
            let result = self.validator.validate(
                &entry.proposal,
                &snapshot,
                &self.breaker,
                entry.mark_price,
                day_fraction,
                input.now,
            );
            match result {
                ValidationResult::Accepted(_) => {
                    telemetry::increment(CounterMetric::DecisionsAccepted)
                }
                ValidationResult::Rejected(_) => {
                    telemetry::increment(CounterMetric::DecisionsRejected)
                }
            }
            tracing::info!(
                target: "riskgate::events",
                asset = %entry.proposal.asset,
                reason = %entry.proposal.reason,
                result = %serde_json::to_string(&result).unwrap_or_default(),
                "decision evaluated"
            );
            decisions.push(Decision {
                asset: entry.proposal.asset.clone(),
                result,
            });
        }

        self.publish_gauges(&snapshot, &performance);
        telemetry::increment(CounterMetric::Cycles);

        Ok(CycleReport {
            at: input.now,
            performance,
            breaker: self.breaker.state(),
            escalation,
            liquidations,
            decisions,
        })
    }

    /// Apply a fill reported by the execution gateway
    pub fn apply_fill(&mut self, fill: &FillEvent) {
        match fill {
            FillEvent::Entry {
                symbol,
                side,
                fill_price,
                quantity,
                leverage,
                timestamp,
            } => {
                self.tracker.open_position(
                    symbol.clone(),
                    *side,
                    *fill_price,
                    *quantity,
                    *leverage,
                    *timestamp,
                );
            }
            FillEvent::Close {
                symbol,
                exit_price,
                realized_pnl,
                timestamp,
            } => {
                if self
                    .tracker
                    .close_position(symbol, *exit_price, *realized_pnl, *timestamp)
                    .is_none()
                {
                    tracing::warn!(symbol, "close fill for unknown position ignored");
                }
            }
        }
    }

    /// Administrative circuit-breaker reset, operator-only
    pub fn reset_breaker(&mut self, now: DateTime<Utc>) -> Result<BreakerLevel, BreakerError> {
        match self.breaker.reset(now) {
            Ok(from) => {
                tracing::warn!(from = %from, "circuit breaker manually reset");
                Ok(from)
            }
            Err(err) => {
                tracing::error!("circuit breaker reset rejected at terminal level");
                Err(err)
            }
        }
    }

    /// Circuit-breaker view, for reporting
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Portfolio view, for reporting
    pub fn tracker(&self) -> &PortfolioTracker {
        &self.tracker
    }

    fn publish_gauges(
        &self,
        snapshot: &crate::portfolio::PortfolioSnapshot,
        performance: &PerformanceSnapshot,
    ) {
        telemetry::set_gauge(GaugeMetric::Equity, snapshot.equity.to_f64().unwrap_or(0.0));
        telemetry::set_gauge(
            GaugeMetric::PeakEquity,
            snapshot.peak_equity.to_f64().unwrap_or(0.0),
        );
        telemetry::set_gauge(
            GaugeMetric::Drawdown,
            performance.drawdown.to_f64().unwrap_or(0.0),
        );
        telemetry::set_gauge(GaugeMetric::OpenPositions, snapshot.open_count() as f64);
        telemetry::set_gauge(
            GaugeMetric::Exposure,
            snapshot.exposure().to_f64().unwrap_or(0.0),
        );
        telemetry::set_gauge(
            GaugeMetric::BreakerLevel,
            f64::from(self.breaker.level().tier()),
        );
        telemetry::set_gauge(GaugeMetric::SharpeRatio, performance.sharpe_ratio);
        telemetry::set_gauge(GaugeMetric::WinRate, performance.win_rate);
    }
}
