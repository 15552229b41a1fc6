//! riskgate: risk-control and decision-gating core for an autonomous trading agent
//!
//! This library provides the core components for:
//! - Portfolio state tracking (equity, peak equity, positions, trade history)
//! - Drawdown-driven circuit breaker with forced de-risking and cooldowns
//! - Pure position sizing from confidence, regime, time pressure and drawdown
//! - Ordered-rule trade validation with deterministic rejection reasons
//! - On-demand performance statistics (drawdown, win rate, profit factor, Sharpe)
//! - A single-writer cycle engine tying the pipeline together
//! - Structured logging and Prometheus metrics

pub mod breaker;
pub mod cli;
pub mod config;
pub mod decision;
pub mod engine;
pub mod perf;
pub mod portfolio;
pub mod sizing;
pub mod telemetry;
pub mod validate;
