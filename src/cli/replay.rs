//! Replay command implementation

use crate::breaker::BreakerLevel;
use crate::config::Config;
use crate::engine::{CycleInput, RiskEngine};
use crate::validate::ValidationResult;
use clap::Args;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Recorded cycle inputs, one JSON object per line
    pub input: PathBuf,
}

impl ReplayArgs {
    pub fn execute(&self, config: Config) -> anyhow::Result<()> {
        let summary = replay(&self.input, config)?;
        println!("{}", summary.format_table());
        Ok(())
    }
}

/// Aggregate outcome of a replay
#[derive(Debug, Clone)]
pub struct ReplaySummary {
    pub cycles: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub liquidation_orders: usize,
    pub final_equity: Decimal,
    pub peak_equity: Decimal,
    pub drawdown: Decimal,
    pub breaker_level: BreakerLevel,
    pub total_trades: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub sharpe_ratio: f64,
}

/// Run every cycle in the file through a fresh engine
pub fn replay(path: &Path, config: Config) -> anyhow::Result<ReplaySummary> {
    let content = std::fs::read_to_string(path)?;
    let mut engine = RiskEngine::new(config);

    let mut cycles = 0usize;
    let mut accepted = 0usize;
    let mut rejected = 0usize;
    let mut liquidation_orders = 0usize;
    let mut last_performance = None;

    for (number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let input: CycleInput = serde_json::from_str(line)
            .map_err(|e| anyhow::anyhow!("line {}: {}", number + 1, e))?;
        let report = engine.run_cycle(input)?;

        cycles += 1;
        liquidation_orders += report.liquidations.len();
        for decision in &report.decisions {
            match decision.result {
                ValidationResult::Accepted(_) => accepted += 1,
                ValidationResult::Rejected(_) => rejected += 1,
            }
        }
        last_performance = Some(report.performance);
    }

    let (total_trades, win_rate, profit_factor, sharpe_ratio) = match last_performance {
        Some(perf) => (
            perf.total_trades,
            perf.win_rate,
            perf.profit_factor,
            perf.sharpe_ratio,
        ),
        None => (0, 0.0, 0.0, 0.0),
    };

    let tracker = engine.tracker();
    let final_equity = tracker.equity();
    let peak_equity = tracker.peak_equity();
    let drawdown = if peak_equity > Decimal::ZERO {
        (peak_equity - final_equity) / peak_equity
    } else {
        Decimal::ZERO
    };

    Ok(ReplaySummary {
        cycles,
        accepted,
        rejected,
        liquidation_orders,
        final_equity,
        peak_equity,
        drawdown,
        breaker_level: engine.breaker().level(),
        total_trades,
        win_rate,
        profit_factor,
        sharpe_ratio,
    })
}

impl ReplaySummary {
    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
               REPLAY RESULTS
══════════════════════════════════════════════════════

PORTFOLIO
───────────────────────────────────────────────────────
Final Equity:     {:.2}
Peak Equity:      {:.2}
Drawdown:         {:.2}%
Breaker Level:    {}

DECISIONS
───────────────────────────────────────────────────────
Cycles:           {}
Accepted:         {}
Rejected:         {}
Forced Closes:    {}

PERFORMANCE
───────────────────────────────────────────────────────
Closed Trades:    {}
Win Rate:         {:.1}%
Profit Factor:    {:.2}
Sharpe Ratio:     {:.2}
══════════════════════════════════════════════════════
"#,
            self.final_equity,
            self.peak_equity,
            self.drawdown * Decimal::new(100, 0),
            self.breaker_level,
            self.cycles,
            self.accepted,
            self.rejected,
            self.liquidation_orders,
            self.total_trades,
            self.win_rate * 100.0,
            self.profit_factor,
            self.sharpe_ratio,
        )
    }
}
