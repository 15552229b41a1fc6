//! Performance statistics

use crate::config::PerformanceConfig;
use crate::portfolio::{ClosedTrade, EquityPoint, PortfolioSnapshot};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

/// Derived statistics for one cycle
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceSnapshot {
    /// Decline from peak equity, as a fraction
    pub drawdown: Decimal,
    /// Winning trades over total trades; 0 with no trades
    pub win_rate: f64,
    /// Gross profit over gross loss; infinite when losses are zero and
    /// profits positive, 0 when both are zero
    pub profit_factor: f64,
    /// Annualized mean-over-deviation of period returns; 0 below 2 samples
    pub sharpe_ratio: f64,
    /// Closed trades in the history
    pub total_trades: usize,
}

/// Recomputes statistics from the immutable trade log and equity curve
///
/// There is no cached aggregate state; every call derives everything from
/// the history it is given.
#[derive(Debug, Clone)]
pub struct PerformanceEvaluator {
    periods_per_year: f64,
}

impl PerformanceEvaluator {
    /// Create an evaluator from configuration
    pub fn new(config: &PerformanceConfig) -> Self {
        Self {
            periods_per_year: config.periods_per_year,
        }
    }

    /// Derive all statistics for the current cycle
    pub fn evaluate(
        &self,
        snapshot: &PortfolioSnapshot,
        trades: &[ClosedTrade],
        equity_curve: &[EquityPoint],
    ) -> PerformanceSnapshot {
        PerformanceSnapshot {
            drawdown: snapshot.drawdown(),
            win_rate: win_rate(trades),
            profit_factor: profit_factor(trades),
            sharpe_ratio: self.sharpe_ratio(equity_curve),
            total_trades: trades.len(),
        }
    }

    fn sharpe_ratio(&self, equity_curve: &[EquityPoint]) -> f64 {
        let returns: Vec<f64> = equity_curve
            .windows(2)
            .filter(|w| w[0].equity > Decimal::ZERO)
            .filter_map(|w| ((w[1].equity - w[0].equity) / w[0].equity).to_f64())
            .collect();

        if returns.len() < 2 {
            return 0.0;
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std_dev = variance.sqrt();

        if std_dev == 0.0 {
            return 0.0;
        }

        mean / std_dev * self.periods_per_year.sqrt()
    }
}

fn win_rate(trades: &[ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let wins = trades.iter().filter(|t| t.is_win()).count();
    wins as f64 / trades.len() as f64
}

fn profit_factor(trades: &[ClosedTrade]) -> f64 {
    let gross_profit: Decimal = trades
        .iter()
        .filter(|t| t.realized_pnl > Decimal::ZERO)
        .map(|t| t.realized_pnl)
        .sum();
    let gross_loss: Decimal = trades
        .iter()
        .filter(|t| t.realized_pnl < Decimal::ZERO)
        .map(|t| -t.realized_pnl)
        .sum();

    if gross_loss == Decimal::ZERO {
        if gross_profit > Decimal::ZERO {
            return f64::INFINITY;
        }
        return 0.0;
    }

    (gross_profit / gross_loss).to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Side;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn evaluator() -> PerformanceEvaluator {
        PerformanceEvaluator::new(&PerformanceConfig::default())
    }

    fn trade(pnl: Decimal) -> ClosedTrade {
        let now = Utc::now();
        ClosedTrade {
            symbol: "BTCUSDT".to_string(),
            side: Side::Long,
            entry_price: dec!(50000),
            exit_price: dec!(50000),
            quantity: dec!(0.01),
            leverage: 2,
            realized_pnl: pnl,
            opened_at: now,
            closed_at: now,
        }
    }

    fn snapshot(equity: Decimal, peak: Decimal) -> PortfolioSnapshot {
        PortfolioSnapshot::new(equity, peak, equity, dec!(10000), vec![]).unwrap()
    }

    fn curve(values: &[Decimal]) -> Vec<EquityPoint> {
        values
            .iter()
            .map(|&equity| EquityPoint {
                timestamp: Utc::now(),
                equity,
            })
            .collect()
    }

    #[test]
    fn test_empty_history_is_all_zeros() {
        let perf = evaluator().evaluate(&snapshot(dec!(10000), dec!(10000)), &[], &[]);
        assert_eq!(perf.win_rate, 0.0);
        assert_eq!(perf.profit_factor, 0.0);
        assert_eq!(perf.sharpe_ratio, 0.0);
        assert_eq!(perf.total_trades, 0);
    }

    #[test]
    fn test_win_rate() {
        let trades = vec![trade(dec!(50)), trade(dec!(-20)), trade(dec!(30)), trade(dec!(10))];
        let perf = evaluator().evaluate(&snapshot(dec!(10000), dec!(10000)), &trades, &[]);
        assert_eq!(perf.win_rate, 0.75);
        assert_eq!(perf.total_trades, 4);
    }

    #[test]
    fn test_profit_factor_ratio() {
        let trades = vec![trade(dec!(60)), trade(dec!(-30))];
        let perf = evaluator().evaluate(&snapshot(dec!(10000), dec!(10000)), &trades, &[]);
        assert_eq!(perf.profit_factor, 2.0);
    }

    #[test]
    fn test_profit_factor_no_losses_is_infinite() {
        let trades = vec![trade(dec!(60)), trade(dec!(40))];
        let perf = evaluator().evaluate(&snapshot(dec!(10000), dec!(10000)), &trades, &[]);
        assert!(perf.profit_factor.is_infinite());
    }

    #[test]
    fn test_profit_factor_breakeven_trades_only() {
        let trades = vec![trade(dec!(0)), trade(dec!(0))];
        let perf = evaluator().evaluate(&snapshot(dec!(10000), dec!(10000)), &trades, &[]);
        assert_eq!(perf.profit_factor, 0.0);
    }

    #[test]
    fn test_sharpe_needs_two_return_samples() {
        let evaluator = evaluator();
        let snap = snapshot(dec!(10000), dec!(10000));

        // One equity point -> zero return samples
        let perf = evaluator.evaluate(&snap, &[], &curve(&[dec!(10000)]));
        assert_eq!(perf.sharpe_ratio, 0.0);

        // Two points -> one return sample, still short of two
        let perf = evaluator.evaluate(&snap, &[], &curve(&[dec!(10000), dec!(10100)]));
        assert_eq!(perf.sharpe_ratio, 0.0);
    }

    #[test]
    fn test_sharpe_zero_variance_is_zero() {
        let points = curve(&[dec!(10000), dec!(10100), dec!(10201)]);
        let perf = evaluator().evaluate(&snapshot(dec!(10201), dec!(10201)), &[], &points);
        // Identical 1% returns: zero deviation, report 0 not a fault
        assert_eq!(perf.sharpe_ratio, 0.0);
    }

    #[test]
    fn test_sharpe_positive_for_uptrend() {
        let points = curve(&[dec!(10000), dec!(10200), dec!(10250), dec!(10500)]);
        let perf = evaluator().evaluate(&snapshot(dec!(10500), dec!(10500)), &[], &points);
        assert!(perf.sharpe_ratio > 0.0);
        assert!(perf.sharpe_ratio.is_finite());
    }

    #[test]
    fn test_sharpe_skips_zero_equity_samples() {
        let points = curve(&[dec!(0), dec!(100), dec!(110), dec!(99), dec!(120)]);
        let perf = evaluator().evaluate(&snapshot(dec!(120), dec!(120)), &[], &points);
        assert!(perf.sharpe_ratio.is_finite());
    }

    #[test]
    fn test_drawdown_from_snapshot() {
        let perf = evaluator().evaluate(&snapshot(dec!(5000), dec!(10000)), &[], &[]);
        assert_eq!(perf.drawdown, dec!(0.50));
    }
}
