//! Prometheus metrics

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Current equity
    Equity,
    /// Historical peak equity
    PeakEquity,
    /// Current drawdown fraction
    Drawdown,
    /// Open position count
    OpenPositions,
    /// Total open notional
    Exposure,
    /// Circuit-breaker tier (0-4)
    BreakerLevel,
    /// Rolling Sharpe ratio
    SharpeRatio,
    /// Rolling win rate
    WinRate,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Proposals accepted by the validator
    DecisionsAccepted,
    /// Proposals rejected by the validator
    DecisionsRejected,
    /// Circuit-breaker escalations
    Escalations,
    /// Forced close-all directives issued
    Liquidations,
    /// Decision cycles completed
    Cycles,
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let name = match metric {
        GaugeMetric::Equity => "riskgate_equity_usd",
        GaugeMetric::PeakEquity => "riskgate_peak_equity_usd",
        GaugeMetric::Drawdown => "riskgate_drawdown_fraction",
        GaugeMetric::OpenPositions => "riskgate_open_positions",
        GaugeMetric::Exposure => "riskgate_exposure_usd",
        GaugeMetric::BreakerLevel => "riskgate_breaker_level",
        GaugeMetric::SharpeRatio => "riskgate_sharpe_ratio",
        GaugeMetric::WinRate => "riskgate_win_rate",
    };

    metrics::gauge!(name).set(value);
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    let name = match metric {
        CounterMetric::DecisionsAccepted => "riskgate_decisions_accepted_total",
        CounterMetric::DecisionsRejected => "riskgate_decisions_rejected_total",
        CounterMetric::Escalations => "riskgate_breaker_escalations_total",
        CounterMetric::Liquidations => "riskgate_liquidations_total",
        CounterMetric::Cycles => "riskgate_cycles_total",
    };

    metrics::counter!(name).increment(1);
}
