//! End-to-end scenarios through the public engine API

use chrono::{DateTime, Duration, Utc};
use riskgate::breaker::BreakerLevel;
use riskgate::config::Config;
use riskgate::decision::{DecisionProposal, MarketRegime, TradeAction};
use riskgate::engine::{CycleInput, FillEvent, ProposalInput, RiskEngine};
use riskgate::portfolio::Side;
use riskgate::validate::{OrderSpec, RejectReason, ValidationResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn proposal(
    asset: &str,
    action: TradeAction,
    confidence: Decimal,
    regime: MarketRegime,
) -> ProposalInput {
    ProposalInput {
        proposal: DecisionProposal {
            asset: asset.to_string(),
            action,
            confidence,
            suggested_leverage: 3,
            regime,
            reason: "scenario".to_string(),
        },
        mark_price: dec!(50000),
    }
}

fn cycle(now: DateTime<Utc>, equity: Decimal, proposals: Vec<ProposalInput>) -> CycleInput {
    CycleInput {
        now,
        equity,
        available_margin: equity,
        fills: Vec::new(),
        proposals,
    }
}

fn entry_notional(result: &ValidationResult) -> Decimal {
    match result {
        ValidationResult::Accepted(OrderSpec::Entry { notional, .. }) => *notional,
        other => panic!("expected accepted entry, got {other:?}"),
    }
}

#[test]
fn test_half_capital_lost_halts_trading_permanently() {
    let mut engine = RiskEngine::new(Config::default());
    let now = Utc::now();

    // Equity 5,000 against a 10,000 peak: 50% drawdown, straight to terminal
    engine.run_cycle(cycle(now, dec!(10000), vec![])).unwrap();
    let crash = engine
        .run_cycle(cycle(
            now,
            dec!(5000),
            vec![
                proposal("BTCUSDT", TradeAction::Long, dec!(100), MarketRegime::Trending),
                proposal("ETHUSDT", TradeAction::Short, dec!(99), MarketRegime::Breakout),
            ],
        ))
        .unwrap();

    assert_eq!(crash.breaker.level, BreakerLevel::Emergency);
    for decision in &crash.decisions {
        assert_eq!(
            decision.result.reject_reason(),
            Some(&RejectReason::TradingHalted)
        );
    }

    // Terminal means terminal: recovery does not revive trading
    let recovered = engine
        .run_cycle(cycle(
            now + Duration::hours(1),
            dec!(9900),
            vec![proposal("BTCUSDT", TradeAction::Long, dec!(100), MarketRegime::Trending)],
        ))
        .unwrap();
    assert_eq!(recovered.breaker.level, BreakerLevel::Emergency);
    assert_eq!(
        recovered.decisions[0].result.reject_reason(),
        Some(&RejectReason::TradingHalted)
    );
    assert!(engine.reset_breaker(now + Duration::hours(2)).is_err());
}

#[test]
fn test_higher_confidence_earns_larger_notional() {
    let config = Config::default();
    // Pin the clock at 90% of the competition for the late-run multiplier
    let now = config.competition.start + Duration::seconds(14 * 86_400 * 9 / 10);
    assert_eq!(config.competition.day_fraction(now), dec!(0.9));

    let mut engine = RiskEngine::new(config);
    engine.run_cycle(cycle(now, dec!(10000), vec![])).unwrap();

    // 10% drawdown; both proposals gate against the same snapshot
    let report = engine
        .run_cycle(cycle(
            now,
            dec!(9000),
            vec![
                proposal("BTCUSDT", TradeAction::Long, dec!(85), MarketRegime::Trending),
                proposal("BTCUSDT", TradeAction::Long, dec!(65), MarketRegime::Trending),
            ],
        ))
        .unwrap();

    let high = entry_notional(&report.decisions[0].result);
    let low = entry_notional(&report.decisions[1].result);
    assert!(
        high > low,
        "confidence 85 should size above confidence 65 ({high} vs {low})"
    );
}

#[test]
fn test_symbol_limit_beats_any_confidence() {
    let toml = r#"
        [risk]
        max_open_positions = 6
        max_positions_per_symbol = 2
    "#;
    let config: Config = toml::from_str(toml).unwrap();
    let mut engine = RiskEngine::new(config);
    let now = Utc::now();

    // Four BTCUSDT fills on the books
    let fills = (0..4i64)
        .map(|i| FillEvent::Entry {
            symbol: "BTCUSDT".to_string(),
            side: Side::Long,
            fill_price: dec!(50000),
            quantity: dec!(0.001),
            leverage: 2,
            timestamp: now - Duration::minutes(4 - i),
        })
        .collect();
    engine
        .run_cycle(CycleInput {
            now,
            equity: dec!(10000),
            available_margin: dec!(9000),
            fills,
            proposals: Vec::new(),
        })
        .unwrap();

    let report = engine
        .run_cycle(cycle(
            now + Duration::minutes(1),
            dec!(10000),
            vec![proposal("BTCUSDT", TradeAction::Long, dec!(99), MarketRegime::Breakout)],
        ))
        .unwrap();
    assert_eq!(
        report.decisions[0].result.reject_reason(),
        Some(&RejectReason::SymbolLimitReached)
    );
}

#[test]
fn test_deep_jump_liquidates_and_settles_at_deepest_level() {
    let mut engine = RiskEngine::new(Config::default());
    let now = Utc::now();

    engine
        .run_cycle(CycleInput {
            now,
            equity: dec!(10000),
            available_margin: dec!(9000),
            fills: vec![FillEvent::Entry {
                symbol: "BTCUSDT".to_string(),
                side: Side::Long,
                fill_price: dec!(50000),
                quantity: dec!(0.01),
                leverage: 2,
                timestamp: now,
            }],
            proposals: Vec::new(),
        })
        .unwrap();

    // 10% drawdown: nothing trips
    let mild = engine
        .run_cycle(cycle(now + Duration::minutes(1), dec!(9000), vec![]))
        .unwrap();
    assert!(mild.escalation.is_none());

    // 36% in a single step: settle at Critical, liquidation must still fire
    let deep = engine
        .run_cycle(cycle(now + Duration::minutes(2), dec!(6400), vec![]))
        .unwrap();
    let escalation = deep.escalation.expect("jump must escalate");
    assert_eq!(escalation.to, BreakerLevel::Critical);
    assert!(escalation.liquidate);
    assert_eq!(
        deep.liquidations,
        vec![OrderSpec::Close {
            symbol: "BTCUSDT".to_string()
        }]
    );
}

#[test]
fn test_cooldown_then_confidence_floor() {
    let mut engine = RiskEngine::new(Config::default());
    let start = Utc::now();

    engine.run_cycle(cycle(start, dec!(10000), vec![])).unwrap();

    // 31% drawdown: Defensive, 12h cooldown
    let trip = engine
        .run_cycle(cycle(start, dec!(6900), vec![]))
        .unwrap();
    assert_eq!(trip.breaker.level, BreakerLevel::Defensive);

    // Inside the cooldown even a 95-confidence setup is blocked
    let during = engine
        .run_cycle(cycle(
            start + Duration::hours(6),
            dec!(6900),
            vec![proposal("BTCUSDT", TradeAction::Long, dec!(95), MarketRegime::Trending)],
        ))
        .unwrap();
    assert!(matches!(
        during.decisions[0].result.reject_reason(),
        Some(RejectReason::InCooldown { .. })
    ));

    // After the cooldown the Defensive floor of 80 governs
    let after = engine
        .run_cycle(cycle(
            start + Duration::hours(13),
            dec!(6900),
            vec![
                proposal("BTCUSDT", TradeAction::Long, dec!(75), MarketRegime::Trending),
                proposal("ETHUSDT", TradeAction::Long, dec!(85), MarketRegime::Trending),
            ],
        ))
        .unwrap();
    assert!(matches!(
        after.decisions[0].result.reject_reason(),
        Some(RejectReason::LowConfidence { .. })
    ));
    assert!(after.decisions[1].result.is_accepted());
}

#[test]
fn test_close_and_hold_bypass_entry_gates() {
    let mut engine = RiskEngine::new(Config::default());
    let now = Utc::now();

    engine
        .run_cycle(CycleInput {
            now,
            equity: dec!(10000),
            available_margin: dec!(9000),
            fills: vec![FillEvent::Entry {
                symbol: "BTCUSDT".to_string(),
                side: Side::Long,
                fill_price: dec!(50000),
                quantity: dec!(0.01),
                leverage: 2,
                timestamp: now,
            }],
            proposals: Vec::new(),
        })
        .unwrap();

    // Drop into the Defensive cooldown; HOLD and CLOSE still route through
    let report = engine
        .run_cycle(cycle(
            now + Duration::minutes(1),
            dec!(6900),
            vec![
                proposal("ETHUSDT", TradeAction::Hold, dec!(10), MarketRegime::Neutral),
                proposal("BTCUSDT", TradeAction::Close, dec!(10), MarketRegime::Neutral),
                proposal("SOLUSDT", TradeAction::Close, dec!(90), MarketRegime::Neutral),
            ],
        ))
        .unwrap();

    assert_eq!(
        report.decisions[0].result,
        ValidationResult::Accepted(OrderSpec::Hold)
    );
    assert_eq!(
        report.decisions[1].result,
        ValidationResult::Accepted(OrderSpec::Close {
            symbol: "BTCUSDT".to_string()
        })
    );
    assert_eq!(
        report.decisions[2].result.reject_reason(),
        Some(&RejectReason::NoPositionToClose)
    );
}

#[test]
fn test_statistics_sentinels_over_a_short_run() {
    let mut engine = RiskEngine::new(Config::default());
    let now = Utc::now();

    // First cycle: no trades, one equity sample
    let first = engine.run_cycle(cycle(now, dec!(10000), vec![])).unwrap();
    assert_eq!(first.performance.win_rate, 0.0);
    assert_eq!(first.performance.profit_factor, 0.0);
    assert_eq!(first.performance.sharpe_ratio, 0.0);

    // One winning close and no losers: profit factor reports infinite
    let second = engine
        .run_cycle(CycleInput {
            now: now + Duration::minutes(1),
            equity: dec!(10100),
            available_margin: dec!(10100),
            fills: vec![
                FillEvent::Entry {
                    symbol: "BTCUSDT".to_string(),
                    side: Side::Long,
                    fill_price: dec!(50000),
                    quantity: dec!(0.01),
                    leverage: 2,
                    timestamp: now,
                },
                FillEvent::Close {
                    symbol: "BTCUSDT".to_string(),
                    exit_price: dec!(60000),
                    realized_pnl: dec!(100),
                    timestamp: now + Duration::minutes(1),
                },
            ],
            proposals: Vec::new(),
        })
        .unwrap();
    assert_eq!(second.performance.total_trades, 1);
    assert_eq!(second.performance.win_rate, 1.0);
    assert!(second.performance.profit_factor.is_infinite());
}

#[test]
fn test_example_config_parses() {
    let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
    assert_eq!(config.risk.max_leverage, 5);
    assert_eq!(config.breaker.emergency.drawdown, dec!(0.38));
    assert_eq!(config.telemetry.log_level, "info");
}
