//! Benchmarks for the position sizing hot path

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use riskgate::config::{RiskConfig, SizingConfig};
use riskgate::decision::MarketRegime;
use riskgate::sizing::{SizingEngine, SizingInputs};
use rust_decimal_macros::dec;

fn benchmark_size_single(c: &mut Criterion) {
    let engine = SizingEngine::new(SizingConfig::default(), RiskConfig::default());

    let inputs = SizingInputs {
        confidence: dec!(85),
        regime: MarketRegime::Trending,
        day_fraction: dec!(0.65),
        drawdown: dec!(0.12),
        suggested_leverage: 3,
        level_max_size: None,
        level_max_leverage: None,
    };

    c.bench_function("sizing_single", |b| {
        b.iter(|| engine.size(black_box(&inputs)))
    });
}

fn benchmark_size_restricted(c: &mut Criterion) {
    let engine = SizingEngine::new(SizingConfig::default(), RiskConfig::default());

    let inputs = SizingInputs {
        confidence: dec!(92),
        regime: MarketRegime::Volatile,
        day_fraction: dec!(0.9),
        drawdown: dec!(0.28),
        suggested_leverage: 5,
        level_max_size: Some(dec!(0.05)),
        level_max_leverage: Some(2),
    };

    c.bench_function("sizing_restricted", |b| {
        b.iter(|| engine.size(black_box(&inputs)))
    });
}

fn benchmark_size_regime_sweep(c: &mut Criterion) {
    let engine = SizingEngine::new(SizingConfig::default(), RiskConfig::default());

    c.bench_function("sizing_regime_sweep", |b| {
        b.iter(|| {
            for regime in MarketRegime::ALL {
                let inputs = SizingInputs {
                    confidence: dec!(75),
                    regime,
                    day_fraction: dec!(0.5),
                    drawdown: dec!(0.05),
                    suggested_leverage: 3,
                    level_max_size: None,
                    level_max_leverage: None,
                };
                black_box(engine.size(&inputs));
            }
        })
    });
}

criterion_group!(
    benches,
    benchmark_size_single,
    benchmark_size_restricted,
    benchmark_size_regime_sweep
);
criterion_main!(benches);
