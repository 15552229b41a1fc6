//! Configuration types for riskgate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub sizing: SizingConfig,
    #[serde(default)]
    pub breaker: BreakerConfig,
    #[serde(default)]
    pub competition: CompetitionConfig,
    #[serde(default)]
    pub performance: PerformanceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Hard risk limits and validation floors
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Capital at the start of the run
    #[serde(default = "default_initial_capital")]
    pub initial_capital: Decimal,

    /// Global leverage ceiling, never exceeded
    #[serde(default = "default_max_leverage")]
    pub max_leverage: u32,

    /// Maximum concurrent open positions
    #[serde(default = "default_max_open_positions")]
    pub max_open_positions: usize,

    /// Maximum concurrent open positions per symbol
    #[serde(default = "default_max_positions_per_symbol")]
    pub max_positions_per_symbol: usize,

    /// Maximum aggregate exposure as a fraction of equity
    #[serde(default = "default_max_portfolio_risk")]
    pub max_portfolio_risk: Decimal,

    /// Default confidence floor for new entries
    #[serde(default = "default_min_confidence")]
    pub min_confidence: Decimal,

    /// Lower confidence floor applied in VOLATILE regimes
    #[serde(default = "default_volatile_min_confidence")]
    pub volatile_min_confidence: Decimal,

    /// Stop-loss distance from entry, as a fraction of price
    #[serde(default = "default_stop_loss_pct")]
    pub stop_loss_pct: Decimal,

    /// Confidence at which the high-confidence leverage bump applies
    #[serde(default = "default_high_confidence_threshold")]
    pub high_confidence_threshold: Decimal,

    /// Leverage granted to high-confidence entries (still capped)
    #[serde(default = "default_high_confidence_leverage")]
    pub high_confidence_leverage: u32,
}

fn default_initial_capital() -> Decimal {
    Decimal::new(10_000, 0)
}
fn default_max_leverage() -> u32 {
    5
}
fn default_max_open_positions() -> usize {
    3
}
fn default_max_positions_per_symbol() -> usize {
    2
}
fn default_max_portfolio_risk() -> Decimal {
    Decimal::new(30, 2) // 0.30
}
fn default_min_confidence() -> Decimal {
    Decimal::new(60, 0)
}
fn default_volatile_min_confidence() -> Decimal {
    Decimal::new(50, 0)
}
fn default_stop_loss_pct() -> Decimal {
    Decimal::new(4, 2) // 0.04
}
fn default_high_confidence_threshold() -> Decimal {
    Decimal::new(90, 0)
}
fn default_high_confidence_leverage() -> u32 {
    5
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            initial_capital: default_initial_capital(),
            max_leverage: default_max_leverage(),
            max_open_positions: default_max_open_positions(),
            max_positions_per_symbol: default_max_positions_per_symbol(),
            max_portfolio_risk: default_max_portfolio_risk(),
            min_confidence: default_min_confidence(),
            volatile_min_confidence: default_volatile_min_confidence(),
            stop_loss_pct: default_stop_loss_pct(),
            high_confidence_threshold: default_high_confidence_threshold(),
            high_confidence_leverage: default_high_confidence_leverage(),
        }
    }
}

/// Position sizing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SizingConfig {
    /// Base position size as a fraction of equity
    #[serde(default = "default_base_fraction")]
    pub base_fraction: Decimal,

    /// Absolute ceiling on any single position, as a fraction of equity
    #[serde(default = "default_max_position_fraction")]
    pub max_position_fraction: Decimal,

    /// Sizes below this fraction are not worth placing and collapse to zero
    #[serde(default = "default_min_viable_fraction")]
    pub min_viable_fraction: Decimal,
}

fn default_base_fraction() -> Decimal {
    Decimal::new(8, 2) // 0.08
}
fn default_max_position_fraction() -> Decimal {
    Decimal::new(30, 2) // 0.30
}
fn default_min_viable_fraction() -> Decimal {
    Decimal::new(1, 2) // 0.01
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            base_fraction: default_base_fraction(),
            max_position_fraction: default_max_position_fraction(),
            min_viable_fraction: default_min_viable_fraction(),
        }
    }
}

/// Restrictions carried by one circuit-breaker level
#[derive(Debug, Clone, Deserialize)]
pub struct LevelSpec {
    /// Drawdown fraction at which the level engages
    pub drawdown: Decimal,
    /// Maximum position size fraction while the level is active
    pub max_size: Decimal,
    /// Maximum leverage while the level is active
    pub max_leverage: u32,
    /// No new entries for this many hours after the level engages
    #[serde(default)]
    pub cooldown_hours: i64,
    /// Confidence floor for entries once the cooldown lapses
    #[serde(default)]
    pub min_confidence: Option<Decimal>,
}

/// Circuit-breaker ladder configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BreakerConfig {
    #[serde(default = "default_warning_level")]
    pub warning: LevelSpec,
    #[serde(default = "default_defensive_level")]
    pub defensive: LevelSpec,
    #[serde(default = "default_critical_level")]
    pub critical: LevelSpec,
    #[serde(default = "default_emergency_level")]
    pub emergency: LevelSpec,
}

fn default_warning_level() -> LevelSpec {
    LevelSpec {
        drawdown: Decimal::new(25, 2),
        max_size: Decimal::new(5, 2),
        max_leverage: 2,
        cooldown_hours: 0,
        min_confidence: None,
    }
}
fn default_defensive_level() -> LevelSpec {
    LevelSpec {
        drawdown: Decimal::new(30, 2),
        max_size: Decimal::new(3, 2),
        max_leverage: 2,
        cooldown_hours: 12,
        min_confidence: Some(Decimal::new(80, 0)),
    }
}
fn default_critical_level() -> LevelSpec {
    LevelSpec {
        drawdown: Decimal::new(35, 2),
        max_size: Decimal::new(2, 2),
        max_leverage: 2,
        cooldown_hours: 24,
        min_confidence: Some(Decimal::new(80, 0)),
    }
}
fn default_emergency_level() -> LevelSpec {
    LevelSpec {
        drawdown: Decimal::new(38, 2),
        max_size: Decimal::ZERO,
        max_leverage: 1,
        cooldown_hours: 0,
        min_confidence: None,
    }
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            warning: default_warning_level(),
            defensive: default_defensive_level(),
            critical: default_critical_level(),
            emergency: default_emergency_level(),
        }
    }
}

/// Competition clock used for the time-pressure sizing multiplier
#[derive(Debug, Clone, Deserialize)]
pub struct CompetitionConfig {
    /// Competition start, UTC
    #[serde(default = "default_competition_start")]
    pub start: DateTime<Utc>,

    /// Competition length in days
    #[serde(default = "default_duration_days")]
    pub duration_days: i64,
}

fn default_competition_start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-11-01T00:00:00Z")
        .expect("valid constant timestamp")
        .with_timezone(&Utc)
}
fn default_duration_days() -> i64 {
    14
}

impl CompetitionConfig {
    /// Fraction of the competition elapsed at `now`, clamped to [0, 1]
    pub fn day_fraction(&self, now: DateTime<Utc>) -> Decimal {
        let total_secs = self.duration_days.max(1) * 86_400;
        let elapsed = (now - self.start).num_seconds();
        let fraction = Decimal::from(elapsed) / Decimal::from(total_secs);
        fraction.clamp(Decimal::ZERO, Decimal::ONE)
    }
}

impl Default for CompetitionConfig {
    fn default() -> Self {
        Self {
            start: default_competition_start(),
            duration_days: default_duration_days(),
        }
    }
}

/// Performance statistics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PerformanceConfig {
    /// Annualization factor for the Sharpe ratio (periods per year)
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,
}

fn default_periods_per_year() -> f64 {
    525_600.0 // one-minute decision cycles
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            periods_per_year: default_periods_per_year(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Prometheus exporter port; metrics are in-process only when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,

    /// Default log level when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_port: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
