use clap::Parser;
use riskgate::cli::{Cli, Commands};
use riskgate::config::Config;
use rust_decimal_macros::dec;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    let _telemetry = riskgate::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting decision-gating loop");
            args.execute(config).await?;
        }
        Commands::Replay(args) => {
            tracing::info!("Starting replay");
            args.execute(config)?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Initial capital: {}", config.risk.initial_capital);
            println!(
                "  Limits: {}x leverage, {} positions, {}% portfolio risk",
                config.risk.max_leverage,
                config.risk.max_open_positions,
                config.risk.max_portfolio_risk * dec!(100)
            );
            println!(
                "  Confidence floors: {} default, {} volatile",
                config.risk.min_confidence, config.risk.volatile_min_confidence
            );
            println!(
                "  Breaker ladder: {}% / {}% / {}% / {}% drawdown",
                config.breaker.warning.drawdown * dec!(100),
                config.breaker.defensive.drawdown * dec!(100),
                config.breaker.critical.drawdown * dec!(100),
                config.breaker.emergency.drawdown * dec!(100)
            );
            println!(
                "  Competition: {} days from {}",
                config.competition.duration_days, config.competition.start
            );
        }
    }

    Ok(())
}
