//! CLI interface for riskgate
//!
//! Provides subcommands for:
//! - `run`: gate decision cycles streamed as JSON lines on stdin
//! - `replay`: run a recorded cycle file and print a summary
//! - `config`: show the effective configuration

mod replay;
mod run;

pub use replay::ReplayArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "riskgate")]
#[command(about = "Risk-control and decision-gating core for an autonomous trading agent")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Gate decision cycles streamed as JSON lines on stdin
    Run(RunArgs),
    /// Replay a recorded cycle file and print a summary
    Replay(ReplayArgs),
    /// Show the effective configuration
    Config,
}
