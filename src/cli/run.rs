//! Run command implementation

use crate::config::Config;
use crate::engine::{CycleInput, RiskEngine};
use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Pretty-print cycle reports instead of one line each
    #[arg(long)]
    pub pretty: bool,
}

impl RunArgs {
    /// Read one `CycleInput` JSON object per stdin line, write one
    /// `CycleReport` per stdout line. The external scheduler owns the
    /// cadence; this loop just gates whatever it is fed.
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let mut engine = RiskEngine::new(config);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        tracing::info!("decision loop ready; reading cycle inputs from stdin");
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let input: CycleInput = match serde_json::from_str(&line) {
                Ok(input) => input,
                Err(e) => {
                    tracing::error!(error = %e, "malformed cycle input skipped");
                    continue;
                }
            };

            // An invariant violation aborts the loop
            let report = engine.run_cycle(input)?;

            let rendered = if self.pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            stdout.write_all(rendered.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        tracing::info!("input stream closed; decision loop stopping");
        Ok(())
    }
}
