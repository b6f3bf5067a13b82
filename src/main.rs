//! framecap binary: extract frames from a capture file into numbered images.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use framecap::{ExtractError, Framecap};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = cli::Cli::parse();
    let config = cli.resolve().context("Failed to resolve configuration")?;

    info!("Extracting frames from {}", config.input.display());

    let written = match Framecap::extract_to(&config).await {
        Ok(written) => written,
        Err(err) => {
            report(&err);
            return Err(err).with_context(|| format!("Extraction from {} failed", config.input.display()));
        }
    };

    info!("Extracted {} frames into {}", written.len(), config.output_dir.display());
    Ok(())
}

fn report(err: &ExtractError) {
    error!("{}", err);
    for suggestion in err.recovery_suggestions() {
        error!("  - {}", suggestion);
    }
}
