mod cli;
mod config;
mod errors;
mod evaluation;
mod layout;
mod models;
mod parsing;
mod pipeline;
mod validation;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (a malformed BANNED_CLAIMS aborts startup)
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries only command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting tailor v{}", env!("CARGO_PKG_VERSION"));

    match cli::run(cli.command, &config).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            error!("Command failed [{}]: {}", e.code(), e);
            Err(e.into())
        }
    }
}
