//! Termsense server binary
//!
//! Loads `.env`, parses flags, initializes logging and starts the HTTP server.

use clap::Parser;
use std::process;
use termsense_server::{cli::Cli, start_server, ServerError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let config = cli.into_config()?;
    start_server(config).await
}
