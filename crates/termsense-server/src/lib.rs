//! Termsense Server
//!
//! HTTP boundary for document analysis. Serves `POST /api/analyze` and
//! `GET /api/health` to the web and browser-extension clients.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use termsense_analyzer::AnalysisService;
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The analysis service could not be built
    #[error("Configuration error: {0}")]
    Analyzer(#[from] termsense_analyzer::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server
///
/// Builds the analysis service from `config.analyzer`, binds the listener
/// and serves until the listener fails.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Termsense server");
    info!("Bind address: {}", config.bind_addr());

    let service = AnalysisService::from_config(&config.analyzer)?;
    info!("Analysis backend: {}", service.backend_name());

    let app = create_router(AppState::new(service));

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
