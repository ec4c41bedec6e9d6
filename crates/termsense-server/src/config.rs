//! Configuration file parsing for the server.
//!
//! Loads the bind address and the `[analyzer]` table from TOML. Every field
//! is optional; an empty file gives a mock-backed server on 127.0.0.1:3001.

use serde::{Deserialize, Serialize};
use std::path::Path;
use termsense_analyzer::AnalyzerConfig;
use thiserror::Error;

/// Default port, shared with the browser clients
pub const DEFAULT_PORT: u16 = 3001;

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The analyzer table is invalid
    #[error(transparent)]
    Analyzer(#[from] termsense_analyzer::ConfigError),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 3001)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Analysis settings
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_bind_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ServerConfig = toml::from_str(toml_str)?;
        config.analyzer.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termsense_llm::ProviderFamily;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.bind_port, 3001);
        assert!(config.analyzer.allow_mock_fallback);
        assert!(!config.analyzer.has_credentials());
    }

    #[test]
    fn test_bind_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3001");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(ServerConfig::from_toml("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            bind_address = "0.0.0.0"
            bind_port = 9000

            [analyzer]
            allow_mock_fallback = false
            request_timeout_secs = 30

            [analyzer.provider]
            family = "openai"
            api_key = "sk-test"
            model = "gpt-4o"
        "#;

        let config = ServerConfig::from_toml(toml).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.bind_port, 9000);
        assert!(!config.analyzer.allow_mock_fallback);
        assert_eq!(config.analyzer.request_timeout_secs, Some(30));

        let provider = config.analyzer.provider.unwrap();
        assert_eq!(provider.family, ProviderFamily::OpenAi);
        assert_eq!(provider.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_invalid_analyzer_table() {
        let toml = r#"
            [analyzer]
            request_timeout_secs = 0
        "#;
        assert!(matches!(
            ServerConfig::from_toml(toml),
            Err(ConfigError::Analyzer(_))
        ));
    }
}
