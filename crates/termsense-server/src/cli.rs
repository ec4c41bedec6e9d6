//! Command-line arguments and their merge into the file configuration.

use crate::config::{ConfigError, ServerConfig};
use clap::Parser;
use std::path::PathBuf;
use termsense_analyzer::ProviderConfig;
use termsense_llm::ProviderFamily;

/// Termsense server - summarize terms and conditions with an LLM.
///
/// Flags override values from the config file.
#[derive(Debug, Parser)]
#[command(name = "termsense-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Provider family (gemini or openai)
    #[arg(long, env = "TERMSENSE_PROVIDER")]
    pub provider: Option<ProviderFamily>,

    /// Provider API key, for either family
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API key for the openai family, used when --api-key is not given
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Model name
    #[arg(long, env = "TERMSENSE_MODEL")]
    pub model: Option<String>,

    /// Provider base URL
    #[arg(long, env = "TERMSENSE_BASE_URL")]
    pub base_url: Option<String>,

    /// Provider request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Fail requests instead of returning mock results when no API key is set
    #[arg(long)]
    pub no_mock: bool,
}

impl Cli {
    /// Load the config file (if any) and apply flag overrides
    pub fn into_config(self) -> Result<ServerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };
        self.apply(&mut config);
        config.analyzer.validate()?;
        Ok(config)
    }

    /// Apply flag overrides to `config`
    pub fn apply(self, config: &mut ServerConfig) {
        if let Some(port) = self.port {
            config.bind_port = port;
        }
        if let Some(bind) = self.bind {
            config.bind_address = bind;
        }

        let analyzer = &mut config.analyzer;
        if let Some(timeout) = self.timeout_secs {
            analyzer.request_timeout_secs = Some(timeout);
        }
        if self.no_mock {
            analyzer.allow_mock_fallback = false;
        }

        let family = self
            .provider
            .or(analyzer.provider.as_ref().map(|p| p.family))
            .unwrap_or_default();
        let api_key = match family {
            ProviderFamily::OpenAi => self.api_key.or(self.openai_api_key),
            ProviderFamily::Gemini => self.api_key,
        };

        let touches_provider = self.provider.is_some()
            || api_key.is_some()
            || self.model.is_some()
            || self.base_url.is_some();
        if !touches_provider {
            return;
        }

        let provider = analyzer
            .provider
            .get_or_insert_with(|| ProviderConfig::for_family(family, ""));
        provider.family = family;
        if let Some(api_key) = api_key {
            provider.api_key = api_key;
        }
        if let Some(model) = self.model {
            provider.model = Some(model);
        }
        if let Some(base_url) = self.base_url {
            provider.base_url = Some(base_url);
        }
    }
}
