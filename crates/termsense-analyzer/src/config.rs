//! Configuration for the Analyzer
//!
//! Built once at startup and handed to [`crate::AnalysisService`]. Whether a
//! usable API key is present is decided here, not at call time.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use termsense_llm::{
    gemini, openai, CompletionProvider, GeminiProvider, OpenAiProvider, ProviderFamily,
    SamplingOptions,
};

/// Default simulated delay of the mock backend
pub const DEFAULT_MOCK_DELAY_MS: u64 = 2000;

/// Upstream provider settings
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider family (envelope and auth scheme)
    #[serde(default)]
    pub family: ProviderFamily,

    /// API key; empty means "not configured"
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Base URL override (defaults to the family's public endpoint)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model override (defaults to the family's default model)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl ProviderConfig {
    /// Gemini provider with default endpoint and model
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::for_family(ProviderFamily::Gemini, api_key)
    }

    /// OpenAI provider with default endpoint and model
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::for_family(ProviderFamily::OpenAi, api_key)
    }

    /// Provider of the given family with defaults
    pub fn for_family(family: ProviderFamily, api_key: impl Into<String>) -> Self {
        Self {
            family,
            api_key: api_key.into(),
            base_url: None,
            model: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// True if an API key is set
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Model in effect, falling back to the family default
    pub fn effective_model(&self) -> &str {
        self.model.as_deref().unwrap_or(match self.family {
            ProviderFamily::Gemini => gemini::DEFAULT_MODEL,
            ProviderFamily::OpenAi => openai::DEFAULT_MODEL,
        })
    }

    /// Base URL in effect, falling back to the family default
    pub fn effective_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(match self.family {
            ProviderFamily::Gemini => gemini::DEFAULT_BASE_URL,
            ProviderFamily::OpenAi => openai::DEFAULT_BASE_URL,
        })
    }

    /// Sampling parameters to forward
    pub fn sampling(&self) -> SamplingOptions {
        SamplingOptions {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// Build the envelope for the configured family
    pub fn build_provider(&self) -> Box<dyn CompletionProvider> {
        let api_key = self.api_key.trim().to_string();
        match self.family {
            ProviderFamily::Gemini => Box::new(
                GeminiProvider::new(api_key, self.effective_model())
                    .with_base_url(self.effective_base_url())
                    .with_sampling(self.sampling()),
            ),
            ProviderFamily::OpenAi => Box::new(
                OpenAiProvider::new(api_key, self.effective_model())
                    .with_base_url(self.effective_base_url())
                    .with_sampling(self.sampling()),
            ),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::Invalid(format!(
                    "temperature must be between 0.0 and 2.0, got {}",
                    temperature
                )));
            }
        }
        if self.max_output_tokens == Some(0) {
            return Err(ConfigError::Invalid(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }
        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(ConfigError::Invalid("model must not be empty".to_string()));
            }
        }
        if let Some(base_url) = &self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::Invalid(format!(
                    "base_url must be an http(s) URL, got '{}'",
                    base_url
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("family", &self.family)
            .field("api_key", &if self.has_credentials() { "<redacted>" } else { "<unset>" })
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

/// Configuration for the Analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Upstream provider; absent or keyless means no live backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderConfig>,

    /// Fall back to the mock backend when no API key is configured
    #[serde(default = "default_allow_mock_fallback")]
    pub allow_mock_fallback: bool,

    /// Simulated delay of the mock backend (milliseconds)
    #[serde(default = "default_mock_delay_ms")]
    pub mock_delay_ms: u64,

    /// Whole-request timeout for provider calls (seconds); unbounded if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_allow_mock_fallback() -> bool {
    true
}

fn default_mock_delay_ms() -> u64 {
    DEFAULT_MOCK_DELAY_MS
}

impl Default for AnalyzerConfig {
    /// No provider, mock fallback enabled
    fn default() -> Self {
        Self {
            provider: None,
            allow_mock_fallback: true,
            mock_delay_ms: DEFAULT_MOCK_DELAY_MS,
            request_timeout_secs: None,
        }
    }
}

impl AnalyzerConfig {
    /// Configuration with a provider and otherwise default settings
    pub fn with_provider(provider: ProviderConfig) -> Self {
        Self {
            provider: Some(provider),
            ..Self::default()
        }
    }

    /// True if a provider with a non-empty API key is configured
    pub fn has_credentials(&self) -> bool {
        self.provider
            .as_ref()
            .is_some_and(ProviderConfig::has_credentials)
    }

    /// Provider request timeout, if any
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Simulated delay of the mock backend
    pub fn mock_delay(&self) -> Duration {
        Duration::from_millis(self.mock_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if let Some(provider) = &self.provider {
            provider.validate()?;
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.has_credentials());
        assert!(config.allow_mock_fallback);
        assert_eq!(config.mock_delay(), Duration::from_millis(2000));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_empty_api_key_is_not_credentials() {
        let config = AnalyzerConfig::with_provider(ProviderConfig::gemini("   "));
        assert!(!config.has_credentials());

        let config = AnalyzerConfig::with_provider(ProviderConfig::gemini("abc"));
        assert!(config.has_credentials());
    }

    #[test]
    fn test_family_defaults() {
        let gemini = ProviderConfig::gemini("k");
        assert_eq!(gemini.effective_model(), "gemini-2.0-flash");
        assert_eq!(
            gemini.effective_base_url(),
            "https://generativelanguage.googleapis.com/v1beta"
        );

        let mut openai = ProviderConfig::openai("k");
        assert_eq!(openai.effective_model(), "gpt-4o-mini");
        openai.model = Some("gpt-4o".to_string());
        assert_eq!(openai.effective_model(), "gpt-4o");
    }

    #[test]
    fn test_build_provider_matches_family() {
        assert_eq!(ProviderConfig::gemini("k").build_provider().name(), "gemini");
        assert_eq!(ProviderConfig::openai("k").build_provider().name(), "openai");
    }

    #[test]
    fn test_invalid_timeout() {
        let config = AnalyzerConfig {
            request_timeout_secs: Some(0),
            ..AnalyzerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_provider_values() {
        let mut provider = ProviderConfig::gemini("k");
        provider.temperature = Some(3.5);
        assert!(AnalyzerConfig::with_provider(provider).validate().is_err());

        let mut provider = ProviderConfig::openai("k");
        provider.max_output_tokens = Some(0);
        assert!(AnalyzerConfig::with_provider(provider).validate().is_err());

        let mut provider = ProviderConfig::openai("k");
        provider.base_url = Some("localhost:8080".to_string());
        assert!(AnalyzerConfig::with_provider(provider).validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            allow_mock_fallback = false
            request_timeout_secs = 30

            [provider]
            family = "openai"
            api_key = "sk-test"
            base_url = "http://localhost:8080/v1"
            temperature = 0.5
        "#;

        let config = AnalyzerConfig::from_toml(toml).unwrap();
        assert!(!config.allow_mock_fallback);
        assert_eq!(config.mock_delay_ms, DEFAULT_MOCK_DELAY_MS);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));

        let provider = config.provider.unwrap();
        assert_eq!(provider.family, ProviderFamily::OpenAi);
        assert_eq!(provider.effective_base_url(), "http://localhost:8080/v1");
        assert_eq!(provider.effective_model(), "gpt-4o-mini");
        assert_eq!(provider.temperature, Some(0.5));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AnalyzerConfig::from_toml("").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
    }

    #[test]
    fn test_toml_rejects_invalid_values() {
        let toml = r#"
            [provider]
            family = "gemini"
            max_output_tokens = 0
        "#;
        assert!(matches!(
            AnalyzerConfig::from_toml(toml),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AnalyzerConfig::from_toml("provider = 12"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut provider = ProviderConfig::gemini("key");
        provider.max_output_tokens = Some(4096);
        let config = AnalyzerConfig {
            request_timeout_secs: Some(45),
            ..AnalyzerConfig::with_provider(provider)
        };

        let toml_str = config.to_toml().unwrap();
        let parsed = AnalyzerConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let debug = format!("{:?}", ProviderConfig::gemini("super-secret"));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
