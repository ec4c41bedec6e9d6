//! Error types for the Analyzer

use termsense_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during a single analysis
///
/// Every variant is scoped to one `analyze` call; none is retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Empty or whitespace-only text
    #[error("Text is required")]
    InvalidInput,

    /// No API key configured and mock analysis disabled
    #[error("No API key configured and mock analysis is disabled")]
    MissingCredentials,

    /// Provider rejected the credentials (HTTP 401)
    #[error("Authentication failed. Please check your API key.")]
    UpstreamAuth,

    /// Provider rate limit hit (HTTP 429)
    #[error("Rate limit exceeded. Please try again in a few minutes.")]
    UpstreamRateLimited,

    /// Provider rejected the request (HTTP 400); carries the provider's detail
    #[error("Invalid request to the AI provider. Please check your API configuration.")]
    UpstreamBadRequest(String),

    /// Any other upstream failure; `status` is `None` when no response arrived
    #[error("Analysis failed: {message}")]
    UpstreamUnknown {
        /// HTTP status, if the provider answered
        status: Option<u16>,
        /// Provider's error text when available
        message: String,
    },

    /// 2xx response without the expected completion text
    #[error("Invalid response format from the AI provider: {0}")]
    MalformedUpstreamResponse(String),

    /// Completion text is not a valid six-key object, even after extraction
    #[error("AI response could not be parsed ({reason}). Raw response: {excerpt}")]
    ResponseParse {
        /// Why the direct parse failed
        reason: String,
        /// Bounded excerpt of the offending completion text
        excerpt: String,
    },
}

impl AnalysisError {
    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidInput => "invalid_input",
            AnalysisError::MissingCredentials => "missing_credentials",
            AnalysisError::UpstreamAuth => "upstream_auth",
            AnalysisError::UpstreamRateLimited => "upstream_rate_limited",
            AnalysisError::UpstreamBadRequest(_) => "upstream_bad_request",
            AnalysisError::UpstreamUnknown { .. } => "upstream_unknown",
            AnalysisError::MalformedUpstreamResponse(_) => "malformed_upstream_response",
            AnalysisError::ResponseParse { .. } => "response_parse",
        }
    }

    /// Message safe to log at any level
    ///
    /// Same as `Display` except that parse errors omit the completion excerpt.
    pub fn log_summary(&self) -> String {
        match self {
            AnalysisError::ResponseParse { reason, .. } => {
                format!("AI response could not be parsed ({})", reason)
            }
            other => other.to_string(),
        }
    }
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Authentication => AnalysisError::UpstreamAuth,
            LlmError::RateLimitExceeded => AnalysisError::UpstreamRateLimited,
            LlmError::BadRequest(detail) => AnalysisError::UpstreamBadRequest(detail),
            LlmError::Upstream { status, message } => AnalysisError::UpstreamUnknown {
                status: Some(status),
                message,
            },
            LlmError::Communication(message) => AnalysisError::UpstreamUnknown {
                status: None,
                message,
            },
            LlmError::InvalidResponse(detail) => AnalysisError::MalformedUpstreamResponse(detail),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The HTTP client could not be built
    #[error("Failed to create completion client: {0}")]
    Client(#[from] LlmError),
}
