//! Provider envelopes
//!
//! Each provider family wraps the prompt in its own request body, expects its
//! own authentication header and nests the completion text at its own path.
//! [`CompletionProvider`] captures exactly those differences; everything else
//! (sending, status classification) lives in [`crate::CompletionClient`].

use crate::LlmError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Provider families supported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    /// Google Gemini `generateContent`
    #[default]
    Gemini,
    /// OpenAI-compatible `chat/completions`
    #[serde(alias = "open_ai", alias = "openai-compatible")]
    OpenAi,
}

impl ProviderFamily {
    /// Short name used in logs and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderFamily::Gemini => "gemini",
            ProviderFamily::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderFamily::Gemini),
            "openai" | "open_ai" | "openai-compatible" => Ok(ProviderFamily::OpenAi),
            other => Err(format!(
                "unknown provider '{}' (expected 'gemini' or 'openai')",
                other
            )),
        }
    }
}

/// Optional sampling parameters forwarded to the provider
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SamplingOptions {
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens
    pub max_output_tokens: Option<u32>,
}

impl SamplingOptions {
    /// True if no parameter is set
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.max_output_tokens.is_none()
    }
}

/// One provider family's request envelope and response shape
pub trait CompletionProvider: Send + Sync + fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Build the POST request carrying `prompt`, including authentication
    fn build_request(&self, client: &reqwest::Client, prompt: &str) -> reqwest::RequestBuilder;

    /// Pull the completion text out of a successful response body
    ///
    /// Fails with [`LlmError::InvalidResponse`] when the provider's path is absent.
    fn extract_completion_text(&self, body: &Value) -> Result<String, LlmError>;

    /// Provider's error message from a non-success response body, if any
    ///
    /// Both supported families report `{"error": {"message": "..."}}`.
    fn error_message(&self, body: &Value) -> Option<String> {
        body.pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Read a string at a JSON pointer, or describe the missing path
pub(crate) fn text_at(body: &Value, pointer: &str, path: &str) -> Result<String, LlmError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            LlmError::InvalidResponse(format!("response has no string at {}", path))
        })
}
