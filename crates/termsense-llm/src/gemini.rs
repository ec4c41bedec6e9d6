//! Gemini Provider Implementation
//!
//! Envelope for Google's `generateContent` REST API.
//!
//! # Wire format
//!
//! - `POST {base_url}/models/{model}:generateContent`
//! - API key in the `X-goog-api-key` header
//! - Body: `{"contents":[{"parts":[{"text": "<prompt>"}]}]}`, plus an optional
//!   `generationConfig` with `temperature` / `maxOutputTokens`
//! - Completion text at `candidates[0].content.parts[0].text`
//!
//! # Examples
//!
//! ```no_run
//! use termsense_llm::{CompletionClient, GeminiProvider};
//!
//! let provider = GeminiProvider::new("my-api-key", "gemini-2.0-flash");
//! let client = CompletionClient::new(provider, None).unwrap();
//! ```

use crate::provider::{text_at, CompletionProvider, SamplingOptions};
use crate::LlmError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Default Gemini API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Authentication header expected by the Gemini API
pub const API_KEY_HEADER: &str = "X-goog-api-key";

/// Gemini `generateContent` envelope
#[derive(Clone)]
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key: String,
    sampling: SamplingOptions,
}

/// Request body for the generateContent API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl GeminiProvider {
    /// Create a new Gemini provider against the public endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            sampling: SamplingOptions::default(),
        }
    }

    /// Point the provider at a different base URL (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set sampling parameters
    pub fn with_sampling(mut self, sampling: SamplingOptions) -> Self {
        self.sampling = sampling;
        self
    }

    /// Full URL of the generateContent call
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateContentRequest<'a> {
        let generation_config = (!self.sampling.is_empty()).then(|| GenerationConfig {
            temperature: self.sampling.temperature,
            max_output_tokens: self.sampling.max_output_tokens,
        });

        GenerateContentRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config,
        }
    }
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("sampling", &self.sampling)
            .finish()
    }
}

impl CompletionProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn build_request(&self, client: &reqwest::Client, prompt: &str) -> reqwest::RequestBuilder {
        client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&self.request_body(prompt))
    }

    fn extract_completion_text(&self, body: &Value) -> Result<String, LlmError> {
        // A blocked prompt comes back as 200 with no candidates
        if let Some(reason) = body.pointer("/promptFeedback/blockReason").and_then(Value::as_str) {
            if body.pointer("/candidates/0").is_none() {
                return Err(LlmError::InvalidResponse(format!(
                    "prompt was blocked by the provider ({})",
                    reason
                )));
            }
        }

        text_at(
            body,
            "/candidates/0/content/parts/0/text",
            "candidates[0].content.parts[0].text",
        )
    }
}
