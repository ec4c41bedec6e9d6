//! OpenAI-compatible Provider Implementation
//!
//! Envelope for `chat/completions` endpoints (OpenAI and compatible gateways).
//!
//! # Wire format
//!
//! - `POST {base_url}/chat/completions`
//! - `Authorization: Bearer <key>`
//! - Body: `{"model": "...", "messages": [{"role": "user", "content": "<prompt>"}]}`,
//!   plus optional `temperature` / `max_tokens`
//! - Completion text at `choices[0].message.content`

use crate::provider::{text_at, CompletionProvider, SamplingOptions};
use crate::LlmError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI `chat/completions` envelope
#[derive(Clone)]
pub struct OpenAiProvider {
    base_url: String,
    model: String,
    api_key: String,
    sampling: SamplingOptions,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl OpenAiProvider {
    /// Create a new provider against the public OpenAI endpoint
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            sampling: SamplingOptions::default(),
        }
    }

    /// Point the provider at a different base URL (compatible gateways, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set sampling parameters
    pub fn with_sampling(mut self, sampling: SamplingOptions) -> Self {
        self.sampling = sampling;
        self
    }

    /// Full URL of the chat completions call
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.sampling.temperature,
            max_tokens: self.sampling.max_output_tokens,
        }
    }
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("sampling", &self.sampling)
            .finish()
    }
}

impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn build_request(&self, client: &reqwest::Client, prompt: &str) -> reqwest::RequestBuilder {
        client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
    }

    fn extract_completion_text(&self, body: &Value) -> Result<String, LlmError> {
        text_at(body, "/choices/0/message/content", "choices[0].message.content")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_openai_endpoint() {
        let provider = OpenAiProvider::new("key", DEFAULT_MODEL);
        assert_eq!(provider.endpoint(), "https://api.openai.com/v1/chat/completions");

        let provider = provider.with_base_url("http://localhost:8080/v1/");
        assert_eq!(provider.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_request_body() {
        let provider = OpenAiProvider::new("key", "gpt-4o").with_sampling(SamplingOptions {
            temperature: Some(0.0),
            max_output_tokens: Some(512),
        });
        let body = serde_json::to_value(provider.request_body("hi")).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.0,
                "max_tokens": 512
            })
        );
    }

    #[test]
    fn test_request_body_omits_unset_sampling() {
        let provider = OpenAiProvider::new("key", "gpt-4o");
        let body = serde_json::to_value(provider.request_body("hi")).unwrap();
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_extract_completion_text() {
        let provider = OpenAiProvider::new("key", DEFAULT_MODEL);
        let body = json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "done"}}]
        });
        assert_eq!(provider.extract_completion_text(&body).unwrap(), "done");
    }

    #[test]
    fn test_extract_ignores_gemini_shape() {
        let provider = OpenAiProvider::new("key", DEFAULT_MODEL);
        let body = json!({"candidates": [{"content": {"parts": [{"text": "x"}]}}]});
        assert!(matches!(
            provider.extract_completion_text(&body),
            Err(LlmError::InvalidResponse(_))
        ));
    }
}
