//! Termsense LLM Provider Layer
//!
//! Completion backends behind the `LlmProvider` trait from `termsense-domain`.
//!
//! # Architecture
//!
//! A [`CompletionClient`] owns the HTTP client and one [`CompletionProvider`],
//! which describes a provider family's request envelope, authentication and
//! response shape. The family is picked once, from configuration.
//!
//! # Providers
//!
//! - `GeminiProvider`: Google Gemini `generateContent`
//! - `OpenAiProvider`: OpenAI-compatible `chat/completions`
//! - `MockProvider`: Scripted responses for testing, no network
//!
//! # Examples
//!
//! ```
//! use termsense_llm::MockProvider;
//! use termsense_domain::traits::LlmProvider;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod gemini;
pub mod openai;
pub mod provider;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use termsense_domain::traits::LlmProvider as LlmProviderTrait;
use thiserror::Error;

pub use client::CompletionClient;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use provider::{CompletionProvider, ProviderFamily, SamplingOptions};

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Provider rejected the credentials (HTTP 401)
    #[error("Authentication failed")]
    Authentication,

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Provider rejected the request (HTTP 400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Any other non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Provider's error message, or a generic one
        message: String,
    },

    /// Network or API communication error (connect, timeout, body read)
    #[error("Communication error: {0}")]
    Communication(String),

    /// Success status but the body is not the expected envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
///
/// # Examples
///
/// ```
/// use termsense_llm::{LlmError, MockProvider};
/// use termsense_domain::traits::LlmProvider;
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// // Multiple responses
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
/// provider.add_error("prompt2", LlmError::RateLimitExceeded);
/// assert_eq!(provider.generate("prompt1").await.unwrap(), "response1");
/// assert!(provider.generate("prompt2").await.is_err());
/// assert_eq!(provider.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: Result<String, LlmError>,
    responses: Arc<Mutex<HashMap<String, Result<String, LlmError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicUsize>,
    latency: Option<Duration>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_default(Ok(response.into()))
    }

    /// Create a MockProvider that fails every call with `error`
    pub fn failing(error: LlmError) -> Self {
        Self::with_default(Err(error))
    }

    fn with_default(default_response: Result<String, LlmError>) -> Self {
        Self {
            default_response,
            responses: Arc::new(Mutex::new(HashMap::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            latency: None,
        }
    }

    /// Wait this long before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt.into(), Ok(response.into()));
    }

    /// Configure to return an error for a specific prompt
    pub fn add_error(&mut self, prompt: impl Into<String>, error: LlmError) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(prompt.into(), Err(error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Reset the call count and the recorded prompts
    pub fn reset_call_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// The most recent prompt received, if any
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.to_string());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        // Check if we have a specific response for this prompt
        let scripted = self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(prompt)
            .cloned();

        scripted.unwrap_or_else(|| self.default_response.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
