//! HTTP completion client
//!
//! Sends one prompt to the configured provider and classifies the outcome.
//! One attempt per call; retrying is left to whoever triggered the analysis.

use crate::provider::CompletionProvider;
use crate::LlmError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use termsense_domain::traits::LlmProvider as LlmProviderTrait;
use tracing::{debug, warn};

/// Message used when a failed response carries no provider error text
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Completion client bound to one provider family
#[derive(Debug)]
pub struct CompletionClient {
    client: reqwest::Client,
    provider: Box<dyn CompletionProvider>,
}

impl CompletionClient {
    /// Create a client for `provider`
    ///
    /// `timeout` bounds the whole request; `None` leaves it unbounded and the
    /// caller is expected to cancel by dropping the future.
    pub fn new(
        provider: impl CompletionProvider + 'static,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        Self::from_boxed(Box::new(provider), timeout)
    }

    /// Create a client from an already boxed provider
    pub fn from_boxed(
        provider: Box<dyn CompletionProvider>,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, provider })
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Send `prompt` and return the top-level JSON body of a 2xx response
    ///
    /// # Errors
    ///
    /// - [`LlmError::Authentication`] on 401
    /// - [`LlmError::RateLimitExceeded`] on 429
    /// - [`LlmError::BadRequest`] on 400
    /// - [`LlmError::Upstream`] on any other non-success status
    /// - [`LlmError::Communication`] if the request never completes
    /// - [`LlmError::InvalidResponse`] if a 2xx body is not JSON
    pub async fn send(&self, prompt: &str) -> Result<Value, LlmError> {
        debug!(
            "Sending {} byte prompt to {}",
            prompt.len(),
            self.provider.name()
        );

        let response = self
            .provider
            .build_request(&self.client, prompt)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);
            let message = self.provider.error_message(&body);
            warn!(
                "{} responded with HTTP {}: {}",
                self.provider.name(),
                status,
                message.as_deref().unwrap_or(UNKNOWN_ERROR_MESSAGE)
            );
            return Err(classify_status(status, message));
        }

        serde_json::from_str(&text)
            .map_err(|e| LlmError::InvalidResponse(format!("Response body is not JSON: {}", e)))
    }

    /// Send `prompt` and return the completion text
    pub async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = self.send(prompt).await?;
        let text = self.provider.extract_completion_text(&body)?;
        debug!("Completion length: {} bytes", text.len());
        Ok(text)
    }
}

/// Map a non-success HTTP status to an error kind
pub fn classify_status(status: StatusCode, message: Option<String>) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED => LlmError::Authentication,
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
        StatusCode::BAD_REQUEST => {
            LlmError::BadRequest(message.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()))
        }
        _ => LlmError::Upstream {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
        },
    }
}

#[async_trait]
impl LlmProviderTrait for CompletionClient {
    type Error = LlmError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.complete(prompt).await
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}
