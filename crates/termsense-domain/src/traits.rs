//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use async_trait::async_trait;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (termsense-llm). One call is one
/// completion request; implementations must not retry on their own.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: Send;

    /// Generate the completion text for a prompt
    async fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Short name used in logs (e.g. "gemini")
    fn name(&self) -> &str;
}
