//! Termsense Analyzer
//!
//! Turns the text of a terms-and-conditions document into a six-category
//! summary using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Text → PromptBuilder → LlmProvider → ResponseNormalizer → CategorizedResult
//! ```
//!
//! The [`AnalysisService`] picks its backend once, from [`AnalyzerConfig`]:
//!
//! - **Live**: a provider with an API key, via `termsense-llm`
//! - **Mock**: canned content after a short delay, when no key is set
//! - **Unconfigured**: every request fails with `MissingCredentials`
//!
//! # Example Usage
//!
//! ```
//! use termsense_analyzer::AnalysisService;
//! use termsense_llm::MockProvider;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let llm = MockProvider::new(
//!     r#"{"ThingsToKnow":["Data is shared"],"ImportantPoints":[],"Risks":[],
//!        "UserObligations":[],"UserRights":[],"OptionalNotes":[]}"#,
//! );
//! let service = AnalysisService::new(llm);
//!
//! let result = service.analyze("We may share your data with partners.").await.unwrap();
//! assert_eq!(result.things_to_know, vec!["Data is shared"]);
//! # });
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod mock;
pub mod normalizer;
mod prompt;
mod service;


pub use config::{AnalyzerConfig, ProviderConfig, DEFAULT_MOCK_DELAY_MS};
pub use error::{AnalysisError, ConfigError};
pub use mock::{canned_result, MockAnalyzer};
pub use normalizer::normalize_response;
pub use prompt::PromptBuilder;
pub use service::AnalysisService;
