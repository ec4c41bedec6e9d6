//! Analysis orchestration

use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, ConfigError};
use crate::mock::MockAnalyzer;
use crate::normalizer::normalize_response;
use crate::prompt::PromptBuilder;
use std::sync::Arc;
use std::time::Instant;
use termsense_domain::traits::LlmProvider;
use termsense_domain::CategorizedResult;
use termsense_llm::CompletionClient;
use tracing::{debug, info, warn};

/// Which backend answers analysis requests
///
/// Chosen once at construction and never changed afterwards.
#[derive(Debug)]
enum Backend<L> {
    Live(Arc<L>),
    Mock(MockAnalyzer),
    Unconfigured,
}

/// Turns document text into a categorized result
///
/// Holds no per-request state and is safe to share across concurrent
/// requests.
#[derive(Debug)]
pub struct AnalysisService<L = CompletionClient> {
    backend: Backend<L>,
}

impl<L> AnalysisService<L>
where
    L: LlmProvider + Send + Sync + 'static,
    AnalysisError: From<L::Error>,
{
    /// Analyze with a live provider
    pub fn new(provider: L) -> Self {
        Self {
            backend: Backend::Live(Arc::new(provider)),
        }
    }

    /// Name of the active backend: the provider name, `mock` or `unconfigured`
    pub fn backend_name(&self) -> &str {
        match &self.backend {
            Backend::Live(provider) => provider.name(),
            Backend::Mock(_) => "mock",
            Backend::Unconfigured => "unconfigured",
        }
    }

    /// True if requests are answered with canned content
    pub fn is_mock(&self) -> bool {
        matches!(self.backend, Backend::Mock(_))
    }

    /// Analyze `text`
    ///
    /// Input is validated before anything else: empty or whitespace-only text
    /// never reaches a backend.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::InvalidInput`] for blank text
    /// - [`AnalysisError::MissingCredentials`] when no backend is available
    /// - any upstream or parse error from the live backend
    pub async fn analyze(&self, text: &str) -> Result<CategorizedResult, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::InvalidInput);
        }

        match &self.backend {
            Backend::Unconfigured => Err(AnalysisError::MissingCredentials),
            Backend::Mock(mock) => {
                info!("Analyzing {} bytes with mock backend", text.len());
                Ok(mock.analyze(text).await)
            }
            Backend::Live(provider) => self.analyze_live(provider, text).await,
        }
    }

    async fn analyze_live(&self, provider: &L, text: &str) -> Result<CategorizedResult, AnalysisError> {
        let start = Instant::now();
        info!("Analyzing {} bytes with {}", text.len(), provider.name());

        let prompt = PromptBuilder::new(text).build();
        debug!("Prompt length: {} bytes", prompt.len());

        let completion = match provider.generate(&prompt).await {
            Ok(completion) => completion,
            Err(e) => {
                let err = AnalysisError::from(e);
                warn!(code = err.code(), "Provider call failed: {:?}", err);
                return Err(err);
            }
        };
        debug!("Completion length: {} bytes", completion.len());

        let result = normalize_response(&completion).inspect_err(|e| {
            warn!(code = e.code(), "Completion could not be normalized");
        })?;

        info!(
            "Analysis complete: {} items in {} ms",
            result.total_items(),
            start.elapsed().as_millis()
        );

        Ok(result)
    }
}

impl AnalysisService {
    /// Analyze with canned content
    pub fn mock(mock: MockAnalyzer) -> Self {
        Self {
            backend: Backend::Mock(mock),
        }
    }

    /// A service that rejects every valid request with `MissingCredentials`
    pub fn unconfigured() -> Self {
        Self {
            backend: Backend::Unconfigured,
        }
    }

    /// Build the service described by `config`
    ///
    /// 1. A provider with a non-empty API key selects the live backend.
    /// 2. Otherwise the mock backend is used if fallback is allowed.
    /// 3. Otherwise the service is unconfigured and reports
    ///    `MissingCredentials` per request.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        match config.provider.as_ref().filter(|p| p.has_credentials()) {
            Some(provider) => {
                let client =
                    CompletionClient::from_boxed(provider.build_provider(), config.request_timeout())?;
                info!(
                    "Using {} provider with model {}",
                    provider.family,
                    provider.effective_model()
                );
                Ok(Self::new(client))
            }
            None if config.allow_mock_fallback => {
                warn!("No API key configured, using mock analysis");
                Ok(Self::mock(MockAnalyzer::new(config.mock_delay())))
            }
            None => {
                warn!("No API key configured and mock fallback disabled; analysis requests will fail");
                Ok(Self::unconfigured())
            }
        }
    }
}
