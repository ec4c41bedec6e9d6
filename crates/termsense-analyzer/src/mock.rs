//! Offline analysis with canned content

use crate::config::DEFAULT_MOCK_DELAY_MS;
use std::time::Duration;
use termsense_domain::CategorizedResult;
use tracing::debug;

/// Returns a fixed, valid result after a simulated delay
///
/// Used when no API key is configured so the clients can be developed and
/// demonstrated without network access. The input text is ignored.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    delay: Duration,
}

impl MockAnalyzer {
    /// Create a mock analyzer that waits `delay` before answering
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// The simulated latency
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Produce the canned result
    pub async fn analyze(&self, _text: &str) -> CategorizedResult {
        debug!(delay_ms = self.delay.as_millis() as u64, "Mock analysis");
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        canned_result()
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_MOCK_DELAY_MS))
    }
}

fn items(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// The fixed result every mock analysis returns
pub fn canned_result() -> CategorizedResult {
    CategorizedResult {
        things_to_know: items(&[
            "This is a terms and conditions document",
            "You are agreeing to the company's policies",
            "Your data may be collected and processed",
            "The service is provided 'as is'",
        ]),
        important_points: items(&[
            "You must be 18 or older to use this service",
            "You are responsible for maintaining account security",
            "The company reserves the right to modify terms",
            "You can terminate your account at any time",
        ]),
        risks: items(&[
            "Your personal information may be shared with third parties",
            "The service may be unavailable at times",
            "You may lose access to your account if terms are violated",
            "Data breaches are possible despite security measures",
        ]),
        user_obligations: items(&[
            "You must provide accurate information",
            "You must not share your account credentials",
            "You must comply with all applicable laws",
            "You must not use the service for illegal purposes",
        ]),
        user_rights: items(&[
            "You have the right to access your personal data",
            "You can request deletion of your account",
            "You have the right to file complaints",
            "You can opt out of marketing communications",
        ]),
        optional_notes: items(&[
            "This analysis is for informational purposes only",
            "Always read the full terms before agreeing",
            "Consider consulting with a legal professional",
            "Keep a copy of the terms for your records",
        ]),
    }
}
