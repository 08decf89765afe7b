//! Scoring oracle port
//!
//! An external model that reads the claimant's free-text justification and
//! returns a fraud likelihood in `[0, 1]`. The analyzer treats it as
//! best-effort: an error or an absent oracle adds nothing to the score.

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError};

/// Port for text-based fraud likelihood scoring
#[async_trait]
pub trait ScoringOraclePort: DomainPort + HealthCheckable {
    /// Fraud likelihood of the given text, in `[0, 1]`
    async fn fraud_likelihood(&self, text: &str) -> Result<f64, PortError>;
}

/// Keyword heuristic used when no model endpoint is configured
pub mod mock {
    use super::*;
    use core_kernel::HealthCheckResult;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Phrases that show up in fabricated justifications
    const SUSPICIOUS_PHRASES: &[&str] = &[
        "cash only",
        "paid under the table",
        "lost all my documents",
        "no pay stubs",
        "urgent",
        "friend's address",
        "never received",
        "new identity",
        "wire the money",
        "gift card",
    ];
    const PHRASE_WEIGHT: f64 = 0.25;
    /// Justifications shorter than this read as boilerplate
    const MIN_WORDS: usize = 5;
    const TERSE_TEXT_SCORE: f64 = 0.1;

    /// In-process keyword scorer
    #[derive(Debug, Default)]
    pub struct MockScoringOracle {
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockScoringOracle {
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes every call fail with `ServiceUnavailable`
        pub async fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.write().await = unavailable;
        }
    }

    /// Heuristic likelihood of a justification text
    pub fn keyword_likelihood(text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let hits = SUSPICIOUS_PHRASES
            .iter()
            .filter(|phrase| lowered.contains(*phrase))
            .count();
        let terse = if lowered.split_whitespace().count() < MIN_WORDS {
            TERSE_TEXT_SCORE
        } else {
            0.0
        };
        (hits as f64 * PHRASE_WEIGHT + terse).min(1.0)
    }

    impl DomainPort for MockScoringOracle {}

    #[async_trait]
    impl HealthCheckable for MockScoringOracle {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-scoring-oracle", "Keyword heuristic always healthy")
        }
    }

    #[async_trait]
    impl ScoringOraclePort for MockScoringOracle {
        async fn fraud_likelihood(&self, text: &str) -> Result<f64, PortError> {
            if *self.unavailable.read().await {
                return Err(PortError::unavailable("scoring-oracle"));
            }
            Ok(keyword_likelihood(text))
        }
    }

}
