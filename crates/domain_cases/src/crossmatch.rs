//! Cross-system identity matching
//!
//! Looks for records in other systems (wage records, other-state claims,
//! vital statistics, new-hire and incarceration registries) that overlap a
//! claimant's identity attributes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimantId, DomainPort, HealthCheckable, PortError};
use domain_claims::{Address, ClaimantProfile};

/// System a match was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    StateWageRecords,
    OtherStateClaims,
    DeathRegistry,
    NewHireRegistry,
    IncarcerationRecords,
}

impl SourceType {
    /// What a match in this source implies for the claim
    pub fn risk_implication(&self) -> &'static str {
        match self {
            SourceType::StateWageRecords => "Claimant may have unreported earnings",
            SourceType::OtherStateClaims => "Claimant may be collecting benefits in another state",
            SourceType::DeathRegistry => "Identity may belong to a deceased person",
            SourceType::NewHireRegistry => "Claimant may have returned to work",
            SourceType::IncarcerationRecords => "Claimant may be ineligible while incarcerated",
        }
    }
}

/// How the record was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    SsnExact,
    NameFuzzy,
    AddressExact,
}

impl MatchType {
    pub const ALL: [MatchType; 3] = [MatchType::SsnExact, MatchType::NameFuzzy, MatchType::AddressExact];
}

/// Claimant attributes sent to the matching service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossMatchQuery {
    pub claimant_id: ClaimantId,
    pub ssn_ref: String,
    pub full_name: String,
    pub address: Address,
}

impl From<&ClaimantProfile> for CrossMatchQuery {
    fn from(claimant: &ClaimantProfile) -> Self {
        Self {
            claimant_id: claimant.claimant_id.clone(),
            ssn_ref: claimant.ssn_ref.clone(),
            full_name: claimant.full_name(),
            address: claimant.residential_address.clone(),
        }
    }
}

/// A record in another system overlapping the claimant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossMatchResult {
    pub record_id: String,
    pub source_type: SourceType,
    pub match_type: MatchType,
    /// 0..=1
    pub confidence: f64,
    pub risk_implication: String,
}

/// Port for the identity cross-match service
#[async_trait]
pub trait CrossMatchPort: DomainPort + HealthCheckable {
    /// Finds records matching the query by any of the requested match types
    async fn find_matches(
        &self,
        query: &CrossMatchQuery,
        match_types: &[MatchType],
    ) -> Result<Vec<CrossMatchResult>, PortError>;
}

/// Mock implementation of CrossMatchPort for testing and offline runs
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use core_kernel::HealthCheckResult;
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    const SSN_CONFIDENCE: f64 = 0.99;
    const ADDRESS_CONFIDENCE: f64 = 0.8;
    const NAME_SIMILARITY_THRESHOLD: f64 = 0.75;

    /// A record held by an external system
    #[derive(Debug, Clone)]
    pub struct ExternalRecord {
        pub record_id: String,
        pub source_type: SourceType,
        pub ssn_ref: String,
        pub full_name: String,
        pub address: Address,
    }

    /// In-memory cross-match service
    #[derive(Debug, Default)]
    pub struct MockCrossMatch {
        records: Arc<RwLock<Vec<ExternalRecord>>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockCrossMatch {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn add_record(&self, record: ExternalRecord) {
            self.records.write().await.push(record);
        }

        /// Makes every lookup fail with `ServiceUnavailable`
        pub async fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.write().await = unavailable;
        }
    }

    /// Token-set similarity of two names
    fn name_similarity(a: &str, b: &str) -> f64 {
        let tokens = |s: &str| -> BTreeSet<String> {
            s.split(|c: char| !c.is_alphanumeric())
                .filter(|t| !t.is_empty())
                .map(str::to_lowercase)
                .collect()
        };
        let (a, b) = (tokens(a), tokens(b));
        let union = a.union(&b).count();
        if union == 0 {
            return 0.0;
        }
        a.intersection(&b).count() as f64 / union as f64
    }

    impl DomainPort for MockCrossMatch {}

    #[async_trait]
    impl HealthCheckable for MockCrossMatch {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-cross-match", "Mock adapter always healthy")
        }
    }

    #[async_trait]
    impl CrossMatchPort for MockCrossMatch {
        async fn find_matches(
            &self,
            query: &CrossMatchQuery,
            match_types: &[MatchType],
        ) -> Result<Vec<CrossMatchResult>, PortError> {
            if *self.unavailable.read().await {
                return Err(PortError::unavailable("cross-match"));
            }

            let query_address = query.address.normalized_key();
            let mut matches = Vec::new();
            for record in self.records.read().await.iter() {
                for match_type in match_types {
                    let confidence = match match_type {
                        MatchType::SsnExact => {
                            (!query.ssn_ref.is_empty() && record.ssn_ref == query.ssn_ref).then_some(SSN_CONFIDENCE)
                        }
                        MatchType::NameFuzzy => {
                            let similarity = name_similarity(&query.full_name, &record.full_name);
                            (similarity >= NAME_SIMILARITY_THRESHOLD).then_some(similarity)
                        }
                        MatchType::AddressExact => (query_address.is_some()
                            && record.address.normalized_key() == query_address)
                            .then_some(ADDRESS_CONFIDENCE),
                    };
                    if let Some(confidence) = confidence {
                        matches.push(CrossMatchResult {
                            record_id: record.record_id.clone(),
                            source_type: record.source_type,
                            match_type: *match_type,
                            confidence,
                            risk_implication: record.source_type.risk_implication().to_string(),
                        });
                    }
                }
            }
            Ok(matches)
        }
    }

}
