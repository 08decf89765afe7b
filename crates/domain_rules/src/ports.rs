//! Derived-fact lookup port
//!
//! The rule engine is pure given its facts. The facts that depend on other
//! systems (SSN usage across active claims, recent claim velocity, industry
//! wage averages, the death registry) come through [`FactLookupPort`].
//!
//! ```rust,ignore
//! let lookup: Arc<dyn FactLookupPort> = Arc::new(MockFactLookup::new());
//! let facts = lookup.lookup_facts(&claimant, industry_code).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimantId, DomainPort, HealthCheckable, PortError};

/// Raw facts returned by the lookup collaborators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookupFacts {
    pub ssn_usage_count: u32,
    pub claims_last_30_days: u32,
    pub industry_average_wage: Option<f64>,
    pub death_registry_match: bool,
}

/// Port for derived-fact lookups
#[async_trait]
pub trait FactLookupPort: DomainPort + HealthCheckable {
    /// Number of active claims using this SSN reference
    async fn ssn_usage_count(&self, ssn_ref: &str) -> Result<u32, PortError>;

    /// Claims filed by the claimant in the trailing 30 days
    async fn claims_last_30_days(&self, claimant_id: &ClaimantId) -> Result<u32, PortError>;

    /// Average weekly wage for an industry code
    async fn industry_average_wage(&self, industry_code: &str) -> Result<Option<f64>, PortError>;

    /// True if the SSN reference matches the death registry
    async fn death_registry_match(&self, ssn_ref: &str) -> Result<bool, PortError>;
}

/// Mock implementation of FactLookupPort for testing and offline runs
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use core_kernel::HealthCheckResult;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory fact lookup
    #[derive(Debug, Default)]
    pub struct MockFactLookup {
        ssn_usage: Arc<RwLock<HashMap<String, u32>>>,
        velocity: Arc<RwLock<HashMap<ClaimantId, u32>>>,
        industry_wages: Arc<RwLock<HashMap<String, f64>>>,
        deceased: Arc<RwLock<HashSet<String>>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl MockFactLookup {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn set_ssn_usage(&self, ssn_ref: impl Into<String>, count: u32) {
            self.ssn_usage.write().await.insert(ssn_ref.into(), count);
        }

        pub async fn set_claim_velocity(&self, claimant_id: ClaimantId, count: u32) {
            self.velocity.write().await.insert(claimant_id, count);
        }

        pub async fn set_industry_wage(&self, industry_code: impl Into<String>, wage: f64) {
            self.industry_wages.write().await.insert(industry_code.into(), wage);
        }

        pub async fn mark_deceased(&self, ssn_ref: impl Into<String>) {
            self.deceased.write().await.insert(ssn_ref.into());
        }

        /// Makes every lookup fail with `ServiceUnavailable`
        pub async fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.write().await = unavailable;
        }

        async fn check_available(&self) -> Result<(), PortError> {
            if *self.unavailable.read().await {
                return Err(PortError::unavailable("fact-lookup"));
            }
            Ok(())
        }
    }

    impl DomainPort for MockFactLookup {}

    #[async_trait]
    impl HealthCheckable for MockFactLookup {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-fact-lookup", "Mock adapter always healthy")
        }
    }

    #[async_trait]
    impl FactLookupPort for MockFactLookup {
        async fn ssn_usage_count(&self, ssn_ref: &str) -> Result<u32, PortError> {
            self.check_available().await?;
            Ok(self.ssn_usage.read().await.get(ssn_ref).copied().unwrap_or(1))
        }

        async fn claims_last_30_days(&self, claimant_id: &ClaimantId) -> Result<u32, PortError> {
            self.check_available().await?;
            Ok(self.velocity.read().await.get(claimant_id).copied().unwrap_or(0))
        }

        async fn industry_average_wage(&self, industry_code: &str) -> Result<Option<f64>, PortError> {
            self.check_available().await?;
            Ok(self.industry_wages.read().await.get(industry_code).copied())
        }

        async fn death_registry_match(&self, ssn_ref: &str) -> Result<bool, PortError> {
            self.check_available().await?;
            Ok(self.deceased.read().await.contains(ssn_ref))
        }
    }

}
