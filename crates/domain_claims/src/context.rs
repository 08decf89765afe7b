//! Assessment context
//!
//! Everything an assessment needs beyond the three core records: free-form
//! context data, facts derived from external lookups, the current session's
//! behavioral metrics, and reference cases from recent investigations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::FactMap;

/// Facts supplied by external lookup collaborators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedFacts {
    /// Number of active claims using the claimant's SSN
    pub ssn_usage_count: u32,
    /// Reported wage divided by the industry average wage
    pub wage_to_industry_ratio: Option<f64>,
    /// Claims filed by the claimant in the trailing 30 days
    pub claims_last_30_days: u32,
    /// Claimant matched an entry in the death registry
    pub death_registry_match: bool,
}

/// Behavioral metrics captured for the filing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Characters per minute
    pub typing_speed: f64,
    pub session_duration_secs: f64,
    pub device_fingerprint: String,
    /// 0..=1, how consistent the session location is with history
    pub location_consistency: f64,
}

/// Counts of other claimants sharing an attribute with this one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossReferenceCounts {
    pub shared_address_count: u32,
    pub shared_phone_count: u32,
}

/// A resolved case used as a reference point for learning adjustments
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCase {
    pub weekly_amount: f64,
    pub risk_score: f64,
}

/// Context accompanying a claim through assessment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessmentContext {
    /// Free-form context facts (e.g. `wage_reported`, `claim_amount`)
    #[serde(default)]
    pub data: FactMap,
    #[serde(default)]
    pub derived: DerivedFacts,
    pub session: Option<SessionMetrics>,
    #[serde(default)]
    pub cross_reference: CrossReferenceCounts,
    /// Recently confirmed fraud cases
    #[serde(default)]
    pub confirmed_fraud_cases: Vec<ReferenceCase>,
    /// Recently confirmed false positives
    #[serde(default)]
    pub false_positive_cases: Vec<ReferenceCase>,
    /// Free-text justification supplied with the claim
    pub justification: Option<String>,
    /// Clock used for age and recency facts; `Utc::now()` when unset
    pub as_of: Option<DateTime<Utc>>,
}

impl AssessmentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference time for the assessment
    pub fn now(&self) -> DateTime<Utc> {
        self.as_of.unwrap_or_else(Utc::now)
    }

    /// Adds a free-form context fact
    pub fn with_fact(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub fn with_derived(mut self, derived: DerivedFacts) -> Self {
        self.derived = derived;
        self
    }

    pub fn with_session(mut self, session: SessionMetrics) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_justification(mut self, text: impl Into<String>) -> Self {
        self.justification = Some(text.into());
        self
    }

    /// Numeric value of a context fact, if present and numeric
    pub fn number(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(core_kernel::expression::to_number)
    }
}
