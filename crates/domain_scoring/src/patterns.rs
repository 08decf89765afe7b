//! Scoring pattern table
//!
//! Each pattern is a conjunction of conditions over the claim's facts with a
//! weight that maintenance tunes from case outcomes.

use serde::{Deserialize, Serialize};
use serde_json::json;

use core_kernel::expression::evaluate_all;
use core_kernel::{Condition, ConditionOperator, FactMap, PatternId, Severity};

pub const NEW_ACCOUNT_HIGH_BENEFIT: &str = "RTS-NEW-ACCOUNT-HIGH-BENEFIT";
pub const DISPOSABLE_CONTACT: &str = "RTS-DISPOSABLE-CONTACT";
pub const FLAGGED_VELOCITY: &str = "RTS-FLAGGED-VELOCITY";
pub const IDENTITY_REUSE: &str = "RTS-IDENTITY-REUSE";

/// A weighted condition pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringPattern {
    pub id: PatternId,
    pub name: String,
    pub conditions: Vec<Condition>,
    /// Points added on a match
    pub weight: f64,
    pub severity: Severity,
    /// Marked as an emerging threat
    pub emerging: bool,
    /// Matches folded in by maintenance
    pub frequency: u64,
    /// Matches since the last maintenance pass
    #[serde(default)]
    pub pending_hits: u64,
    #[serde(default)]
    pub pending_confirmed: u32,
    #[serde(default)]
    pub pending_outcomes: u32,
}

impl ScoringPattern {
    /// Creates a pattern weighted by its severity
    pub fn new(id: impl Into<PatternId>, name: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            conditions: Vec::new(),
            weight: severity.impact_weight(),
            severity,
            emerging: false,
            frequency: 0,
            pending_hits: 0,
            pending_confirmed: 0,
            pending_outcomes: 0,
        }
    }

    pub fn when(mut self, field: &str, operator: ConditionOperator, value: serde_json::Value) -> Self {
        self.conditions.push(Condition::new(field, operator, value));
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Starts the pattern as an emerging threat with prior frequency
    pub fn as_emerging(mut self, frequency: u64) -> Self {
        self.emerging = true;
        self.frequency = frequency;
        self
    }

    pub fn matches(&self, facts: &FactMap) -> bool {
        evaluate_all(&self.conditions, facts)
    }

    /// Share of pending outcomes confirmed as fraud
    pub fn pending_effectiveness(&self) -> Option<f64> {
        (self.pending_outcomes > 0).then(|| self.pending_confirmed as f64 / self.pending_outcomes as f64)
    }
}

/// The patterns every scorer starts with
pub fn default_patterns() -> Vec<ScoringPattern> {
    vec![
        ScoringPattern::new(NEW_ACCOUNT_HIGH_BENEFIT, "New Account With High Benefit", Severity::Warning)
            .when("account_age_days", ConditionOperator::LessThan, json!(30))
            .when("weekly_benefit_amount", ConditionOperator::GreaterThan, json!(600)),
        ScoringPattern::new(DISPOSABLE_CONTACT, "Disposable Contact Details", Severity::Warning).when(
            "email",
            ConditionOperator::Regex,
            json!("(?i)(tempmail|mailinator|guerrillamail|10minutemail)"),
        ),
        ScoringPattern::new(FLAGGED_VELOCITY, "Flagged Claimant Filing Velocity", Severity::Error)
            .when("claims_last_30_days", ConditionOperator::GreaterThanOrEqual, json!(2))
            .when("claimant_risk_score", ConditionOperator::GreaterThan, json!(50))
            .as_emerging(25),
        ScoringPattern::new(IDENTITY_REUSE, "Failed Verification With SSN Reuse", Severity::Critical)
            .when("identity_verification_status", ConditionOperator::Equals, json!("FAILED"))
            .when("ssn_usage_count", ConditionOperator::GreaterThan, json!(1)),
    ]
}
