//! Risk factors and the risk assessment result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AssessmentId, ClaimId, ClaimantId, RiskLevel, RuleId, MAX_RISK_SCORE};

/// Confidence reported for an assessment with no risk factors
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// Factor id used when an assessment could not be completed
pub const SYSTEM_ERROR_FACTOR: &str = "SYSTEM_ERROR";

/// Source category of a risk factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    Identity,
    Employment,
    Wage,
    Employer,
    Behavioral,
    Pattern,
    Anomaly,
    Learning,
    CrossMatch,
    AiAnalysis,
    Rule,
    System,
}

/// A single contribution to an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub id: String,
    pub name: String,
    pub category: RiskCategory,
    pub impact: f64,
    /// 0..=1
    pub confidence: f64,
    pub description: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl RiskFactor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: RiskCategory,
        impact: f64,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            impact,
            confidence: confidence.clamp(0.0, 1.0),
            description: String::new(),
            evidence: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence.push(evidence.into());
        self
    }
}

/// Outcome of assessing one claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessmentResult {
    pub assessment_id: AssessmentId,
    pub claim_id: ClaimId,
    pub claimant_id: ClaimantId,
    pub assessment_date: DateTime<Utc>,
    /// Cumulative score, 0..=1000
    pub overall_risk_score: f64,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<RiskFactor>,
    pub recommended_actions: Vec<String>,
    pub requires_investigation: bool,
    pub auto_approval_eligible: bool,
    pub confidence_score: f64,
    /// Set when a blocking rule fired
    pub blocked: bool,
    #[serde(default)]
    pub triggered_rules: Vec<RuleId>,
    pub processing_time_ms: Option<u64>,
}

impl RiskAssessmentResult {
    /// An empty LOW assessment for the given claim
    pub fn new(claim_id: ClaimId, claimant_id: ClaimantId) -> Self {
        Self {
            assessment_id: AssessmentId::new_v7(),
            claim_id,
            claimant_id,
            assessment_date: Utc::now(),
            overall_risk_score: 0.0,
            risk_level: RiskLevel::Low,
            risk_factors: Vec::new(),
            recommended_actions: Vec::new(),
            requires_investigation: false,
            auto_approval_eligible: true,
            confidence_score: DEFAULT_CONFIDENCE,
            blocked: false,
            triggered_rules: Vec::new(),
            processing_time_ms: None,
        }
    }

    /// Assessment returned when the pipeline failed for this claim
    ///
    /// Never auto-approvable and always routed to investigation.
    pub fn fallback(claim_id: ClaimId, claimant_id: ClaimantId, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let mut result = Self::new(claim_id, claimant_id);
        result.risk_factors.push(
            RiskFactor::new(SYSTEM_ERROR_FACTOR, "Assessment Error", RiskCategory::System, 0.0, 0.0)
                .with_description(reason),
        );
        result.recommended_actions.push("Manual review required".to_string());
        result.requires_investigation = true;
        result.auto_approval_eligible = false;
        result.confidence_score = 0.0;
        result
    }

    /// True when this is a fallback assessment
    pub fn is_fallback(&self) -> bool {
        self.risk_factors.iter().any(|f| f.id == SYSTEM_ERROR_FACTOR)
    }

    /// Adds `delta` to the score, clamped to 0..=1000, recording `factor` if given
    pub fn apply_adjustment(&mut self, delta: f64, factor: Option<RiskFactor>) {
        self.overall_risk_score = (self.overall_risk_score + delta).clamp(0.0, MAX_RISK_SCORE);
        if let Some(factor) = factor {
            self.risk_factors.push(factor);
        }
    }

    /// Re-derives the level, approval flag and confidence from the current score
    pub fn recompute_level(&mut self) {
        self.risk_level = RiskLevel::from_score(self.overall_risk_score, self.blocked);
        self.auto_approval_eligible = !self.blocked && self.risk_level == RiskLevel::Low;
        if !self.is_fallback() {
            self.confidence_score = mean_confidence(&self.risk_factors);
        }
    }

    /// Adds a recommended action unless already present
    pub fn recommend(&mut self, action: impl Into<String>) {
        let action = action.into();
        if !self.recommended_actions.contains(&action) {
            self.recommended_actions.push(action);
        }
    }
}

/// Mean factor confidence, `DEFAULT_CONFIDENCE` for no factors
pub fn mean_confidence(factors: &[RiskFactor]) -> f64 {
    if factors.is_empty() {
        return DEFAULT_CONFIDENCE;
    }
    factors.iter().map(|f| f.confidence).sum::<f64>() / factors.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> RiskAssessmentResult {
        RiskAssessmentResult::new(ClaimId::new("CLM-1"), ClaimantId::new("C-1"))
    }

    #[test]
    fn test_adjustment_is_clamped() {
        let mut r = result();
        r.apply_adjustment(1500.0, None);
        assert_eq!(r.overall_risk_score, MAX_RISK_SCORE);
        r.apply_adjustment(-5000.0, None);
        assert_eq!(r.overall_risk_score, 0.0);
    }

    #[test]
    fn test_recompute_level() {
        let mut r = result();
        r.apply_adjustment(
            120.0,
            Some(RiskFactor::new("F1", "Factor", RiskCategory::Rule, 120.0, 0.8)),
        );
        r.recompute_level();
        assert_eq!(r.risk_level, RiskLevel::High);
        assert!(!r.auto_approval_eligible);
        assert!((r.confidence_score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_blocked_overrides_score() {
        let mut r = result();
        r.blocked = true;
        r.recompute_level();
        assert_eq!(r.risk_level, RiskLevel::Critical);
        assert!(!r.auto_approval_eligible);
    }

    #[test]
    fn test_fallback_shape() {
        let r = RiskAssessmentResult::fallback(ClaimId::new("CLM-1"), ClaimantId::new("C-1"), "boom");
        assert_eq!(r.overall_risk_score, 0.0);
        assert_eq!(r.risk_level, RiskLevel::Low);
        assert!(r.requires_investigation);
        assert!(!r.auto_approval_eligible);
        assert_eq!(r.risk_factors.len(), 1);
        assert_eq!(r.risk_factors[0].id, SYSTEM_ERROR_FACTOR);
        assert!(r.is_fallback());
    }

    #[test]
    fn test_default_confidence() {
        let mut r = result();
        r.recompute_level();
        assert_eq!(r.confidence_score, DEFAULT_CONFIDENCE);
    }
}
