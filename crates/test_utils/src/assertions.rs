//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for assessment results that give
//! more meaningful error messages than standard assertions.

use core_kernel::RiskLevel;
use domain_claims::RiskAssessmentResult;

/// Tolerance used when comparing scores
pub const SCORE_EPSILON: f64 = 1e-9;

fn factor_ids(result: &RiskAssessmentResult) -> Vec<&str> {
    result.risk_factors.iter().map(|f| f.id.as_str()).collect()
}

/// Asserts the cumulative score, within [`SCORE_EPSILON`]
pub fn assert_score(result: &RiskAssessmentResult, expected: f64) {
    assert!(
        (result.overall_risk_score - expected).abs() < SCORE_EPSILON,
        "Expected score {}, got {} (factors: {:?})",
        expected,
        result.overall_risk_score,
        factor_ids(result)
    );
}

/// Asserts the risk level
pub fn assert_risk_level(result: &RiskAssessmentResult, expected: RiskLevel) {
    assert_eq!(
        result.risk_level, expected,
        "Expected {} at score {}, got {}",
        expected, result.overall_risk_score, result.risk_level
    );
}

/// Asserts that a factor with this id was recorded
pub fn assert_has_factor(result: &RiskAssessmentResult, factor_id: &str) {
    assert!(
        result.risk_factors.iter().any(|f| f.id == factor_id),
        "Expected factor {} in {:?}",
        factor_id,
        factor_ids(result)
    );
}

/// Asserts that no factor with this id was recorded
pub fn assert_lacks_factor(result: &RiskAssessmentResult, factor_id: &str) {
    assert!(
        result.risk_factors.iter().all(|f| f.id != factor_id),
        "Unexpected factor {} in {:?}",
        factor_id,
        factor_ids(result)
    );
}

/// Asserts the fail-safe shape: fallback factor, routed to review, never auto-approved
pub fn assert_fallback(result: &RiskAssessmentResult) {
    assert!(result.is_fallback(), "Expected a fallback assessment, got {:?}", factor_ids(result));
    assert!(result.requires_investigation, "Fallback must require investigation");
    assert!(!result.auto_approval_eligible, "Fallback must not be auto-approvable");
}

/// Asserts that auto-approval is consistent with level and block status
pub fn assert_approval_consistent(result: &RiskAssessmentResult) {
    if result.auto_approval_eligible {
        assert_eq!(result.risk_level, RiskLevel::Low, "Auto-approved claim must be LOW");
        assert!(!result.blocked, "Auto-approved claim must not be blocked");
    }
}
