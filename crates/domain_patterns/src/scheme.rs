//! Known fraud schemes and the alerts they raise

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AlertId, ClaimId, ClaimantId, PatternId, RiskLevel, SchemeId, Severity};

use crate::detectors;

pub const IDENTITY_RING: &str = "IDENTITY_RING_SCHEME";
pub const SYNTHETIC_IDENTITY: &str = "SYNTHETIC_IDENTITY_SCHEME";
pub const SSN_SHARING: &str = "SSN_SHARING_SCHEME";
pub const EMPLOYER_COLLUSION: &str = "EMPLOYER_COLLUSION_SCHEME";
pub const FOREIGN_ACCESS: &str = "FOREIGN_ACCESS_SCHEME";
pub const BOT_FILING: &str = "BOT_FILING_SCHEME";
pub const ORGANIZED_RING: &str = "ORGANIZED_RING_SCHEME";

/// A catalog entry describing one fraud scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudScheme {
    pub id: SchemeId,
    pub name: String,
    pub description: String,
    pub severity: Severity,
    /// Detector names; all must match for the scheme to be detected
    pub detectors: Vec<String>,
    /// Scheme-specific action items
    pub base_actions: Vec<String>,
    /// Rolling historical precision, 0..=1
    pub success_rate: f64,
    pub occurrences: u64,
    pub confirmed_outcomes: u64,
    pub total_outcomes: u64,
    pub last_detected: Option<DateTime<Utc>>,
    /// Emerging pattern this scheme was promoted from
    pub promoted_from: Option<PatternId>,
}

impl FraudScheme {
    pub fn new(
        id: impl Into<SchemeId>,
        name: impl Into<String>,
        severity: Severity,
        detectors: &[&str],
        success_rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            severity,
            detectors: detectors.iter().map(|d| d.to_string()).collect(),
            base_actions: Vec::new(),
            success_rate: success_rate.clamp(0.0, 1.0),
            occurrences: 0,
            confirmed_outcomes: 0,
            total_outcomes: 0,
            last_detected: None,
            promoted_from: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_actions(mut self, actions: &[&str]) -> Self {
        self.base_actions = actions.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Detection confidence: `round2(success_rate * 0.7 + matched_ratio * 0.3)`
    pub fn confidence(&self, matched_ratio: f64) -> f64 {
        let raw = self.success_rate * 0.7 + matched_ratio * 0.3;
        (raw * 100.0).round() / 100.0
    }

    /// Folds one confirmed or refuted outcome into the rolling success rate
    pub fn record_outcome(&mut self, was_fraud: bool, weight: f64) {
        let observed = if was_fraud { 1.0 } else { 0.0 };
        let weight = weight.clamp(0.0, 1.0);
        self.success_rate = (self.success_rate * (1.0 - weight) + observed * weight).clamp(0.0, 1.0);
        self.total_outcomes += 1;
        if was_fraud {
            self.confirmed_outcomes += 1;
        }
    }

    /// Action items: severity prefix, scheme actions, severity suffix
    pub fn action_items(&self) -> Vec<String> {
        let (prefix, suffix): (Vec<&str>, Vec<&str>) = match self.severity.as_risk_level() {
            RiskLevel::Critical => (
                vec!["Escalate to fraud investigation unit immediately", "Suspend payments on affected claims"],
                vec!["Notify state fraud coordinator"],
            ),
            RiskLevel::High => (
                vec!["Assign to senior investigator"],
                vec!["Complete review within 48 hours"],
            ),
            RiskLevel::Medium => (
                vec!["Flag affected claims for review"],
                vec!["Monitor for additional activity"],
            ),
            RiskLevel::Low => (vec![], vec!["Continue routine monitoring"]),
        };

        prefix
            .iter()
            .map(|s| s.to_string())
            .chain(self.base_actions.iter().cloned())
            .chain(suffix.iter().map(|s| s.to_string()))
            .collect()
    }
}

/// An alert raised when a scheme is detected in a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternAlert {
    pub id: AlertId,
    pub scheme_id: SchemeId,
    pub scheme_name: String,
    pub severity: RiskLevel,
    pub confidence: f64,
    pub affected_claim_ids: Vec<ClaimId>,
    pub affected_claimant_ids: Vec<ClaimantId>,
    pub action_items: Vec<String>,
    pub detected_at: DateTime<Utc>,
}

/// The built-in scheme catalog
pub fn default_schemes() -> Vec<FraudScheme> {
    vec![
        FraudScheme::new(IDENTITY_RING, "Identity Ring", Severity::Critical, &[detectors::SHARED_IP], 0.86)
            .with_description("Many claims filed from a single IP address")
            .with_actions(&["Cross-check identities on shared IP", "Request ISP subscriber records"]),
        FraudScheme::new(SYNTHETIC_IDENTITY, "Synthetic Identity", Severity::Error, &[detectors::SYNTHETIC_IDENTITY], 0.78)
            .with_description("High-risk claimants with newly created accounts")
            .with_actions(&["Verify identity documents in person"]),
        FraudScheme::new(SSN_SHARING, "SSN Sharing", Severity::Critical, &[detectors::SSN_SHARING], 0.9)
            .with_description("One SSN used by multiple claimants")
            .with_actions(&["Contact SSA for SSN verification", "Freeze claims on shared SSN"]),
        FraudScheme::new(EMPLOYER_COLLUSION, "Employer Collusion", Severity::Error, &[detectors::EMPLOYER_SURGE], 0.7)
            .with_description("Burst of separations reported by one employer")
            .with_actions(&["Audit employer wage reports", "Interview employer of record"]),
        FraudScheme::new(FOREIGN_ACCESS, "Foreign Access", Severity::Warning, &[detectors::FOREIGN_ACCESS], 0.6)
            .with_description("Claims filed from non-domestic networks")
            .with_actions(&["Confirm claimant residency"]),
        FraudScheme::new(BOT_FILING, "Automated Filing", Severity::Error, &[detectors::REGULAR_CADENCE], 0.75)
            .with_description("Claims filed at machine-regular intervals")
            .with_actions(&["Enable CAPTCHA on filing portal", "Review session device fingerprints"]),
        FraudScheme::new(
            ORGANIZED_RING,
            "Organized Fraud Ring",
            Severity::Critical,
            &[detectors::SHARED_IP, detectors::REGULAR_CADENCE],
            0.8,
        )
        .with_description("Shared infrastructure combined with automated filing")
        .with_actions(&["Coordinate with law enforcement liaison"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_rounding() {
        let scheme = FraudScheme::new("S", "S", Severity::Warning, &["x"], 0.853);
        assert_eq!(scheme.confidence(1.0), 0.9);
        assert_eq!(scheme.confidence(0.5), 0.75);
    }

    #[test]
    fn test_outcome_moves_success_rate() {
        let mut scheme = FraudScheme::new("S", "S", Severity::Warning, &["x"], 0.5);
        scheme.record_outcome(true, 0.1);
        assert!((scheme.success_rate - 0.55).abs() < 1e-9);
        scheme.record_outcome(false, 0.1);
        assert!((scheme.success_rate - 0.495).abs() < 1e-9);
        assert_eq!(scheme.total_outcomes, 2);
        assert_eq!(scheme.confirmed_outcomes, 1);
    }

    #[test]
    fn test_action_items_wrap_base_actions() {
        let scheme = FraudScheme::new("S", "S", Severity::Critical, &["x"], 0.5).with_actions(&["Do the thing"]);
        let items = scheme.action_items();
        assert_eq!(items.first().map(String::as_str), Some("Escalate to fraud investigation unit immediately"));
        assert_eq!(items[2], "Do the thing");
        assert_eq!(items.last().map(String::as_str), Some("Notify state fraud coordinator"));
    }

    #[test]
    fn test_info_severity_uses_default_actions() {
        let scheme = FraudScheme::new("S", "S", Severity::Info, &["x"], 0.5);
        assert_eq!(scheme.action_items(), vec!["Continue routine monitoring".to_string()]);
    }
}
