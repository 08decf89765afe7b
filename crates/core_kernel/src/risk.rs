//! Shared risk vocabulary
//!
//! Risk levels and severities are consumed by every scoring component. The
//! thresholds and the severity→impact table live here so the rule engine, the
//! pattern detector and the real-time scorer cannot drift apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score at or above which an assessment is CRITICAL
pub const CRITICAL_THRESHOLD: f64 = 200.0;
/// Score at or above which an assessment is HIGH
pub const HIGH_THRESHOLD: f64 = 100.0;
/// Score at or above which an assessment is MEDIUM
pub const MEDIUM_THRESHOLD: f64 = 50.0;
/// Upper bound applied to every cumulative score
pub const MAX_RISK_SCORE: f64 = 1000.0;

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Determines the risk level from a cumulative score
    ///
    /// A blocked claim is always CRITICAL regardless of score.
    pub fn from_score(score: f64, blocked: bool) -> Self {
        if blocked || score >= CRITICAL_THRESHOLD {
            RiskLevel::Critical
        } else if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Ordering rank, CRITICAL highest
    pub fn rank(&self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::Critical => 4,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Severity attached to rules, schemes and scorer patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Impact weight contributed by a finding of this severity
    pub fn impact_weight(&self) -> f64 {
        match self {
            Severity::Critical => 100.0,
            Severity::Error => 75.0,
            Severity::Warning => 50.0,
            Severity::Info => 25.0,
        }
    }

    /// Risk level that a finding of this severity corresponds to
    pub fn as_risk_level(&self) -> RiskLevel {
        match self {
            Severity::Critical => RiskLevel::Critical,
            Severity::Error => RiskLevel::High,
            Severity::Warning => RiskLevel::Medium,
            Severity::Info => RiskLevel::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(RiskLevel::from_score(0.0, false), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(49.9, false), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(50.0, false), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(100.0, false), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(200.0, false), RiskLevel::Critical);
    }

    #[test]
    fn test_blocked_is_critical() {
        assert_eq!(RiskLevel::from_score(0.0, true), RiskLevel::Critical);
    }

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::Critical.impact_weight(), 100.0);
        assert_eq!(Severity::Error.impact_weight(), 75.0);
        assert_eq!(Severity::Warning.impact_weight(), 50.0);
        assert_eq!(Severity::Info.impact_weight(), 25.0);
    }
}
