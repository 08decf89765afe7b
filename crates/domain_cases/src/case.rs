//! Fraud case aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{CaseId, ClaimId, ClaimantId, EvidenceId, RiskLevel, RuleId};

use crate::error::{CaseError, CaseResult};
use crate::evidence::EvidenceItem;
use crate::note::InvestigationNote;

/// Kind of fraud under investigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseType {
    IdentityTheft,
    WageFalsification,
    EmployerFraud,
    OrganizedFraud,
    EligibilityFraud,
}

impl CaseType {
    /// Derives the case type from the names of the triggering risk factors
    ///
    /// Checked in declaration order, first match wins.
    pub fn from_factor_names<S: AsRef<str>>(names: &[S]) -> Self {
        let lowered: Vec<String> = names.iter().map(|n| n.as_ref().to_lowercase()).collect();
        let any = |needles: &[&str]| lowered.iter().any(|n| needles.iter().any(|k| n.contains(k)));

        if any(&["identity", "deceased"]) {
            CaseType::IdentityTheft
        } else if any(&["wage", "employment"]) {
            CaseType::WageFalsification
        } else if any(&["employer"]) {
            CaseType::EmployerFraud
        } else if any(&["multiple", "pattern"]) {
            CaseType::OrganizedFraud
        } else {
            CaseType::EligibilityFraud
        }
    }
}

/// Case priority, one-to-one with the assessment's risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CasePriority {
    Low,
    Medium,
    High,
    Critical,
}

impl CasePriority {
    /// Ordering rank, CRITICAL highest
    pub fn rank(&self) -> u8 {
        self.risk_level().rank()
    }

    pub fn risk_level(&self) -> RiskLevel {
        match self {
            CasePriority::Low => RiskLevel::Low,
            CasePriority::Medium => RiskLevel::Medium,
            CasePriority::High => RiskLevel::High,
            CasePriority::Critical => RiskLevel::Critical,
        }
    }
}

impl From<RiskLevel> for CasePriority {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => CasePriority::Low,
            RiskLevel::Medium => CasePriority::Medium,
            RiskLevel::High => CasePriority::High,
            RiskLevel::Critical => CasePriority::Critical,
        }
    }
}

/// Case status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    /// Opened, awaiting an investigator
    Open,
    UnderInvestigation,
    /// Findings awaiting supervisor review
    PendingReview,
    /// Handed to prosecution or another agency
    Referred,
    Closed,
}

impl CaseStatus {
    /// Checks if a transition is allowed
    pub fn can_transition_to(&self, target: CaseStatus) -> bool {
        use CaseStatus::*;
        matches!(
            (self, target),
            (Open, UnderInvestigation) |
            (Open, Closed) |
            (UnderInvestigation, PendingReview) |
            (UnderInvestigation, Closed) |
            (UnderInvestigation, Referred) |
            (PendingReview, UnderInvestigation) |
            (PendingReview, Closed) |
            (PendingReview, Referred) |
            (Referred, Closed)
        )
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CaseStatus::Open => "OPEN",
            CaseStatus::UnderInvestigation => "UNDER_INVESTIGATION",
            CaseStatus::PendingReview => "PENDING_REVIEW",
            CaseStatus::Referred => "REFERRED",
            CaseStatus::Closed => "CLOSED",
        };
        f.write_str(s)
    }
}

/// An investigation opened in response to a high-risk assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudCase {
    pub case_id: CaseId,
    /// `FC-{year}-{sequence}`
    pub case_number: String,
    pub case_type: CaseType,
    pub priority: CasePriority,
    pub status: CaseStatus,
    pub claimant_id: ClaimantId,
    pub related_claim_ids: Vec<ClaimId>,
    pub fraud_score: f64,
    pub potential_loss: Decimal,
    pub actual_loss: Decimal,
    pub recovered_amount: Decimal,
    pub assigned_investigator: Option<String>,
    pub notes: Vec<InvestigationNote>,
    pub evidence: Vec<EvidenceItem>,
    pub rules_triggered: Vec<RuleId>,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub closure_date: Option<DateTime<Utc>>,
    pub closure_reason: Option<String>,
}

impl FraudCase {
    /// Moves the case to a new status
    ///
    /// Closing stamps the closure date and reason.
    pub fn transition(
        &mut self,
        target: CaseStatus,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> CaseResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(CaseError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        if target == CaseStatus::Closed {
            self.closure_date = Some(now);
            self.closure_reason = reason;
        }
        self.modified_date = now;
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.status == CaseStatus::Closed
    }

    /// Whole days since creation; closure does not stop the count
    pub fn days_open(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_date).num_days().max(0)
    }

    pub fn evidence_item(&self, evidence_id: &EvidenceId) -> Option<&EvidenceItem> {
        self.evidence.iter().find(|e| &e.evidence_id == evidence_id)
    }

    pub(crate) fn evidence_item_mut(&mut self, evidence_id: &EvidenceId) -> CaseResult<&mut EvidenceItem> {
        let case_id = self.case_id;
        self.evidence
            .iter_mut()
            .find(|e| &e.evidence_id == evidence_id)
            .ok_or(CaseError::EvidenceNotFound {
                case_id,
                evidence_id: *evidence_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_type_order() {
        assert_eq!(
            CaseType::from_factor_names(&["Wage Above Industry Norm", "Deceased Claimant"]),
            CaseType::IdentityTheft
        );
        assert_eq!(
            CaseType::from_factor_names(&["High-Risk Employer", "Claim Amount Exceeds Expected Wage"]),
            CaseType::WageFalsification
        );
        assert_eq!(CaseType::from_factor_names(&["High-Risk Employer"]), CaseType::EmployerFraud);
        assert_eq!(CaseType::from_factor_names(&["Fraud Pattern Match"]), CaseType::OrganizedFraud);
        assert_eq!(CaseType::from_factor_names::<&str>(&[]), CaseType::EligibilityFraud);
    }

    #[test]
    fn test_state_machine() {
        use CaseStatus::*;
        assert!(Open.can_transition_to(UnderInvestigation));
        assert!(Open.can_transition_to(Closed));
        assert!(!Open.can_transition_to(Referred));
        assert!(PendingReview.can_transition_to(UnderInvestigation));
        assert!(Referred.can_transition_to(Closed));
        assert!(!Closed.can_transition_to(Open));
        assert!(!UnderInvestigation.can_transition_to(UnderInvestigation));
    }

    #[test]
    fn test_priority_mirrors_risk_level() {
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High, RiskLevel::Critical] {
            assert_eq!(CasePriority::from(level).risk_level(), level);
        }
        assert!(CasePriority::Critical.rank() > CasePriority::High.rank());
    }
}
