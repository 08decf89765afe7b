//! System alerts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{AlertId, CaseId, RiskLevel};

use crate::error::{CaseError, CaseResult};

/// What raised the alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    HighRiskCase,
    PatternDetected,
    RuleTriggered,
    SystemHealth,
}

/// Alert status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    Open,
    Acknowledged,
    Resolved,
    Dismissed,
}

impl AlertStatus {
    /// OPEN may move anywhere; ACKNOWLEDGED may still be resolved or dismissed
    pub fn can_transition_to(&self, target: AlertStatus) -> bool {
        use AlertStatus::*;
        matches!(
            (self, target),
            (Open, Acknowledged) |
            (Open, Resolved) |
            (Open, Dismissed) |
            (Acknowledged, Resolved) |
            (Acknowledged, Dismissed)
        )
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertStatus::Open => "OPEN",
            AlertStatus::Acknowledged => "ACKNOWLEDGED",
            AlertStatus::Resolved => "RESOLVED",
            AlertStatus::Dismissed => "DISMISSED",
        };
        f.write_str(s)
    }
}

/// A system-wide alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAlert {
    pub alert_id: AlertId,
    pub alert_type: AlertType,
    pub severity: RiskLevel,
    pub title: String,
    pub message: String,
    pub case_id: Option<CaseId>,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub handled_by: Option<String>,
    pub handled_at: Option<DateTime<Utc>>,
}

impl SystemAlert {
    pub fn new(
        alert_type: AlertType,
        severity: RiskLevel,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            alert_id: AlertId::new_v7(),
            alert_type,
            severity,
            title: title.into(),
            message: message.into(),
            case_id: None,
            status: AlertStatus::Open,
            created_at: Utc::now(),
            handled_by: None,
            handled_at: None,
        }
    }

    pub fn for_case(mut self, case_id: CaseId) -> Self {
        self.case_id = Some(case_id);
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == AlertStatus::Open
    }

    pub(crate) fn transition(&mut self, target: AlertStatus, by: &str) -> CaseResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(CaseError::InvalidAlertTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        self.handled_by = Some(by.to_string());
        self.handled_at = Some(Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_lifecycle() {
        let mut alert = SystemAlert::new(AlertType::SystemHealth, RiskLevel::Medium, "Lookup degraded", "");
        alert.transition(AlertStatus::Acknowledged, "ops-1").unwrap();
        alert.transition(AlertStatus::Resolved, "ops-1").unwrap();
        assert_eq!(alert.handled_by.as_deref(), Some("ops-1"));
        assert!(alert.transition(AlertStatus::Dismissed, "ops-2").is_err());
    }
}
