//! Rule trigger audit log and performance summary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AuditEntryId, ClaimId, ClaimantId, RuleId};

/// One rule trigger, appended when a rule fires and never modified
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleAuditEntry {
    pub id: AuditEntryId,
    pub rule_id: RuleId,
    pub rule_name: String,
    pub claim_id: ClaimId,
    pub claimant_id: ClaimantId,
    /// Score added by the rule's ADD_SCORE actions
    pub score_delta: f64,
    pub blocked: bool,
    pub triggered_at: DateTime<Utc>,
}

/// Per-rule trigger statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulePerformance {
    pub rule_id: RuleId,
    pub rule_name: String,
    pub is_active: bool,
    pub trigger_count: u64,
    pub total_score_contributed: f64,
    pub last_triggered: Option<DateTime<Utc>>,
}
