//! Case audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{AuditEntryId, CaseId};

/// Audited case operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    CaseCreated,
    StatusChanged,
    NoteAdded,
    EvidenceAdded,
    CustodyTransferred,
    InvestigatorAssigned,
    RecoveryRecorded,
}

/// Append-only record of a change to a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditTrailEntry {
    pub entry_id: AuditEntryId,
    pub case_id: CaseId,
    pub action: AuditAction,
    pub actor: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl AuditTrailEntry {
    pub fn new(case_id: CaseId, action: AuditAction, actor: impl Into<String>) -> Self {
        Self {
            entry_id: AuditEntryId::new_v7(),
            case_id,
            action,
            actor: actor.into(),
            old_value: None,
            new_value: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_change(mut self, old_value: Option<String>, new_value: Option<String>) -> Self {
        self.old_value = old_value;
        self.new_value = new_value;
        self
    }
}
