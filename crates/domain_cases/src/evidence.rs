//! Evidence and chain of custody
//!
//! The custody chain is append-only: it is seeded on collection and only
//! grows through [`EvidenceItem::transfer`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::EvidenceId;

use crate::error::{CaseError, CaseResult};

/// Purpose recorded on the first custody entry
pub const INITIAL_COLLECTION: &str = "Initial collection";

/// Kind of evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceType {
    Document,
    DigitalRecord,
    FinancialRecord,
    WageRecord,
    Correspondence,
    Interview,
    Other,
}

/// One hand-off of an evidence item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustodyRecord {
    /// Previous holder, `None` on collection
    pub from: Option<String>,
    pub to: String,
    pub purpose: String,
    pub timestamp: DateTime<Utc>,
    pub digitally_signed: bool,
}

/// Evidence attached to a case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub evidence_id: EvidenceId,
    pub evidence_type: EvidenceType,
    pub description: String,
    pub collected_by: String,
    pub collected_at: DateTime<Utc>,
    custody_chain: Vec<CustodyRecord>,
}

impl EvidenceItem {
    /// Records newly collected evidence with a signed one-entry custody chain
    pub fn collect(
        evidence_type: EvidenceType,
        description: impl Into<String>,
        collected_by: impl Into<String>,
    ) -> Self {
        let collected_by = collected_by.into();
        let now = Utc::now();
        Self {
            evidence_id: EvidenceId::new_v7(),
            evidence_type,
            description: description.into(),
            collected_at: now,
            custody_chain: vec![CustodyRecord {
                from: None,
                to: collected_by.clone(),
                purpose: INITIAL_COLLECTION.to_string(),
                timestamp: now,
                digitally_signed: true,
            }],
            collected_by,
        }
    }

    pub fn custody_chain(&self) -> &[CustodyRecord] {
        &self.custody_chain
    }

    /// Current holder of the evidence
    pub fn custodian(&self) -> &str {
        self.custody_chain
            .last()
            .map_or(self.collected_by.as_str(), |r| r.to.as_str())
    }

    /// Hands the evidence from its current holder to another
    pub fn transfer(
        &mut self,
        from: &str,
        to: impl Into<String>,
        purpose: impl Into<String>,
        now: DateTime<Utc>,
    ) -> CaseResult<()> {
        if self.custodian() != from {
            return Err(CaseError::CustodyMismatch {
                holder: self.custodian().to_string(),
                claimed: from.to_string(),
            });
        }
        self.custody_chain.push(CustodyRecord {
            from: Some(from.to_string()),
            to: to.into(),
            purpose: purpose.into(),
            timestamp: now,
            digitally_signed: true,
        });
        Ok(())
    }
}
