//! Case management errors

use thiserror::Error;

use core_kernel::{AlertId, CaseId, EvidenceId};

/// Errors that can occur in case management
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("Case not found: {0}")]
    CaseNotFound(CaseId),

    #[error("Evidence {evidence_id} not found on case {case_id}")]
    EvidenceNotFound { case_id: CaseId, evidence_id: EvidenceId },

    #[error("Alert not found: {0}")]
    AlertNotFound(AlertId),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Invalid alert transition from {from} to {to}")]
    InvalidAlertTransition { from: String, to: String },

    #[error("Evidence is held by {holder}, not {claimed}")]
    CustodyMismatch { holder: String, claimed: String },

    #[error("Case already closed: {0}")]
    CaseClosed(CaseId),

    #[error("No investigator available for {0} priority")]
    NoInvestigatorAvailable(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

pub type CaseResult<T> = Result<T, CaseError>;
