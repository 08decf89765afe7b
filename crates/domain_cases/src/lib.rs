//! Fraud Case Management
//!
//! Turns high-risk assessments into tracked investigations.
//!
//! # Case lifecycle
//!
//! ```text
//! OPEN ──▶ UNDER_INVESTIGATION ──▶ PENDING_REVIEW
//!   │            │   ▲                 │
//!   │            │   └─────────────────┤
//!   │            ├──▶ REFERRED ◀───────┤
//!   │            │       │             │
//!   └────────────┴───────┴──▶ CLOSED ◀─┘
//! ```
//!
//! Notes, evidence custody records and audit entries are append-only. Alerts
//! only change status: OPEN to ACKNOWLEDGED, RESOLVED or DISMISSED, and
//! ACKNOWLEDGED to RESOLVED or DISMISSED.

pub mod case;
pub mod note;
pub mod evidence;
pub mod audit;
pub mod alert;
pub mod crossmatch;
pub mod config;
pub mod report;
pub mod manager;
pub mod error;

pub use case::{FraudCase, CaseType, CasePriority, CaseStatus};
pub use note::{InvestigationNote, NoteType};
pub use evidence::{EvidenceItem, EvidenceType, CustodyRecord};
pub use audit::{AuditTrailEntry, AuditAction};
pub use alert::{SystemAlert, AlertType, AlertStatus};
pub use crossmatch::{CrossMatchPort, CrossMatchQuery, CrossMatchResult, MatchType, SourceType};
pub use config::{CaseConfig, InvestigatorPools};
pub use report::CaseReport;
pub use manager::CaseManager;
pub use error::{CaseError, CaseResult};
