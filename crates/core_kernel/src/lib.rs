//! Core Kernel - Foundational types shared by every claims-integrity crate
//!
//! This crate provides the building blocks used across all domain modules:
//! - Strongly-typed identifiers for claims, cases and catalog entries
//! - The shared risk vocabulary (risk levels, severity weights)
//! - The condition expression language used by rule and pattern catalogs
//! - Port infrastructure for external collaborators

pub mod identifiers;
pub mod risk;
pub mod expression;
pub mod ports;
pub mod error;

pub use identifiers::{
    ClaimId, ClaimantId, EmployerId, RuleId, SchemeId, PatternId,
    AssessmentId, CaseId, NoteId, EvidenceId, AlertId, AuditEntryId,
};
pub use risk::{RiskLevel, Severity, MAX_RISK_SCORE};
pub use expression::{Condition, ConditionOperator, LogicalOperator, FactMap};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
pub use error::CoreError;
