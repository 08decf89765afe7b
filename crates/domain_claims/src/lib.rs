//! Benefit Claims Domain
//!
//! This crate holds the records the assessment pipeline reasons about: the
//! benefit claim, the claimant profile, the employer of record, and the
//! assessment produced for them.
//!
//! # Assessment data flow
//!
//! ```text
//! Claim + ClaimantProfile + EmployerRecord + AssessmentContext
//!     -> FactMap (facts::entity_facts)
//!     -> RiskFactor* -> RiskAssessmentResult
//! ```

pub mod claim;
pub mod claimant;
pub mod employer;
pub mod assessment;
pub mod context;
pub mod facts;
pub mod error;

pub use claim::{Claim, ClaimStatus, ProgramType, BENEFIT_WEEKS};
pub use claimant::{ClaimantProfile, Address, VerificationStatus, AccountStatus};
pub use employer::{EmployerRecord, EmployerStatus, WageReport};
pub use assessment::{RiskFactor, RiskCategory, RiskAssessmentResult};
pub use context::{AssessmentContext, DerivedFacts, SessionMetrics, ReferenceCase, CrossReferenceCounts};
pub use error::ClaimDataError;
