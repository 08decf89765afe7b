//! Analyzer errors

use thiserror::Error;

use core_kernel::CoreError;
use domain_cases::CaseError;
use domain_claims::ClaimDataError;

/// Errors raised inside the assessment pipeline
///
/// None of these reach the caller of [`crate::EnterpriseAnalyzer::analyze`];
/// they are turned into the fallback assessment.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Invalid claim record: {0}")]
    InvalidClaim(#[from] ClaimDataError),

    #[error("Case management failed: {0}")]
    Case(#[from] CaseError),

    #[error("Invalid configuration: {0}")]
    Configuration(#[from] CoreError),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),
}

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
