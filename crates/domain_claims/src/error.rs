//! Claims data errors

use thiserror::Error;

/// Errors raised when a claim record violates the data model
#[derive(Debug, Error)]
pub enum ClaimDataError {
    #[error("Amount must not be negative: {field}")]
    NegativeAmount { field: String },

    #[error("Amount out of range: {field}")]
    AmountOutOfRange { field: String },

    #[error("Claimant risk score out of range: {0}")]
    RiskScoreOutOfRange(u32),

    #[error("Missing required field: {0}")]
    MissingField(String),
}
