//! Rule engine errors

use thiserror::Error;

use core_kernel::RuleId;

/// Errors raised by rule catalog administration
///
/// Evaluation itself never fails; these only come from catalog changes.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Rule already exists: {0}")]
    DuplicateRule(RuleId),

    #[error("Rule not found: {0}")]
    RuleNotFound(RuleId),

    #[error("Invalid regex in rule {rule_id} field {field}: {message}")]
    InvalidPattern {
        rule_id: RuleId,
        field: String,
        message: String,
    },

    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),
}

pub type RuleResult<T> = Result<T, RuleError>;
