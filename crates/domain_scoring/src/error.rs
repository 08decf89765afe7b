//! Scorer errors

use thiserror::Error;

use core_kernel::PatternId;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Scoring pattern not found: {0}")]
    PatternNotFound(PatternId),

    #[error("Scoring pattern already exists: {0}")]
    DuplicatePattern(PatternId),
}

pub type ScoringResult<T> = Result<T, ScoringError>;
