//! Pattern detection errors

use thiserror::Error;

use core_kernel::SchemeId;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("Scheme not found: {0}")]
    SchemeNotFound(SchemeId),

    #[error("Scheme already exists: {0}")]
    DuplicateScheme(SchemeId),

    #[error("Scheme {scheme} refers to unknown detector {detector}")]
    UnknownDetector { scheme: SchemeId, detector: String },
}

pub type PatternResult<T> = Result<T, PatternError>;
