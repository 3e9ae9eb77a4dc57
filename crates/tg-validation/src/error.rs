//! Validation suite error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Empty return/VaR series")]
    EmptySeries,

    #[error("Invalid confidence level: {0} (must be in (0, 1))")]
    InvalidConfidence(f64),

    #[error("Invalid significance level: {0} (must be in (0, 1))")]
    InvalidSignificance(f64),

    #[error("Non-finite value in series at index {0}")]
    NonFiniteValue(usize),
}

pub type ValidationResult<T> = Result<T, ValidationError>;
