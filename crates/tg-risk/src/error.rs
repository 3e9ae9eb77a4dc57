//! Risk error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audit sink error: {0}")]
    Audit(#[from] std::io::Error),
}

pub type RiskResult<T> = Result<T, RiskError>;
