//! Error types for tg-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid money amount: {0}")]
    InvalidMoney(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
