//! Structured logging for the risk and ledger pipeline.
//!
//! One `init_logging()` call per process; everything downstream emits
//! through `tracing` macros and inherits the configured format/filter.

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, init_test_logging};
