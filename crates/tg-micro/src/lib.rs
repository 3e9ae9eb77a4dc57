//! Microstructure metrics extraction.
//!
//! Turns a raw order-book/quote snapshot (arbitrary JSON from upstream feed
//! tooling) into a normalized, immutable `MicroMetrics` record for one order
//! evaluation. Extraction is tolerant by design: a missing or malformed field
//! yields `None` for the metrics derived from it, never an error or panic.
//! The liquidity gate decides what to do about gaps; this crate only reports
//! what it could read.

pub mod extract;
pub mod metrics;

pub use extract::extract;
pub use metrics::MicroMetrics;
