//! Self-contained, hash-verified replay bundles.
//!
//! Builds a directory of canonical JSONL artifacts plus a SHA-256 hash
//! file from a finalized ledger run, validates bundles by recomputing
//! every hash, and loads validated bundles back for offline replay.

pub mod bundle;
pub mod canonical;
pub mod error;

pub use bundle::{
    build, load, validate, Manifest, ReplayBundle, CONTRACT_VERSION, EQUITY_CURVE_FILE,
    EVENTS_FILE, HASHES_FILE, LEDGER_FILE, MANIFEST_FILE, MAX_SUPPORTED_VERSION,
};
pub use canonical::to_canonical_string;
pub use error::{ReplayError, ReplayResult};
