//! Replay bundle error types.
//!
//! Hash and manifest mismatches are the audit trust boundary: they always
//! name the offending file so a tampered or drifted bundle can be triaged
//! without the original event source.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Float value in persisted artifact: {context}")]
    FloatValue { context: String },

    #[error("Bundle file missing: {file}")]
    MissingFile { file: String },

    #[error("Hash mismatch for {file}: expected {expected}, got {actual}")]
    HashMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error("Manifest mismatch: {detail}")]
    ManifestMismatch { detail: String },

    #[error("Unsupported contract version {found} (max supported {max})")]
    UnsupportedVersion { found: u32, max: u32 },

    #[error("Corrupt artifact {file} at line {line}: {detail}")]
    Corrupt {
        file: String,
        line: usize,
        detail: String,
    },

    #[error("Bundle directory already exists: {dir}")]
    AlreadyExists { dir: String },
}

pub type ReplayResult<T> = Result<T, ReplayError>;
