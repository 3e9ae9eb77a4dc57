//! Replay bundle builder, validator, and loader.
//!
//! A bundle is a self-contained directory: `manifest.json`, one canonical
//! JSONL file per artifact, and `hashes.sha256` mapping every file to its
//! SHA-256. Built once from a finalized ledger run, read-only thereafter.
//!
//! Contract version 1 is frozen: the same input must produce byte-identical
//! v1 bundles forever. Version 2 may add optional manifest fields or new
//! files additively; the loader accepts both.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use tg_ledger::{EquitySnapshot, JournalEntry, LedgerState, OrderedEvent};

use crate::canonical::to_canonical_string;
use crate::error::{ReplayError, ReplayResult};

/// Version written by this builder. Frozen format.
pub const CONTRACT_VERSION: u32 = 1;
/// Highest version the loader understands.
pub const MAX_SUPPORTED_VERSION: u32 = 2;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const EVENTS_FILE: &str = "events.jsonl";
pub const LEDGER_FILE: &str = "ledger.jsonl";
pub const EQUITY_CURVE_FILE: &str = "equity_curve.jsonl";
pub const HASHES_FILE: &str = "hashes.sha256";

/// Bundle manifest. Unknown fields are tolerated so v2 bundles, which add
/// fields additively, still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub contract_version: u32,
    /// Source run identifier (e.g. the orchestrator run_id).
    pub created_from: String,
    /// Artifact files covered by this bundle, sorted.
    pub files: Vec<String>,
}

/// A validated bundle loaded back into memory for independent replay.
#[derive(Debug, Clone)]
pub struct ReplayBundle {
    pub manifest: Manifest,
    pub events: Vec<OrderedEvent>,
    pub journal: Vec<JournalEntry>,
    pub equity_curve: Vec<EquitySnapshot>,
}

/// Build a bundle directory from a finalized ledger run.
///
/// The directory is created atomically: everything is written to a
/// temporary sibling first, then renamed into place. Fails if `dir`
/// already exists; bundles are immutable once built.
pub fn build(
    dir: &Path,
    created_from: &str,
    events: &[OrderedEvent],
    state: &LedgerState,
) -> ReplayResult<()> {
    if dir.exists() {
        return Err(ReplayError::AlreadyExists {
            dir: dir.display().to_string(),
        });
    }
    let parent = dir.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let events_bytes = to_jsonl(events)?;
    let ledger_bytes = to_jsonl(&state.journal)?;
    let equity_bytes = to_jsonl(&state.equity_curve)?;

    let manifest = Manifest {
        contract_version: CONTRACT_VERSION,
        created_from: created_from.to_string(),
        files: vec![
            EQUITY_CURVE_FILE.to_string(),
            EVENTS_FILE.to_string(),
            LEDGER_FILE.to_string(),
        ],
    };
    let mut manifest_bytes = to_canonical_string(&manifest)?.into_bytes();
    manifest_bytes.push(b'\n');

    // Hash file covers the manifest and every artifact, sorted by name.
    let mut hashes: BTreeMap<&str, String> = BTreeMap::new();
    hashes.insert(MANIFEST_FILE, sha256_hex(&manifest_bytes));
    hashes.insert(EVENTS_FILE, sha256_hex(&events_bytes));
    hashes.insert(LEDGER_FILE, sha256_hex(&ledger_bytes));
    hashes.insert(EQUITY_CURVE_FILE, sha256_hex(&equity_bytes));
    let mut hashes_bytes = Vec::new();
    for (file, hash) in &hashes {
        hashes_bytes.extend_from_slice(format!("{hash}  {file}\n").as_bytes());
    }

    let staging = tempfile::Builder::new()
        .prefix(".replay-build-")
        .tempdir_in(parent)?;
    fs::write(staging.path().join(MANIFEST_FILE), &manifest_bytes)?;
    fs::write(staging.path().join(EVENTS_FILE), &events_bytes)?;
    fs::write(staging.path().join(LEDGER_FILE), &ledger_bytes)?;
    fs::write(staging.path().join(EQUITY_CURVE_FILE), &equity_bytes)?;
    fs::write(staging.path().join(HASHES_FILE), &hashes_bytes)?;
    fs::rename(staging.into_path(), dir)?;

    info!(dir = %dir.display(), events = events.len(), "replay bundle built");
    Ok(())
}

/// Recompute every hash and cross-check the manifest. This is the audit
/// trust boundary: any mismatch fails loudly with the file named.
pub fn validate(dir: &Path) -> ReplayResult<Manifest> {
    let hash_entries = read_hash_file(dir)?;

    for (file, expected) in &hash_entries {
        let bytes = read_bundle_file(dir, file)?;
        let actual = sha256_hex(&bytes);
        if actual != *expected {
            return Err(ReplayError::HashMismatch {
                file: file.clone(),
                expected: expected.clone(),
                actual,
            });
        }
        debug!(file, "hash verified");
    }

    if !hash_entries.contains_key(MANIFEST_FILE) {
        return Err(ReplayError::ManifestMismatch {
            detail: format!("{MANIFEST_FILE} not covered by {HASHES_FILE}"),
        });
    }

    let manifest_bytes = read_bundle_file(dir, MANIFEST_FILE)?;
    let manifest: Manifest = serde_json::from_slice(&manifest_bytes)?;

    if manifest.contract_version > MAX_SUPPORTED_VERSION {
        return Err(ReplayError::UnsupportedVersion {
            found: manifest.contract_version,
            max: MAX_SUPPORTED_VERSION,
        });
    }
    for file in &manifest.files {
        if !hash_entries.contains_key(file) {
            return Err(ReplayError::ManifestMismatch {
                detail: format!("manifest lists {file} but {HASHES_FILE} does not cover it"),
            });
        }
    }

    Ok(manifest)
}

/// Validate, then read the bundle back into memory.
pub fn load(dir: &Path) -> ReplayResult<ReplayBundle> {
    let manifest = validate(dir)?;

    let events = from_jsonl(dir, EVENTS_FILE)?;
    let journal = from_jsonl(dir, LEDGER_FILE)?;
    let equity_curve = from_jsonl(dir, EQUITY_CURVE_FILE)?;

    Ok(ReplayBundle {
        manifest,
        events,
        journal,
        equity_curve,
    })
}

fn to_jsonl<T: Serialize>(records: &[T]) -> ReplayResult<Vec<u8>> {
    let mut out = Vec::new();
    for record in records {
        out.extend_from_slice(to_canonical_string(record)?.as_bytes());
        out.push(b'\n');
    }
    Ok(out)
}

fn from_jsonl<T: for<'de> Deserialize<'de>>(dir: &Path, file: &str) -> ReplayResult<Vec<T>> {
    let bytes = read_bundle_file(dir, file)?;
    let text = String::from_utf8(bytes).map_err(|e| ReplayError::Corrupt {
        file: file.to_string(),
        line: 0,
        detail: e.to_string(),
    })?;
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|e| ReplayError::Corrupt {
            file: file.to_string(),
            line: idx + 1,
            detail: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

fn read_bundle_file(dir: &Path, file: &str) -> ReplayResult<Vec<u8>> {
    fs::read(dir.join(file)).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReplayError::MissingFile {
                file: file.to_string(),
            }
        } else {
            ReplayError::Io(e)
        }
    })
}

fn read_hash_file(dir: &Path) -> ReplayResult<BTreeMap<String, String>> {
    let bytes = read_bundle_file(dir, HASHES_FILE)?;
    let text = String::from_utf8(bytes).map_err(|e| ReplayError::Corrupt {
        file: HASHES_FILE.to_string(),
        line: 0,
        detail: e.to_string(),
    })?;

    let mut entries = BTreeMap::new();
    for (idx, line) in text.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        // sha256sum format: "<hex>  <filename>"
        let (hash, file) = line.split_once("  ").ok_or_else(|| ReplayError::Corrupt {
            file: HASHES_FILE.to_string(),
            line: idx + 1,
            detail: "malformed hash line".to_string(),
        })?;
        entries.insert(file.to_string(), hash.to_string());
    }
    Ok(entries)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_core::{EventType, ExecutionEvent, Money, OrderSide, Quantity, Symbol};
    use tg_ledger::{ingest, FifoLedger};

    fn sample_run() -> (Vec<OrderedEvent>, LedgerState) {
        let raw = vec![
            ExecutionEvent {
                event_id: "e1".to_string(),
                event_type: EventType::Fill,
                symbol: Symbol::from("AAPL"),
                side: OrderSide::Buy,
                quantity: Quantity::new(10),
                price_minor: Money::from_minor(100_00),
                raw_timestamp: 1,
            },
            ExecutionEvent {
                event_id: "e2".to_string(),
                event_type: EventType::Fill,
                symbol: Symbol::from("AAPL"),
                side: OrderSide::Sell,
                quantity: Quantity::new(4),
                price_minor: Money::from_minor(110_00),
                raw_timestamp: 2,
            },
            ExecutionEvent {
                event_id: "e3".to_string(),
                event_type: EventType::Cancel,
                symbol: Symbol::from("MSFT"),
                side: OrderSide::Buy,
                quantity: Quantity::new(1),
                price_minor: Money::from_minor(300_00),
                raw_timestamp: 3,
            },
        ];
        let ordered = ingest(&raw);
        let state = FifoLedger::apply(&ordered).unwrap();
        (ordered, state)
    }

    #[test]
    fn test_build_validate_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("bundle");
        let (events, state) = sample_run();

        build(&dir, "run-abc", &events, &state).unwrap();
        let manifest = validate(&dir).unwrap();
        assert_eq!(manifest.contract_version, CONTRACT_VERSION);
        assert_eq!(manifest.created_from, "run-abc");

        let bundle = load(&dir).unwrap();
        assert_eq!(bundle.events, events);
        assert_eq!(bundle.journal, state.journal);
        assert_eq!(bundle.equity_curve, state.equity_curve);
    }

    #[test]
    fn test_build_is_byte_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let (events, state) = sample_run();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        build(&a, "run-abc", &events, &state).unwrap();
        build(&b, "run-abc", &events, &state).unwrap();

        for file in [
            MANIFEST_FILE,
            EVENTS_FILE,
            LEDGER_FILE,
            EQUITY_CURVE_FILE,
            HASHES_FILE,
        ] {
            let left = fs::read(a.join(file)).unwrap();
            let right = fs::read(b.join(file)).unwrap();
            assert_eq!(left, right, "bytes differ for {file}");
        }
    }

    #[test]
    fn test_single_byte_tamper_names_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("bundle");
        let (events, state) = sample_run();
        build(&dir, "run-abc", &events, &state).unwrap();

        let path = dir.join(EVENTS_FILE);
        let mut bytes = fs::read(&path).unwrap();
        bytes[0] ^= 0x01;
        fs::write(&path, &bytes).unwrap();

        let err = validate(&dir).unwrap_err();
        match err {
            ReplayError::HashMismatch { file, .. } => assert_eq!(file, EVENTS_FILE),
            other => panic!("expected HashMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_artifact_detected() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("bundle");
        let (events, state) = sample_run();
        build(&dir, "run-abc", &events, &state).unwrap();

        fs::remove_file(dir.join(EQUITY_CURVE_FILE)).unwrap();
        let err = validate(&dir).unwrap_err();
        assert!(matches!(err, ReplayError::MissingFile { file } if file == EQUITY_CURVE_FILE));
    }

    /// Overwrite the manifest and re-sign it in the hash file, so only
    /// manifest-content checks can fail afterwards.
    fn rewrite_manifest(dir: &std::path::Path, manifest: &serde_json::Value) {
        let mut bytes = to_canonical_string(manifest).unwrap().into_bytes();
        bytes.push(b'\n');
        fs::write(dir.join(MANIFEST_FILE), &bytes).unwrap();

        let hashes = fs::read_to_string(dir.join(HASHES_FILE)).unwrap();
        let resigned: String = hashes
            .lines()
            .map(|line| {
                if line.ends_with(MANIFEST_FILE) {
                    format!("{}  {MANIFEST_FILE}\n", sha256_hex(&bytes))
                } else {
                    format!("{line}\n")
                }
            })
            .collect();
        fs::write(dir.join(HASHES_FILE), resigned).unwrap();
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("bundle");
        let (events, state) = sample_run();
        build(&dir, "run-abc", &events, &state).unwrap();

        let mut manifest: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.join(MANIFEST_FILE)).unwrap()).unwrap();
        manifest["contract_version"] = 99.into();
        rewrite_manifest(&dir, &manifest);

        let err = validate(&dir).unwrap_err();
        assert!(matches!(err, ReplayError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn test_v2_manifest_with_additive_fields_loads() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("bundle");
        let (events, state) = sample_run();
        build(&dir, "run-abc", &events, &state).unwrap();

        // A v2 bundle adds fields additively; a v1-era loader must accept
        // the version and ignore what it does not know.
        let mut manifest: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.join(MANIFEST_FILE)).unwrap()).unwrap();
        manifest["contract_version"] = 2.into();
        manifest["source_commit"] = "deadbeef".into();
        rewrite_manifest(&dir, &manifest);

        let validated = validate(&dir).unwrap();
        assert_eq!(validated.contract_version, 2);

        let bundle = load(&dir).unwrap();
        assert_eq!(bundle.manifest.contract_version, 2);
        assert_eq!(bundle.events, events);
        assert_eq!(bundle.journal, state.journal);
    }

    #[test]
    fn test_build_refuses_existing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("bundle");
        let (events, state) = sample_run();
        build(&dir, "run-abc", &events, &state).unwrap();
        let err = build(&dir, "run-abc", &events, &state).unwrap_err();
        assert!(matches!(err, ReplayError::AlreadyExists { .. }));
    }
}
