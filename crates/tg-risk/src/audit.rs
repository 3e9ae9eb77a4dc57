//! Audit sink for gate evaluations.
//!
//! One JSONL record per gate evaluation, append-only, consumed by operator
//! tooling (grep/jq) and never read back by the core. The sink is injected
//! into the orchestrator rather than living in process-global state; it is
//! opened once per run and flushed on completion.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::verdict::{GateDecision, Verdict, ViolationCode};

/// One audit record per gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Run identifier (UUID v4, assigned once per orchestrator).
    pub run_id: String,
    pub gate_name: String,
    pub verdict: Verdict,
    pub violation_code: Option<ViolationCode>,
    pub details: String,
    /// What this record refers to: a ledger `seq` for pipeline stages, an
    /// order reference (the symbol) for gate evaluations.
    pub seq_or_order_ref: String,
}

impl AuditRecord {
    #[must_use]
    pub fn from_decision(run_id: &str, seq_or_order_ref: &str, decision: &GateDecision) -> Self {
        Self {
            run_id: run_id.to_string(),
            gate_name: decision.gate_name.clone(),
            verdict: decision.verdict,
            violation_code: decision.violation_code,
            details: decision.details.clone(),
            seq_or_order_ref: seq_or_order_ref.to_string(),
        }
    }
}

/// Destination for audit records.
///
/// Implementations must be cheap to call on the evaluation path; failures
/// are surfaced to the orchestrator, which logs and continues (an audit
/// write failure must never turn into a trading verdict).
pub trait AuditSink: Send + Sync {
    fn record(&self, record: &AuditRecord) -> std::io::Result<()>;

    fn flush(&self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Append-only JSONL audit writer.
pub struct JsonlAuditSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonlAuditSink {
    /// Open (or create) the audit file in append mode.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        info!(path = %path.display(), "opened audit sink (append mode)");
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl AuditSink for JsonlAuditSink {
    fn record(&self, record: &AuditRecord) -> std::io::Result<()> {
        let line = serde_json::to_string(record)?;
        let mut writer = self.writer.lock();
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&self) -> std::io::Result<()> {
        self.writer.lock().flush()
    }
}

/// In-memory sink for tests and dry runs.
#[derive(Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, record: &AuditRecord) -> std::io::Result<()> {
        self.records.lock().push(record.clone());
        Ok(())
    }
}
