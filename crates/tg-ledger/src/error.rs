//! Ledger error types.
//!
//! Every fatal error names the offending `seq` so a run can be triaged
//! without replaying the whole pipeline. These are determinism/accounting
//! invariant violations: the run aborts, it never degrades.

use thiserror::Error;

use tg_core::{Money, Quantity, Symbol};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Sequence gap: expected {expected}, found {found}")]
    SeqGap { expected: u64, found: u64 },

    #[error("Oversell at seq {seq}: {symbol} has {available} units, {requested} requested")]
    Oversell {
        seq: u64,
        symbol: Symbol,
        available: Quantity,
        requested: Quantity,
    },

    #[error("Journal imbalance at seq {seq}: debits {debits} != credits {credits}")]
    JournalImbalance {
        seq: u64,
        debits: Money,
        credits: Money,
    },

    #[error("Invalid event at seq {seq}: {detail}")]
    InvalidEvent { seq: u64, detail: String },

    #[error("Arithmetic failure at seq {seq}: {source}")]
    Arithmetic {
        seq: u64,
        #[source]
        source: tg_core::CoreError,
    },
}

pub type LedgerResult<T> = Result<T, LedgerError>;
