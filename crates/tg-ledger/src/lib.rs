//! Deterministic post-trade pipeline: event bridge and FIFO ledger.
//!
//! The Beta Event Bridge turns the raw execution stream into a canonical
//! ordered sequence with gap-free `seq` numbers; the FIFO ledger engine
//! consumes that sequence exactly once and produces a double-entry journal,
//! per-symbol FIFO lot state, and an equity curve. Both stages are pure
//! batch transformations: same input set, same bytes out, regardless of
//! input ordering.

pub mod bridge;
pub mod error;
pub mod ledger;

pub use bridge::{ingest, OrderedEvent};
pub use error::{LedgerError, LedgerResult};
pub use ledger::{
    Account, EntrySide, EquitySnapshot, FifoLedger, JournalEntry, LedgerState, Lot, Position,
};
