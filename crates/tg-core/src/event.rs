//! Raw execution events.
//!
//! Produced by the upstream execution pipeline as JSONL, consumed exactly
//! once by the Beta Event Bridge. `raw_timestamp` is informational tie-break
//! input only; the sole ordering key downstream is the Bridge-assigned `seq`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::{Money, Quantity};
use crate::order::OrderSide;
use crate::symbol::Symbol;

/// Execution event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Fill,
    Reject,
    Cancel,
}

impl EventType {
    /// Hard-coded rank used in the Bridge's canonical sort key.
    ///
    /// The rank is a fixed enum ordering, never derived from timestamps, so
    /// same-timestamp ties resolve identically on every run and machine.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Fill => 0,
            Self::Reject => 1,
            Self::Cancel => 2,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fill => write!(f, "FILL"),
            Self::Reject => write!(f, "REJECT"),
            Self::Cancel => write!(f, "CANCEL"),
        }
    }
}

/// A raw execution event as emitted by the execution pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    /// Unique event identifier; the Bridge deduplicates on this.
    pub event_id: String,
    /// FILL / REJECT / CANCEL.
    pub event_type: EventType,
    /// Instrument.
    pub symbol: Symbol,
    /// Fill side (buy opens/extends long inventory, sell consumes it).
    pub side: OrderSide,
    /// Filled quantity in asset units.
    pub quantity: Quantity,
    /// Per-unit price in minor units.
    pub price_minor: Money,
    /// Wall-clock timestamp from the source (ms). Tie-break input only.
    pub raw_timestamp: i64,
}

impl ExecutionEvent {
    /// Notional of the event (price * quantity).
    pub fn notional(&self) -> crate::Result<Money> {
        self.price_minor.checked_mul_qty(self.quantity)
    }
}
