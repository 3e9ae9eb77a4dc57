//! Beta event bridge.
//!
//! Converts the raw execution stream into a canonical ordered sequence:
//! deduplicate by `event_id` (first occurrence wins), sort by the fixed
//! composite key `(event_type_rank, symbol, raw_timestamp, event_id)`, and
//! assign gap-free `seq` numbers from zero. The composite key makes the
//! output a pure function of the input *set*: shuffling the input never
//! changes the assigned sequence.
//!
//! Non-fill events carry no ledger effect but stay in the ordered stream
//! for audit completeness.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use tg_core::ExecutionEvent;

/// An execution event with its Bridge-assigned sequence number.
///
/// `seq` is the sole ordering key downstream; wall-clock timestamps are
/// never used for ordering after this point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedEvent {
    pub seq: u64,
    #[serde(flatten)]
    pub event: ExecutionEvent,
}

/// Ingest raw events into the canonical ordered stream.
pub fn ingest(raw_events: &[ExecutionEvent]) -> Vec<OrderedEvent> {
    let mut seen = HashSet::new();
    let mut unique: Vec<&ExecutionEvent> = Vec::with_capacity(raw_events.len());
    for event in raw_events {
        if seen.insert(event.event_id.as_str()) {
            unique.push(event);
        }
    }
    let duplicates = raw_events.len() - unique.len();
    if duplicates > 0 {
        debug!(duplicates, "dropped duplicate event ids");
    }

    unique.sort_by(|a, b| {
        (a.event_type.rank(), &a.symbol, a.raw_timestamp, &a.event_id).cmp(&(
            b.event_type.rank(),
            &b.symbol,
            b.raw_timestamp,
            &b.event_id,
        ))
    });

    unique
        .into_iter()
        .enumerate()
        .map(|(i, event)| OrderedEvent {
            seq: i as u64,
            event: event.clone(),
        })
        .collect()
}
