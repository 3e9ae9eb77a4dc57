//! FIFO double-entry ledger engine.
//!
//! Consumes the Bridge's ordered stream exactly once, in `seq` order, and
//! maintains:
//! - an append-only double-entry journal (debits == credits at every seq)
//! - per-symbol FIFO lot queues; realized PnL comes from lot age order,
//!   never from the weighted-average cost
//! - a weighted-average cost per position, for reporting only
//! - an equity snapshot after every event
//!
//! All amounts are integer minor units. Oversells, sequence gaps, and
//! journal imbalances abort the run with the offending `seq`.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use tg_core::{EventType, Money, OrderSide, Quantity, Symbol};

use crate::bridge::OrderedEvent;
use crate::error::{LedgerError, LedgerResult};

/// Journal account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Account {
    Cash,
    Inventory(Symbol),
    RealizedPnl,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Inventory(symbol) => write!(f, "inventory:{symbol}"),
            Self::RealizedPnl => write!(f, "realized_pnl"),
        }
    }
}

impl FromStr for Account {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "realized_pnl" => Ok(Self::RealizedPnl),
            other => other
                .strip_prefix("inventory:")
                .filter(|sym| !sym.is_empty())
                .map(|sym| Self::Inventory(Symbol::from(sym)))
                .ok_or_else(|| format!("unknown account: {other}")),
        }
    }
}

impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Debit or credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySide {
    Debit,
    Credit,
}

/// One double-entry journal line. Append-only; `seq` comes from the Bridge
/// and `timestamp_logical` is the run's logical clock (one tick per event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub seq: u64,
    pub timestamp_logical: u64,
    pub account: Account,
    pub side: EntrySide,
    /// Always non-negative; direction is carried by `side`.
    pub amount: Money,
    pub ref_event_id: String,
}

/// One open FIFO lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    pub quantity: Quantity,
    pub unit_cost: Money,
}

/// Reporting view of an open position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: Symbol,
    pub quantity: Quantity,
    /// Weighted-average unit cost, minor units, truncating division.
    /// Reporting only: realized PnL always comes from FIFO lots.
    pub wac: Money,
}

/// Equity snapshot emitted after every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquitySnapshot {
    pub seq: u64,
    pub cash: Money,
    pub positions_value: Money,
    pub realized_pnl: Money,
    pub unrealized_pnl: Money,
}

/// Per-symbol book: lot queue plus the running WAC.
#[derive(Debug, Clone, Default)]
struct SymbolBook {
    lots: VecDeque<Lot>,
    wac: Money,
    last_price: Money,
}

impl SymbolBook {
    fn quantity(&self) -> Quantity {
        Quantity::new(self.lots.iter().map(|l| l.quantity.units()).sum())
    }

    fn open_cost(&self) -> i64 {
        self.lots
            .iter()
            .map(|l| l.unit_cost.minor() * l.quantity.units())
            .sum()
    }
}

/// Final ledger state for one run.
#[derive(Debug, Clone, Default)]
pub struct LedgerState {
    pub cash: Money,
    pub realized_pnl: Money,
    pub journal: Vec<JournalEntry>,
    pub equity_curve: Vec<EquitySnapshot>,
    books: BTreeMap<Symbol, SymbolBook>,
}

impl LedgerState {
    /// Open positions, in symbol order. Fully closed positions are gone
    /// (quantity zero means no entry).
    pub fn positions(&self) -> Vec<Position> {
        self.books
            .iter()
            .filter(|(_, book)| !book.quantity().is_zero())
            .map(|(symbol, book)| Position {
                symbol: symbol.clone(),
                quantity: book.quantity(),
                wac: book.wac,
            })
            .collect()
    }

    /// Open FIFO lots for one symbol, oldest first.
    pub fn lots(&self, symbol: &Symbol) -> Vec<Lot> {
        self.books
            .get(symbol)
            .map(|b| b.lots.iter().copied().collect())
            .unwrap_or_default()
    }

    fn mark_to_market(&self) -> (Money, Money) {
        let mut value = 0i64;
        let mut open_cost = 0i64;
        for book in self.books.values() {
            value += book.last_price.minor() * book.quantity().units();
            open_cost += book.open_cost();
        }
        (Money::from_minor(value), Money::from_minor(value - open_cost))
    }
}

/// The engine. Stateless wrapper over one batch application.
pub struct FifoLedger;

impl FifoLedger {
    /// Apply the ordered stream and return the final state.
    ///
    /// Input must be the Bridge's output: `seq` strictly increasing and
    /// gap-free from zero. Anything else is a determinism violation and
    /// aborts.
    pub fn apply(events: &[OrderedEvent]) -> LedgerResult<LedgerState> {
        let mut state = LedgerState::default();

        for (expected, ordered) in events.iter().enumerate() {
            let expected = expected as u64;
            if ordered.seq != expected {
                return Err(LedgerError::SeqGap {
                    expected,
                    found: ordered.seq,
                });
            }
            Self::apply_event(&mut state, ordered)?;
        }

        Ok(state)
    }

    fn apply_event(state: &mut LedgerState, ordered: &OrderedEvent) -> LedgerResult<()> {
        let event = &ordered.event;
        let seq = ordered.seq;

        if event.event_type == EventType::Fill {
            if !event.quantity.is_positive() || !event.price_minor.is_positive() {
                return Err(LedgerError::InvalidEvent {
                    seq,
                    detail: format!(
                        "fill with non-positive quantity {} or price {}",
                        event.quantity, event.price_minor
                    ),
                });
            }

            let journal_start = state.journal.len();
            match event.side {
                OrderSide::Buy => Self::apply_buy(state, ordered)?,
                OrderSide::Sell => Self::apply_sell(state, ordered)?,
            }
            Self::check_balance(&state.journal[journal_start..], seq)?;

            let book = state.books.entry(event.symbol.clone()).or_default();
            book.last_price = event.price_minor;
            // A flat position is destroyed, not kept at zero; the next fill
            // in the symbol starts a fresh book.
            if book.quantity().is_zero() {
                book.wac = Money::ZERO;
            }
        }
        // REJECT/CANCEL: no position or cash effect; the snapshot still
        // advances so the curve has one row per seq.

        let (positions_value, unrealized) = state.mark_to_market();
        state.equity_curve.push(EquitySnapshot {
            seq,
            cash: state.cash,
            positions_value,
            realized_pnl: state.realized_pnl,
            unrealized_pnl: unrealized,
        });

        trace!(seq, cash = %state.cash, "applied event");
        Ok(())
    }

    fn apply_buy(state: &mut LedgerState, ordered: &OrderedEvent) -> LedgerResult<()> {
        let event = &ordered.event;
        let seq = ordered.seq;
        let cost = event
            .notional()
            .map_err(|source| LedgerError::Arithmetic { seq, source })?;

        let book = state.books.entry(event.symbol.clone()).or_default();
        let old_qty = book.quantity();
        let old_cost_weighted = book.wac.minor() * old_qty.units();

        book.lots.push_back(Lot {
            quantity: event.quantity,
            unit_cost: event.price_minor,
        });
        let new_qty = old_qty + event.quantity;
        // Truncating integer division: WAC is a reporting value, FIFO lots
        // carry the exact basis.
        book.wac = Money::from_minor((old_cost_weighted + cost.minor()) / new_qty.units());

        state.cash = state
            .cash
            .checked_sub(cost)
            .map_err(|source| LedgerError::Arithmetic { seq, source })?;

        state.journal.push(JournalEntry {
            seq,
            timestamp_logical: seq,
            account: Account::Inventory(event.symbol.clone()),
            side: EntrySide::Debit,
            amount: cost,
            ref_event_id: event.event_id.clone(),
        });
        state.journal.push(JournalEntry {
            seq,
            timestamp_logical: seq,
            account: Account::Cash,
            side: EntrySide::Credit,
            amount: cost,
            ref_event_id: event.event_id.clone(),
        });
        Ok(())
    }

    fn apply_sell(state: &mut LedgerState, ordered: &OrderedEvent) -> LedgerResult<()> {
        let event = &ordered.event;
        let seq = ordered.seq;

        let book = state.books.entry(event.symbol.clone()).or_default();
        let available = book.quantity();
        if available < event.quantity {
            return Err(LedgerError::Oversell {
                seq,
                symbol: event.symbol.clone(),
                available,
                requested: event.quantity,
            });
        }

        // Consume lots strictly oldest-first, splitting the last one if
        // partially used.
        let mut remaining = event.quantity;
        let mut basis = 0i64;
        let mut realized = 0i64;
        while remaining.is_positive() {
            let mut lot = match book.lots.pop_front() {
                Some(lot) => lot,
                // Unreachable given the availability check; keep the
                // accounting honest anyway.
                None => {
                    return Err(LedgerError::Oversell {
                        seq,
                        symbol: event.symbol.clone(),
                        available: Quantity::ZERO,
                        requested: remaining,
                    })
                }
            };
            let consumed = lot.quantity.min(remaining);
            basis += lot.unit_cost.minor() * consumed.units();
            realized += (event.price_minor.minor() - lot.unit_cost.minor()) * consumed.units();

            lot.quantity -= consumed;
            remaining -= consumed;
            if lot.quantity.is_positive() {
                book.lots.push_front(lot);
            }
        }

        let proceeds = event
            .notional()
            .map_err(|source| LedgerError::Arithmetic { seq, source })?;
        let basis = Money::from_minor(basis);
        let realized = Money::from_minor(realized);

        state.cash = state
            .cash
            .checked_add(proceeds)
            .map_err(|source| LedgerError::Arithmetic { seq, source })?;
        state.realized_pnl += realized;

        state.journal.push(JournalEntry {
            seq,
            timestamp_logical: seq,
            account: Account::Cash,
            side: EntrySide::Debit,
            amount: proceeds,
            ref_event_id: event.event_id.clone(),
        });
        state.journal.push(JournalEntry {
            seq,
            timestamp_logical: seq,
            account: Account::Inventory(event.symbol.clone()),
            side: EntrySide::Credit,
            amount: basis,
            ref_event_id: event.event_id.clone(),
        });
        if !realized.is_zero() {
            let (side, amount) = if realized.is_positive() {
                (EntrySide::Credit, realized)
            } else {
                (EntrySide::Debit, realized.abs())
            };
            state.journal.push(JournalEntry {
                seq,
                timestamp_logical: seq,
                account: Account::RealizedPnl,
                side,
                amount,
                ref_event_id: event.event_id.clone(),
            });
        }
        Ok(())
    }

    /// Double-entry closure at one seq boundary.
    fn check_balance(entries: &[JournalEntry], seq: u64) -> LedgerResult<()> {
        let debits: i64 = entries
            .iter()
            .filter(|e| e.side == EntrySide::Debit)
            .map(|e| e.amount.minor())
            .sum();
        let credits: i64 = entries
            .iter()
            .filter(|e| e.side == EntrySide::Credit)
            .map(|e| e.amount.minor())
            .sum();
        if debits != credits {
            return Err(LedgerError::JournalImbalance {
                seq,
                debits: Money::from_minor(debits),
                credits: Money::from_minor(credits),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::ingest;
    use tg_core::ExecutionEvent;

    fn fill(id: &str, side: OrderSide, qty: i64, price: i64, ts: i64) -> ExecutionEvent {
        ExecutionEvent {
            event_id: id.to_string(),
            event_type: EventType::Fill,
            symbol: Symbol::from("AAPL"),
            side,
            quantity: Quantity::new(qty),
            price_minor: Money::from_minor(price),
            raw_timestamp: ts,
        }
    }

    fn apply(events: Vec<ExecutionEvent>) -> LedgerState {
        FifoLedger::apply(&ingest(&events)).unwrap()
    }

    #[test]
    fn test_buy_posts_balanced_entries() {
        let state = apply(vec![fill("a", OrderSide::Buy, 10, 100_00, 1)]);

        assert_eq!(state.cash, Money::from_minor(-1_000_00));
        assert_eq!(state.journal.len(), 2);
        let positions = state.positions();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].quantity, Quantity::new(10));
        assert_eq!(positions[0].wac, Money::from_minor(100_00));
    }

    #[test]
    fn test_fifo_realizes_oldest_lots_first() {
        // Buy 10 @ 100.00, buy 10 @ 120.00, sell 15 @ 130.00.
        // FIFO: 10 from the first lot (+30.00 each), 5 from the second
        // (+10.00 each) = 300.00 + 50.00 = 350.00 realized.
        let state = apply(vec![
            fill("a", OrderSide::Buy, 10, 100_00, 1),
            fill("b", OrderSide::Buy, 10, 120_00, 2),
            fill("c", OrderSide::Sell, 15, 130_00, 3),
        ]);

        assert_eq!(state.realized_pnl, Money::from_minor(350_00));
        // Remaining: 5 units of the 120.00 lot.
        let lots = state.lots(&Symbol::from("AAPL"));
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].quantity, Quantity::new(5));
        assert_eq!(lots[0].unit_cost, Money::from_minor(120_00));
    }

    #[test]
    fn test_wac_is_reporting_only() {
        // WAC after the two buys is 110.00, but realized PnL uses the
        // 100.00 lot, not the average.
        let state = apply(vec![
            fill("a", OrderSide::Buy, 10, 100_00, 1),
            fill("b", OrderSide::Buy, 10, 120_00, 2),
            fill("c", OrderSide::Sell, 10, 130_00, 3),
        ]);

        // FIFO: (130 - 100) * 10 = 300.00 (WAC would give 200.00).
        assert_eq!(state.realized_pnl, Money::from_minor(300_00));
        let positions = state.positions();
        assert_eq!(positions[0].wac, Money::from_minor(110_00));
    }

    #[test]
    fn test_partial_lot_split_preserves_quantity() {
        let state = apply(vec![
            fill("a", OrderSide::Buy, 10, 100_00, 1),
            fill("b", OrderSide::Sell, 3, 110_00, 2),
        ]);

        let lots = state.lots(&Symbol::from("AAPL"));
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].quantity, Quantity::new(7));
        assert_eq!(state.positions()[0].quantity, Quantity::new(7));
        assert_eq!(state.realized_pnl, Money::from_minor(30_00));
    }

    #[test]
    fn test_position_destroyed_when_flat() {
        let state = apply(vec![
            fill("a", OrderSide::Buy, 10, 100_00, 1),
            fill("b", OrderSide::Sell, 10, 110_00, 2),
        ]);
        assert!(state.positions().is_empty());

        // Re-opened on the next fill.
        let state = apply(vec![
            fill("a", OrderSide::Buy, 10, 100_00, 1),
            fill("b", OrderSide::Sell, 10, 110_00, 2),
            fill("c", OrderSide::Buy, 4, 115_00, 3),
        ]);
        let positions = state.positions();
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].quantity, Quantity::new(4));
        assert_eq!(positions[0].wac, Money::from_minor(115_00));
    }

    #[test]
    fn test_oversell_aborts_with_seq() {
        let events = ingest(&[
            fill("a", OrderSide::Buy, 5, 100_00, 1),
            fill("b", OrderSide::Sell, 8, 110_00, 2),
        ]);
        let err = FifoLedger::apply(&events).unwrap_err();
        match err {
            LedgerError::Oversell {
                seq,
                available,
                requested,
                ..
            } => {
                assert_eq!(seq, 1);
                assert_eq!(available, Quantity::new(5));
                assert_eq!(requested, Quantity::new(8));
            }
            other => panic!("expected Oversell, got {other:?}"),
        }
    }

    #[test]
    fn test_seq_gap_aborts() {
        let mut events = ingest(&[
            fill("a", OrderSide::Buy, 5, 100_00, 1),
            fill("b", OrderSide::Buy, 5, 100_00, 2),
        ]);
        events[1].seq = 5;
        let err = FifoLedger::apply(&events).unwrap_err();
        assert!(matches!(err, LedgerError::SeqGap { expected: 1, found: 5 }));
    }

    #[test]
    fn test_double_entry_closure_at_every_prefix() {
        let state = apply(vec![
            fill("a", OrderSide::Buy, 10, 100_00, 1),
            fill("b", OrderSide::Buy, 7, 105_00, 2),
            fill("c", OrderSide::Sell, 12, 95_00, 3), // realized loss
            fill("d", OrderSide::Sell, 5, 120_00, 4),
        ]);

        let mut debits = 0i64;
        let mut credits = 0i64;
        for entry in &state.journal {
            match entry.side {
                EntrySide::Debit => debits += entry.amount.minor(),
                EntrySide::Credit => credits += entry.amount.minor(),
            }
            // Closure holds at every seq boundary, so running totals can
            // only differ within one seq's entries.
        }
        assert_eq!(debits, credits);

        // Per-seq closure.
        for seq in 0..4u64 {
            let d: i64 = state
                .journal
                .iter()
                .filter(|e| e.seq == seq && e.side == EntrySide::Debit)
                .map(|e| e.amount.minor())
                .sum();
            let c: i64 = state
                .journal
                .iter()
                .filter(|e| e.seq == seq && e.side == EntrySide::Credit)
                .map(|e| e.amount.minor())
                .sum();
            assert_eq!(d, c, "imbalance at seq {seq}");
        }
    }

    #[test]
    fn test_rejects_and_cancels_are_noops_with_snapshots() {
        let mut reject = fill("r", OrderSide::Buy, 10, 100_00, 5);
        reject.event_type = EventType::Reject;
        let mut cancel = fill("x", OrderSide::Buy, 10, 100_00, 6);
        cancel.event_type = EventType::Cancel;

        let state = apply(vec![fill("a", OrderSide::Buy, 10, 100_00, 1), reject, cancel]);

        assert_eq!(state.positions().len(), 1);
        assert_eq!(state.journal.len(), 2); // only the fill posted
        assert_eq!(state.equity_curve.len(), 3); // one snapshot per event
        let last = state.equity_curve.last().unwrap();
        assert_eq!(last.cash, state.equity_curve[0].cash);
    }

    #[test]
    fn test_equity_snapshot_values() {
        let state = apply(vec![
            fill("a", OrderSide::Buy, 10, 100_00, 1),
            fill("b", OrderSide::Sell, 4, 110_00, 2),
        ]);

        let last = state.equity_curve.last().unwrap();
        assert_eq!(last.seq, 1);
        // Cash: -1000.00 + 440.00 = -560.00.
        assert_eq!(last.cash, Money::from_minor(-560_00));
        // 6 units marked at the last trade price 110.00.
        assert_eq!(last.positions_value, Money::from_minor(660_00));
        assert_eq!(last.realized_pnl, Money::from_minor(40_00));
        // Unrealized: (110 - 100) * 6 = 60.00.
        assert_eq!(last.unrealized_pnl, Money::from_minor(60_00));
    }

    #[test]
    fn test_invalid_fill_rejected() {
        let bad = fill("a", OrderSide::Buy, 0, 100_00, 1);
        let err = FifoLedger::apply(&ingest(&[bad])).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidEvent { seq: 0, .. }));
    }
}
