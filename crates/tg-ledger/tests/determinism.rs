//! Bridge and ledger determinism properties.
//!
//! Shuffle-invariance of the Bridge and the ledger's accounting
//! identities over generated trade sequences.

use proptest::prelude::*;

use tg_core::{EventType, ExecutionEvent, Money, OrderSide, Quantity, Symbol};
use tg_ledger::{ingest, EntrySide, FifoLedger};

const SYMBOLS: [&str; 3] = ["AAPL", "BTC-USD", "MSFT"];

/// One generated trade instruction: (symbol index, wants-sell, quantity,
/// price in minor units).
type Instruction = (usize, bool, i64, i64);

/// Turn instructions into a feasible fill stream: a sell that exceeds the
/// holdings generated so far becomes a buy, so every sequence is valid.
fn build_events(instructions: &[Instruction]) -> Vec<ExecutionEvent> {
    let mut held = [0i64; SYMBOLS.len()];
    let mut events = Vec::with_capacity(instructions.len());
    for (i, &(sym_idx, wants_sell, qty, price)) in instructions.iter().enumerate() {
        let sym_idx = sym_idx % SYMBOLS.len();
        let side = if wants_sell && held[sym_idx] >= qty {
            held[sym_idx] -= qty;
            OrderSide::Sell
        } else {
            held[sym_idx] += qty;
            OrderSide::Buy
        };
        events.push(ExecutionEvent {
            event_id: format!("e{i:04}"),
            event_type: EventType::Fill,
            symbol: Symbol::from(SYMBOLS[sym_idx]),
            side,
            quantity: Quantity::new(qty),
            price_minor: Money::from_minor(price),
            raw_timestamp: i as i64,
        });
    }
    events
}

fn instructions() -> impl Strategy<Value = Vec<Instruction>> {
    prop::collection::vec((0usize..3, any::<bool>(), 1i64..50, 1i64..10_000), 1..40)
}

proptest! {
    /// Any permutation of the input produces the same ordered stream with
    /// the same seq assignment.
    #[test]
    fn test_bridge_shuffle_invariance(
        (original, shuffled) in instructions()
            .prop_map(|ins| build_events(&ins))
            .prop_flat_map(|events| {
                let original = events.clone();
                (Just(original), Just(events).prop_shuffle())
            })
    ) {
        prop_assert_eq!(ingest(&original), ingest(&shuffled));
    }

    /// Double-entry closure holds at every seq boundary, and the ledger's
    /// global accounting identity holds at the end of every run:
    /// cash + positions_value == realized_pnl + unrealized_pnl
    /// (starting cash is zero).
    #[test]
    fn test_ledger_accounting_identities(ins in instructions()) {
        let ordered = ingest(&build_events(&ins));
        let state = FifoLedger::apply(&ordered).unwrap();

        for event in &ordered {
            let debits: i64 = state
                .journal
                .iter()
                .filter(|e| e.seq == event.seq && e.side == EntrySide::Debit)
                .map(|e| e.amount.minor())
                .sum();
            let credits: i64 = state
                .journal
                .iter()
                .filter(|e| e.seq == event.seq && e.side == EntrySide::Credit)
                .map(|e| e.amount.minor())
                .sum();
            prop_assert_eq!(debits, credits, "imbalance at seq {}", event.seq);
        }

        let last = state.equity_curve.last().unwrap();
        prop_assert_eq!(
            last.cash.minor() + last.positions_value.minor(),
            last.realized_pnl.minor() + last.unrealized_pnl.minor()
        );
    }

    /// Position quantity is always the sum of its open FIFO lots.
    #[test]
    fn test_position_quantity_matches_lots(ins in instructions()) {
        let state = FifoLedger::apply(&ingest(&build_events(&ins))).unwrap();
        for position in state.positions() {
            let lot_total: i64 = state
                .lots(&position.symbol)
                .iter()
                .map(|l| l.quantity.units())
                .sum();
            prop_assert_eq!(position.quantity.units(), lot_total);
        }
    }
}
