//! Normalized microstructure metrics record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tg_core::Money;

/// Microstructure metrics for one order evaluation.
///
/// Derived and immutable: produced fresh per order attempt, consumed by the
/// liquidity gate, and never persisted beyond the audit record. Ratio fields
/// are exact decimals (these never reach a hashed artifact); notional fields
/// are integer minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicroMetrics {
    /// Best bid price.
    pub bid: Option<Decimal>,
    /// Best ask price.
    pub ask: Option<Decimal>,
    /// Mid price: (bid + ask) / 2.
    pub mid: Option<Decimal>,
    /// Relative spread: (ask - bid) / mid.
    pub spread_pct: Option<Decimal>,
    /// Estimated slippage for the order, as a fraction of mid.
    pub slippage_estimate_pct: Option<Decimal>,
    /// Book depth available near the touch, in notional minor units.
    pub available_depth: Option<Money>,
    /// Notional of the order under evaluation.
    pub order_notional: Money,
    /// Average daily volume in notional minor units.
    pub adv_notional: Option<Money>,
}

impl MicroMetrics {
    /// A metrics record with nothing readable from the snapshot.
    #[must_use]
    pub fn empty(order_notional: Money) -> Self {
        Self {
            bid: None,
            ask: None,
            mid: None,
            spread_pct: None,
            slippage_estimate_pct: None,
            available_depth: None,
            order_notional,
            adv_notional: None,
        }
    }

    /// Whether both sides of the book were readable.
    pub fn has_two_sided_book(&self) -> bool {
        self.bid.is_some() && self.ask.is_some()
    }
}
