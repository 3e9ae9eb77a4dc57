//! Pre-trade order description.
//!
//! An `OrderIntent` is what the strategy/execution caller hands to the risk
//! gate. It is read-only inside the gate: evaluation never mutates it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;
use crate::symbol::Symbol;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns 1 for buy, -1 for sell (for position calculations).
    pub fn sign(&self) -> i8 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Limit order; execution price is bounded by `limit_price`.
    Limit,
    /// Market order; evaluated under tightened liquidity thresholds.
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit => write!(f, "limit"),
            Self::Market => write!(f, "market"),
        }
    }
}

/// An order proposal submitted for pre-trade risk evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    /// Target instrument.
    pub symbol: Symbol,
    /// Buy or sell.
    pub side: OrderSide,
    /// Market or limit.
    pub order_type: OrderType,
    /// Order notional in minor units.
    pub notional: Money,
    /// Limit price in minor units; required for limit orders.
    pub limit_price: Option<Money>,
}

impl OrderIntent {
    /// Create a market order intent.
    #[must_use]
    pub fn market(symbol: Symbol, side: OrderSide, notional: Money) -> Self {
        Self {
            symbol,
            side,
            order_type: OrderType::Market,
            notional,
            limit_price: None,
        }
    }

    /// Create a limit order intent.
    #[must_use]
    pub fn limit(symbol: Symbol, side: OrderSide, notional: Money, limit_price: Money) -> Self {
        Self {
            symbol,
            side,
            order_type: OrderType::Limit,
            notional,
            limit_price: Some(limit_price),
        }
    }
}
