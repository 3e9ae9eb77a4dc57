//! Order validation gate.
//!
//! Structural checks on the order itself: positive notional within the
//! configured band, a symbol that parses, and a positive limit price on
//! limit orders. Runs last in the fixed gate order.

use tg_core::{OrderIntent, OrderType};

use crate::config::OrderValidationConfig;
use crate::verdict::{GateDecision, ViolationCode};

pub const GATE_NAME: &str = "order_validation";

/// Structural order validation.
pub struct OrderValidationGate {
    config: OrderValidationConfig,
}

impl OrderValidationGate {
    #[must_use]
    pub fn new(config: OrderValidationConfig) -> Self {
        Self { config }
    }

    pub fn check(&self, order: &OrderIntent) -> GateDecision {
        if order.symbol.is_empty() {
            return GateDecision::block(GATE_NAME, ViolationCode::InvalidOrder, "empty symbol");
        }

        if !order.notional.is_positive() {
            return GateDecision::block(
                GATE_NAME,
                ViolationCode::InvalidOrder,
                format!("non-positive notional {}", order.notional),
            );
        }
        if order.notional < self.config.min_order_notional {
            return GateDecision::block(
                GATE_NAME,
                ViolationCode::InvalidOrder,
                format!(
                    "notional {} below minimum {}",
                    order.notional, self.config.min_order_notional
                ),
            );
        }
        if order.notional > self.config.max_order_notional {
            return GateDecision::block(
                GATE_NAME,
                ViolationCode::InvalidOrder,
                format!(
                    "notional {} above maximum {}",
                    order.notional, self.config.max_order_notional
                ),
            );
        }

        match (order.order_type, order.limit_price) {
            (OrderType::Limit, None) => {
                return GateDecision::block(
                    GATE_NAME,
                    ViolationCode::InvalidOrder,
                    "limit order without limit price",
                );
            }
            (OrderType::Limit, Some(px)) if !px.is_positive() => {
                return GateDecision::block(
                    GATE_NAME,
                    ViolationCode::InvalidOrder,
                    format!("non-positive limit price {px}"),
                );
            }
            _ => {}
        }

        GateDecision::ok(GATE_NAME, "order structurally valid")
    }
}
