//! Liquidity gate.
//!
//! Four sub-checks over one `MicroMetrics` record: relative spread, slippage
//! estimate, book depth versus order size, and order-to-ADV participation.
//! MARKET orders are evaluated under tightened thresholds (caps scaled by
//! the strictness factor, depth requirement scaled up by its inverse).
//! Missing metrics fail open unless `require_micro_metrics` is set.

use rust_decimal::Decimal;
use tracing::debug;

use tg_core::{OrderIntent, OrderType};
use tg_micro::MicroMetrics;

use crate::config::LiquidityGateConfig;
use crate::verdict::{GateDecision, Verdict, ViolationCode};

pub const GATE_NAME: &str = "liquidity";

/// Liquidity gate over a threshold profile.
pub struct LiquidityGate {
    config: LiquidityGateConfig,
}

/// One sub-check's contribution to the gate decision.
struct SubCheck {
    verdict: Verdict,
    code: Option<ViolationCode>,
    detail: String,
}

impl SubCheck {
    fn ok(detail: String) -> Self {
        Self {
            verdict: Verdict::Ok,
            code: None,
            detail,
        }
    }
}

impl LiquidityGate {
    #[must_use]
    pub fn new(config: LiquidityGateConfig) -> Self {
        Self { config }
    }

    /// Evaluate the order against the liquidity thresholds.
    ///
    /// Never errors or panics: the result is always a structured decision.
    pub fn check(&self, order: &OrderIntent, metrics: Option<&MicroMetrics>) -> GateDecision {
        let Some(m) = metrics else {
            if self.config.require_micro_metrics {
                return GateDecision::block(
                    GATE_NAME,
                    ViolationCode::MissingRequiredData,
                    "micro metrics missing and require_micro_metrics is set",
                );
            }
            return GateDecision::ok(GATE_NAME, "micro metrics missing (fail-open)");
        };

        // MARKET orders get tighter caps; the depth requirement scales the
        // other way (a smaller factor means more depth demanded).
        let factor = match order.order_type {
            OrderType::Market => self.config.market_order_strictness,
            OrderType::Limit => Decimal::ONE,
        };

        let checks = [
            self.check_spread(order, m, factor),
            self.check_slippage(m, factor),
            self.check_depth(m, factor),
            self.check_adv(m, factor),
        ];

        let verdict = checks
            .iter()
            .map(|c| c.verdict)
            .max()
            .unwrap_or(Verdict::Ok);
        let code = checks
            .iter()
            .filter(|c| c.verdict == verdict)
            .find_map(|c| c.code);
        let details = checks
            .iter()
            .map(|c| c.detail.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        if verdict != Verdict::Ok {
            debug!(symbol = %order.symbol, %verdict, details, "liquidity gate flagged order");
        }

        GateDecision {
            gate_name: GATE_NAME.to_string(),
            verdict,
            violation_code: code,
            details,
        }
    }

    fn missing(&self, what: &str) -> SubCheck {
        if self.config.require_micro_metrics {
            SubCheck {
                verdict: Verdict::Block,
                code: Some(ViolationCode::MissingRequiredData),
                detail: format!("{what}: missing (required)"),
            }
        } else {
            SubCheck::ok(format!("{what}: missing (fail-open)"))
        }
    }

    fn check_spread(&self, order: &OrderIntent, m: &MicroMetrics, factor: Decimal) -> SubCheck {
        let Some(spread) = m.spread_pct else {
            return self.missing("spread");
        };
        let max_cap = self.config.max_spread_pct * factor;
        let warn_cap = self.config.warn_spread_pct * factor;

        if spread > max_cap {
            // Limit price already bounds the execution price, so a
            // spread-driven block may be downgraded for limit orders.
            let downgrade = order.order_type == OrderType::Limit
                && self.config.allow_limit_orders_when_spread_wide;
            let verdict = if downgrade { Verdict::Warn } else { Verdict::Block };
            return SubCheck {
                verdict,
                code: Some(ViolationCode::SpreadTooWide),
                detail: format!(
                    "spread {spread} > {max_cap} max{}",
                    if downgrade { " (limit downgrade)" } else { "" }
                ),
            };
        }
        if spread > warn_cap {
            return SubCheck {
                verdict: Verdict::Warn,
                code: Some(ViolationCode::SpreadTooWide),
                detail: format!("spread {spread} > {warn_cap} warn"),
            };
        }
        SubCheck::ok(format!("spread {spread} ok"))
    }

    fn check_slippage(&self, m: &MicroMetrics, factor: Decimal) -> SubCheck {
        let Some(slippage) = m.slippage_estimate_pct else {
            return self.missing("slippage");
        };
        let max_cap = self.config.max_slippage_pct * factor;
        let warn_cap = self.config.warn_slippage_pct * factor;

        if slippage > max_cap {
            return SubCheck {
                verdict: Verdict::Block,
                code: Some(ViolationCode::SlippageRiskHigh),
                detail: format!("slippage {slippage} > {max_cap} max"),
            };
        }
        if slippage > warn_cap {
            return SubCheck {
                verdict: Verdict::Warn,
                code: Some(ViolationCode::SlippageRiskHigh),
                detail: format!("slippage {slippage} > {warn_cap} warn"),
            };
        }
        SubCheck::ok(format!("slippage {slippage} ok"))
    }

    fn check_depth(&self, m: &MicroMetrics, factor: Decimal) -> SubCheck {
        let Some(depth) = m.available_depth else {
            return self.missing("depth");
        };
        // Dividing by the strictness factor raises the requirement for
        // market orders.
        let multiple = self.config.min_book_depth_multiple / factor;
        let required = Decimal::from(m.order_notional.minor()) * multiple;
        let available = Decimal::from(depth.minor());

        if available < required {
            return SubCheck {
                verdict: Verdict::Block,
                code: Some(ViolationCode::InsufficientDepth),
                detail: format!("depth {available} < {required} required"),
            };
        }
        SubCheck::ok(format!("depth {available} ok"))
    }

    fn check_adv(&self, m: &MicroMetrics, factor: Decimal) -> SubCheck {
        let Some(adv) = m.adv_notional else {
            return self.missing("adv");
        };
        if !adv.is_positive() {
            return self.missing("adv");
        }
        let cap = self.config.max_order_to_adv_pct * factor;
        let ratio = Decimal::from(m.order_notional.minor()) / Decimal::from(adv.minor());

        if ratio > cap {
            return SubCheck {
                verdict: Verdict::Block,
                code: Some(ViolationCode::AdvExceeded),
                detail: format!("order/adv {ratio} > {cap} max"),
            };
        }
        SubCheck::ok(format!("order/adv {ratio} ok"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tg_core::{Money, OrderSide, Symbol};
    use tg_micro::MicroMetrics;

    fn metrics(spread: Decimal) -> MicroMetrics {
        MicroMetrics {
            bid: Some(dec!(99)),
            ask: Some(dec!(101)),
            mid: Some(dec!(100)),
            spread_pct: Some(spread),
            slippage_estimate_pct: Some(dec!(0.001)),
            available_depth: Some(Money::from_minor(10_000_000)),
            order_notional: Money::from_minor(100_000),
            adv_notional: Some(Money::from_minor(1_000_000_000)),
        }
    }

    fn limit_order() -> OrderIntent {
        OrderIntent::limit(
            Symbol::from("AAPL"),
            OrderSide::Buy,
            Money::from_minor(100_000),
            Money::from_minor(100_00),
        )
    }

    fn market_order() -> OrderIntent {
        OrderIntent::market(Symbol::from("AAPL"), OrderSide::Buy, Money::from_minor(100_000))
    }

    #[test]
    fn test_tight_spread_passes() {
        let gate = LiquidityGate::new(LiquidityGateConfig::default());
        let d = gate.check(&market_order(), Some(&metrics(dec!(0.001))));
        assert_eq!(d.verdict, Verdict::Ok);
    }

    #[test]
    fn test_wide_spread_blocks_market_order() {
        let gate = LiquidityGate::new(LiquidityGateConfig::default());
        // Default max is 1%; 2% blocks.
        let d = gate.check(&market_order(), Some(&metrics(dec!(0.02))));
        assert_eq!(d.verdict, Verdict::Block);
        assert_eq!(d.violation_code, Some(ViolationCode::SpreadTooWide));
    }

    #[test]
    fn test_limit_order_spread_block_downgraded_to_warn() {
        let gate = LiquidityGate::new(LiquidityGateConfig::default());
        let d = gate.check(&limit_order(), Some(&metrics(dec!(0.02))));
        assert_eq!(d.verdict, Verdict::Warn);
        assert_eq!(d.violation_code, Some(ViolationCode::SpreadTooWide));
    }

    #[test]
    fn test_limit_downgrade_disabled() {
        let cfg = LiquidityGateConfig {
            allow_limit_orders_when_spread_wide: false,
            ..Default::default()
        };
        let gate = LiquidityGate::new(cfg);
        let d = gate.check(&limit_order(), Some(&metrics(dec!(0.02))));
        assert_eq!(d.verdict, Verdict::Block);
    }

    #[test]
    fn test_market_order_stricter_at_threshold() {
        // Spread exactly at the limit cap: fine for LIMIT, but the market
        // strictness factor (0.7) tightens the cap below it for MARKET.
        let gate = LiquidityGate::new(LiquidityGateConfig::default());
        let m = metrics(dec!(0.01));

        let limit = gate.check(&limit_order(), Some(&m));
        let market = gate.check(&market_order(), Some(&m));

        assert_eq!(limit.verdict, Verdict::Warn); // above warn, at max
        assert_eq!(market.verdict, Verdict::Block); // above tightened max
    }

    #[test]
    fn test_insufficient_depth_blocks() {
        let gate = LiquidityGate::new(LiquidityGateConfig::default());
        let mut m = metrics(dec!(0.001));
        // Required depth = 100_000 * 5 = 500_000; available below that.
        m.available_depth = Some(Money::from_minor(400_000));
        let d = gate.check(&limit_order(), Some(&m));
        assert_eq!(d.verdict, Verdict::Block);
        assert_eq!(d.violation_code, Some(ViolationCode::InsufficientDepth));
    }

    #[test]
    fn test_adv_participation_blocks() {
        let gate = LiquidityGate::new(LiquidityGateConfig::default());
        let mut m = metrics(dec!(0.001));
        // 100_000 / 1_000_000 = 10% > 5% cap.
        m.adv_notional = Some(Money::from_minor(1_000_000));
        let d = gate.check(&limit_order(), Some(&m));
        assert_eq!(d.verdict, Verdict::Block);
        assert_eq!(d.violation_code, Some(ViolationCode::AdvExceeded));
    }

    #[test]
    fn test_missing_metrics_fail_open() {
        let gate = LiquidityGate::new(LiquidityGateConfig::default());
        let d = gate.check(&market_order(), None);
        assert_eq!(d.verdict, Verdict::Ok);
    }

    #[test]
    fn test_missing_metrics_escalates_when_required() {
        let cfg = LiquidityGateConfig {
            require_micro_metrics: true,
            ..Default::default()
        };
        let gate = LiquidityGate::new(cfg);

        let d = gate.check(&market_order(), None);
        assert_eq!(d.verdict, Verdict::Block);
        assert_eq!(d.violation_code, Some(ViolationCode::MissingRequiredData));

        // A present record with a missing field escalates the same way.
        let gate = LiquidityGate::new(LiquidityGateConfig {
            require_micro_metrics: true,
            ..Default::default()
        });
        let mut m = metrics(dec!(0.001));
        m.adv_notional = None;
        let d = gate.check(&market_order(), Some(&m));
        assert_eq!(d.verdict, Verdict::Block);
        assert_eq!(d.violation_code, Some(ViolationCode::MissingRequiredData));
    }
}
