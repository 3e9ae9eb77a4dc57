//! Stress gate.
//!
//! Applies the configured scenario shocks to the order notional and checks
//! the worst-case loss against the stress-loss budget. An empty scenario set
//! fails open unless `require_scenarios` escalates it.

use rust_decimal::Decimal;

use tg_core::OrderIntent;

use crate::config::StressGateConfig;
use crate::verdict::{GateDecision, ViolationCode};

pub const GATE_NAME: &str = "stress";

/// Scenario stress-loss gate.
pub struct StressGate {
    config: StressGateConfig,
}

impl StressGate {
    #[must_use]
    pub fn new(config: StressGateConfig) -> Self {
        Self { config }
    }

    pub fn check(&self, order: &OrderIntent) -> GateDecision {
        if self.config.scenarios.is_empty() {
            if self.config.require_scenarios {
                return GateDecision::block(
                    GATE_NAME,
                    ViolationCode::MissingRequiredData,
                    "no stress scenarios configured and require_scenarios is set",
                );
            }
            return GateDecision::ok(GATE_NAME, "no stress scenarios configured (fail-open)");
        }

        let notional = Decimal::from(order.notional.minor());
        let (worst_name, worst_loss) = self
            .config
            .scenarios
            .iter()
            .map(|s| (s.name.as_str(), notional * s.shock_pct))
            .max_by(|a, b| a.1.cmp(&b.1))
            .unwrap_or(("none", Decimal::ZERO));

        let max_loss = Decimal::from(self.config.max_loss.minor());
        let warn_loss = Decimal::from(self.config.warn_loss.minor());

        if worst_loss > max_loss {
            return GateDecision::block(
                GATE_NAME,
                ViolationCode::StressLossExceeded,
                format!("worst scenario {worst_name} loss {worst_loss} > {max_loss} max"),
            );
        }
        if worst_loss > warn_loss {
            return GateDecision::warn(
                GATE_NAME,
                ViolationCode::StressLossExceeded,
                format!("worst scenario {worst_name} loss {worst_loss} > {warn_loss} warn"),
            );
        }

        GateDecision::ok(
            GATE_NAME,
            format!("worst scenario {worst_name} loss {worst_loss} within budget"),
        )
    }
}
