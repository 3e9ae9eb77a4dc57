//! Risk gate orchestrator.
//!
//! Fixed evaluation order:
//! KillSwitch -> VaR Gate -> Stress Gate -> Liquidity Gate -> Order Validation.
//!
//! The kill switch is checked first and short-circuits everything else. The
//! remaining gates run independently of each other (no gate sees another's
//! verdict), their decisions accumulate, and the final verdict is the most
//! severe. Disabled gates pass and are audited as skipped. Evaluation never
//! errors or panics across this boundary.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use tg_core::OrderIntent;
use tg_micro::MicroMetrics;
use tg_validation::VarSeries;

use crate::audit::{AuditRecord, AuditSink};
use crate::config::RiskConfig;
use crate::kill_switch::KillSwitch;
use crate::liquidity::LiquidityGate;
use crate::order_validation::OrderValidationGate;
use crate::stress::StressGate;
use crate::var_gate::VarGate;
use crate::verdict::{GateDecision, RiskVerdict, ViolationCode};

/// Fixed-order pre-trade evaluator.
pub struct RiskGateOrchestrator {
    run_id: String,
    config: RiskConfig,
    kill_switch: Arc<KillSwitch>,
    audit: Arc<dyn AuditSink>,
    var_gate: VarGate,
    stress_gate: StressGate,
    liquidity_gate: LiquidityGate,
    order_validation: OrderValidationGate,
}

impl RiskGateOrchestrator {
    /// Build an orchestrator for one run. The config is immutable for the
    /// run's lifetime; the kill switch and audit sink are shared.
    #[must_use]
    pub fn new(config: RiskConfig, kill_switch: Arc<KillSwitch>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            var_gate: VarGate::new(config.var.clone()),
            stress_gate: StressGate::new(config.stress.clone()),
            liquidity_gate: LiquidityGate::new(config.liquidity.clone()),
            order_validation: OrderValidationGate::new(config.order_validation.clone()),
            config,
            kill_switch,
            audit,
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Evaluate one order. Metrics and the VaR backtest series are passed in
    /// by the caller; no gate performs I/O.
    pub fn evaluate(
        &self,
        order: &OrderIntent,
        metrics: Option<&MicroMetrics>,
        var_series: Option<&VarSeries>,
    ) -> RiskVerdict {
        // KillSwitch is authoritative: no other gate runs while it is active.
        if self.kill_switch.is_active() {
            let reason = self
                .kill_switch
                .reason()
                .map_or_else(|| "active".to_string(), |r| r.to_string());
            let decision = GateDecision::block(
                "kill_switch",
                ViolationCode::KillSwitchActive,
                format!("kill switch active: {reason}"),
            );
            self.audit_decision(order, &decision);
            return RiskVerdict::from_decisions(vec![decision]);
        }

        let mut decisions = Vec::with_capacity(5);
        decisions.push(GateDecision::ok("kill_switch", "inactive"));

        decisions.push(if self.config.var.enabled {
            self.var_gate.check(var_series)
        } else {
            GateDecision::skipped("var")
        });

        decisions.push(if self.config.stress.enabled {
            self.stress_gate.check(order)
        } else {
            GateDecision::skipped("stress")
        });

        decisions.push(if self.config.liquidity.enabled {
            self.liquidity_gate.check(order, metrics)
        } else {
            GateDecision::skipped("liquidity")
        });

        decisions.push(if self.config.order_validation.enabled {
            self.order_validation.check(order)
        } else {
            GateDecision::skipped("order_validation")
        });

        for decision in &decisions {
            self.audit_decision(order, decision);
        }

        let verdict = RiskVerdict::from_decisions(decisions);
        debug!(
            symbol = %order.symbol,
            verdict = %verdict.verdict,
            "risk evaluation complete"
        );
        verdict
    }

    /// Flush the audit sink (call once per run, on completion).
    pub fn finish(&self) {
        if let Err(e) = self.audit.flush() {
            warn!(error = %e, "failed to flush audit sink");
        }
    }

    fn audit_decision(&self, order: &OrderIntent, decision: &GateDecision) {
        let record = AuditRecord::from_decision(&self.run_id, order.symbol.as_str(), decision);
        if let Err(e) = self.audit.record(&record) {
            // An audit write failure must never become a trading verdict.
            warn!(error = %e, gate = %decision.gate_name, "failed to write audit record");
        }
    }
}
