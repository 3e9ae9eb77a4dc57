//! VaR gate.
//!
//! Runs the statistical validation suite over the run's backtest series and
//! blocks new orders while the VaR model itself is rejected: if the model's
//! breach history fails Kupiec POF or Christoffersen CC, its risk numbers
//! cannot be trusted for pre-trade sizing. Inconclusive results degrade to
//! WARN, never to a silent pass.

use tracing::debug;

use tg_validation::{run_suite, TestOutcome, VarSeries};

use crate::config::VarGateConfig;
use crate::verdict::{GateDecision, ViolationCode};

pub const GATE_NAME: &str = "var";

/// VaR model health gate.
pub struct VarGate {
    config: VarGateConfig,
}

impl VarGate {
    #[must_use]
    pub fn new(config: VarGateConfig) -> Self {
        Self { config }
    }

    /// Evaluate against the run's backtest series, if one was provided.
    pub fn check(&self, series: Option<&VarSeries>) -> GateDecision {
        let Some(series) = series else {
            if self.config.require_series {
                return GateDecision::block(
                    GATE_NAME,
                    ViolationCode::MissingRequiredData,
                    "VaR backtest series missing and require_series is set",
                );
            }
            return GateDecision::ok(GATE_NAME, "VaR backtest series missing (fail-open)");
        };

        let suite = match run_suite(series, self.config.significance) {
            Ok(suite) => suite,
            Err(e) => {
                // A malformed series is a data gap, not a crash: same
                // escalation rules as a missing one.
                debug!(error = %e, "VaR suite could not run");
                if self.config.require_series {
                    return GateDecision::block(
                        GATE_NAME,
                        ViolationCode::MissingRequiredData,
                        format!("VaR suite unusable: {e}"),
                    );
                }
                return GateDecision::ok(GATE_NAME, format!("VaR suite unusable: {e} (fail-open)"));
            }
        };

        let failed: Vec<&str> = suite
            .tests
            .iter()
            .filter(|t| t.outcome == TestOutcome::Fail)
            .map(|t| t.test_name.as_str())
            .collect();

        if !failed.is_empty() {
            return GateDecision::block(
                GATE_NAME,
                ViolationCode::VarModelRejected,
                format!(
                    "VaR model rejected ({}; breaches {}/{})",
                    failed.join(", "),
                    suite.breach_count,
                    suite.sample_size
                ),
            );
        }

        let inconclusive = suite
            .tests
            .iter()
            .any(|t| t.outcome == TestOutcome::Inconclusive);
        if inconclusive {
            return GateDecision::warn(
                GATE_NAME,
                ViolationCode::VarModelRejected,
                format!(
                    "VaR backtests inconclusive (breaches {}/{})",
                    suite.breach_count, suite.sample_size
                ),
            );
        }

        GateDecision::ok(
            GATE_NAME,
            format!(
                "VaR backtests pass (breaches {}/{})",
                suite.breach_count, suite.sample_size
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Verdict;
    use tg_validation::VarObservation;

    fn series_with_breaches(n: usize, breach_idx: &[usize]) -> VarSeries {
        let obs = (0..n)
            .map(|i| VarObservation {
                actual_return: if breach_idx.contains(&i) { -0.05 } else { 0.001 },
                var_estimate: 0.02,
            })
            .collect();
        VarSeries::new(0.99, obs).unwrap()
    }

    #[test]
    fn test_healthy_model_passes() {
        let gate = VarGate::new(VarGateConfig::default());
        let series = series_with_breaches(250, &[10, 60, 110, 160, 210]);
        let d = gate.check(Some(&series));
        assert_eq!(d.verdict, Verdict::Ok);
    }

    #[test]
    fn test_rejected_model_blocks() {
        let gate = VarGate::new(VarGateConfig::default());
        // Clustered excess breaches fail POF, IND, and CC.
        let series = series_with_breaches(250, &[10, 11, 70, 71, 130, 131, 190, 191]);
        let d = gate.check(Some(&series));
        assert_eq!(d.verdict, Verdict::Block);
        assert_eq!(d.violation_code, Some(ViolationCode::VarModelRejected));
    }

    #[test]
    fn test_inconclusive_warns() {
        let gate = VarGate::new(VarGateConfig::default());
        // Zero breaches: every test is inconclusive.
        let series = series_with_breaches(250, &[]);
        let d = gate.check(Some(&series));
        assert_eq!(d.verdict, Verdict::Warn);
    }

    #[test]
    fn test_missing_series_fail_open_and_escalation() {
        let gate = VarGate::new(VarGateConfig::default());
        assert_eq!(gate.check(None).verdict, Verdict::Ok);

        let strict = VarGate::new(VarGateConfig {
            require_series: true,
            ..Default::default()
        });
        let d = strict.check(None);
        assert_eq!(d.verdict, Verdict::Block);
        assert_eq!(d.violation_code, Some(ViolationCode::MissingRequiredData));
    }
}
