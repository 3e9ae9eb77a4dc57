//! Gate verdicts and the violation taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-gate verdict, ordered by severity (`Block` > `Warn` > `Ok`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Ok,
    Warn,
    Block,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warn => write!(f, "WARN"),
            Self::Block => write!(f, "BLOCK"),
        }
    }
}

/// Stable violation codes carried in audit records and decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    KillSwitchActive,
    SpreadTooWide,
    SlippageRiskHigh,
    InsufficientDepth,
    AdvExceeded,
    MissingRequiredData,
    VarModelRejected,
    StressLossExceeded,
    InvalidOrder,
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::KillSwitchActive => "KILL_SWITCH_ACTIVE",
            Self::SpreadTooWide => "SPREAD_TOO_WIDE",
            Self::SlippageRiskHigh => "SLIPPAGE_RISK_HIGH",
            Self::InsufficientDepth => "INSUFFICIENT_DEPTH",
            Self::AdvExceeded => "ADV_EXCEEDED",
            Self::MissingRequiredData => "MISSING_REQUIRED_DATA",
            Self::VarModelRejected => "VAR_MODEL_REJECTED",
            Self::StressLossExceeded => "STRESS_LOSS_EXCEEDED",
            Self::InvalidOrder => "INVALID_ORDER",
        };
        write!(f, "{s}")
    }
}

/// One sub-gate's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    /// Stable gate identifier ("kill_switch", "liquidity", ...).
    pub gate_name: String,
    pub verdict: Verdict,
    pub violation_code: Option<ViolationCode>,
    /// Human-readable explanation for the audit trail.
    pub details: String,
}

impl GateDecision {
    #[must_use]
    pub fn ok(gate_name: &str, details: impl Into<String>) -> Self {
        Self {
            gate_name: gate_name.to_string(),
            verdict: Verdict::Ok,
            violation_code: None,
            details: details.into(),
        }
    }

    #[must_use]
    pub fn warn(gate_name: &str, code: ViolationCode, details: impl Into<String>) -> Self {
        Self {
            gate_name: gate_name.to_string(),
            verdict: Verdict::Warn,
            violation_code: Some(code),
            details: details.into(),
        }
    }

    #[must_use]
    pub fn block(gate_name: &str, code: ViolationCode, details: impl Into<String>) -> Self {
        Self {
            gate_name: gate_name.to_string(),
            verdict: Verdict::Block,
            violation_code: Some(code),
            details: details.into(),
        }
    }

    /// A disabled gate always passes, audited as skipped.
    #[must_use]
    pub fn skipped(gate_name: &str) -> Self {
        Self::ok(gate_name, "skipped: gate disabled")
    }

    pub fn is_block(&self) -> bool {
        self.verdict == Verdict::Block
    }
}

/// The orchestrator's aggregated verdict over all ran gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskVerdict {
    /// Worst verdict across all sub-gates.
    pub verdict: Verdict,
    /// All sub-gate decisions, in evaluation order.
    pub decisions: Vec<GateDecision>,
}

impl RiskVerdict {
    /// Aggregate decisions into a final verdict (worst wins).
    #[must_use]
    pub fn from_decisions(decisions: Vec<GateDecision>) -> Self {
        let verdict = decisions
            .iter()
            .map(|d| d.verdict)
            .max()
            .unwrap_or(Verdict::Ok);
        Self { verdict, decisions }
    }

    pub fn is_blocked(&self) -> bool {
        self.verdict == Verdict::Block
    }

    /// First blocking decision, if any.
    pub fn blocking_decision(&self) -> Option<&GateDecision> {
        self.decisions.iter().find(|d| d.is_block())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Verdict::Block > Verdict::Warn);
        assert!(Verdict::Warn > Verdict::Ok);
    }

    #[test]
    fn test_worst_verdict_wins() {
        let verdict = RiskVerdict::from_decisions(vec![
            GateDecision::ok("a", ""),
            GateDecision::warn("b", ViolationCode::SpreadTooWide, "wide"),
            GateDecision::ok("c", ""),
        ]);
        assert_eq!(verdict.verdict, Verdict::Warn);
        assert!(!verdict.is_blocked());

        let verdict = RiskVerdict::from_decisions(vec![
            GateDecision::warn("a", ViolationCode::SpreadTooWide, ""),
            GateDecision::block("b", ViolationCode::AdvExceeded, "over"),
        ]);
        assert!(verdict.is_blocked());
        assert_eq!(
            verdict.blocking_decision().unwrap().violation_code,
            Some(ViolationCode::AdvExceeded)
        );
    }

    #[test]
    fn test_empty_decisions_default_ok() {
        let verdict = RiskVerdict::from_decisions(vec![]);
        assert_eq!(verdict.verdict, Verdict::Ok);
    }

    #[test]
    fn test_violation_code_serialization() {
        let json = serde_json::to_string(&ViolationCode::KillSwitchActive).unwrap();
        assert_eq!(json, "\"KILL_SWITCH_ACTIVE\"");
    }
}
