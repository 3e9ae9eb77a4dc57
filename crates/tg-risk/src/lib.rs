//! Pre-trade risk gates.
//!
//! A fixed-order evaluator over one `OrderIntent`:
//! KillSwitch -> VaR Gate -> Stress Gate -> Liquidity Gate -> Order Validation.
//!
//! The kill switch is authoritative and short-circuits everything. The
//! remaining gates run independently (no gate sees another's verdict) and
//! the final verdict is the most severe across all gates. Gates never panic
//! or error across the evaluation boundary: missing input data fails open
//! unless the matching `require_*` flag escalates it to a block.
//!
//! Every gate evaluation writes one structured record through the injected
//! `AuditSink`, regardless of verdict.

pub mod audit;
pub mod config;
pub mod error;
pub mod kill_switch;
pub mod liquidity;
pub mod order_validation;
pub mod orchestrator;
pub mod stress;
pub mod var_gate;
pub mod verdict;

pub use audit::{AuditRecord, AuditSink, JsonlAuditSink, MemoryAuditSink};
pub use config::{
    LiquidityGateConfig, OrderValidationConfig, RiskConfig, StressGateConfig, StressScenario,
    VarGateConfig,
};
pub use error::{RiskError, RiskResult};
pub use kill_switch::{KillSwitch, KillSwitchReason};
pub use orchestrator::RiskGateOrchestrator;
pub use verdict::{GateDecision, RiskVerdict, Verdict, ViolationCode};
