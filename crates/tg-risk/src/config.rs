//! Typed, immutable risk configuration.
//!
//! One explicit struct per gate, validated once at load time: unknown keys
//! are rejected by the deserializer instead of being checked defensively at
//! every access. Threshold profiles (`equity_conservative`,
//! `crypto_moderate`) are provided as constructors; operators load a TOML
//! file shaped the same way.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use tg_core::Money;

use crate::error::{RiskError, RiskResult};

/// VaR gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VarGateConfig {
    /// Gate enable flag; disabled gates always pass and are audited as skipped.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Escalate a missing backtest series to BLOCK instead of failing open.
    #[serde(default)]
    pub require_series: bool,
    /// Significance level for the likelihood-ratio tests.
    #[serde(default = "default_significance")]
    pub significance: f64,
}

impl Default for VarGateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            require_series: false,
            significance: default_significance(),
        }
    }
}

/// One stress scenario: an adverse price shock applied to the order notional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StressScenario {
    /// Scenario name (e.g. "flash_crash_2010").
    pub name: String,
    /// Adverse move as a fraction (0.10 = 10% shock).
    pub shock_pct: Decimal,
}

/// Stress gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StressGateConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Escalate an empty scenario set to BLOCK instead of failing open.
    #[serde(default)]
    pub require_scenarios: bool,
    /// Scenario shocks applied to the order notional.
    #[serde(default)]
    pub scenarios: Vec<StressScenario>,
    /// Warn when the worst scenario loss exceeds this (minor units).
    #[serde(default = "default_warn_stress_loss")]
    pub warn_loss: Money,
    /// Block when the worst scenario loss exceeds this (minor units).
    #[serde(default = "default_max_stress_loss")]
    pub max_loss: Money,
}

impl Default for StressGateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            require_scenarios: false,
            scenarios: vec![
                StressScenario {
                    name: "moderate_shock".to_string(),
                    shock_pct: Decimal::new(5, 2), // 5%
                },
                StressScenario {
                    name: "severe_shock".to_string(),
                    shock_pct: Decimal::new(15, 2), // 15%
                },
            ],
            warn_loss: default_warn_stress_loss(),
            max_loss: default_max_stress_loss(),
        }
    }
}

/// Liquidity gate configuration.
///
/// Each sub-check carries a `(warn, max)` threshold pair. The market-order
/// strictness factor and the limit-order spread downgrade carry the source
/// material's documented constants as defaults but are configurable per
/// profile, flagged for operator review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiquidityGateConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Escalate missing microstructure metrics to BLOCK.
    #[serde(default)]
    pub require_micro_metrics: bool,
    /// Warn when spread_pct exceeds this.
    #[serde(default = "default_warn_spread_pct")]
    pub warn_spread_pct: Decimal,
    /// Block when spread_pct exceeds this.
    #[serde(default = "default_max_spread_pct")]
    pub max_spread_pct: Decimal,
    /// Warn when the slippage estimate exceeds this.
    #[serde(default = "default_warn_slippage_pct")]
    pub warn_slippage_pct: Decimal,
    /// Block when the slippage estimate exceeds this.
    #[serde(default = "default_max_slippage_pct")]
    pub max_slippage_pct: Decimal,
    /// Required book depth as a multiple of order notional.
    #[serde(default = "default_min_book_depth_multiple")]
    pub min_book_depth_multiple: Decimal,
    /// Block when order_notional / adv_notional exceeds this.
    #[serde(default = "default_max_order_to_adv_pct")]
    pub max_order_to_adv_pct: Decimal,
    /// Threshold tightening factor applied to MARKET orders (0.7 = 30%
    /// tighter caps, proportionally deeper book requirement).
    #[serde(default = "default_market_order_strictness")]
    pub market_order_strictness: Decimal,
    /// Downgrade a spread-driven BLOCK to WARN for limit orders (the limit
    /// price already bounds the execution price).
    #[serde(default = "default_enabled")]
    pub allow_limit_orders_when_spread_wide: bool,
}

impl Default for LiquidityGateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            require_micro_metrics: false,
            warn_spread_pct: default_warn_spread_pct(),
            max_spread_pct: default_max_spread_pct(),
            warn_slippage_pct: default_warn_slippage_pct(),
            max_slippage_pct: default_max_slippage_pct(),
            min_book_depth_multiple: default_min_book_depth_multiple(),
            max_order_to_adv_pct: default_max_order_to_adv_pct(),
            market_order_strictness: default_market_order_strictness(),
            allow_limit_orders_when_spread_wide: true,
        }
    }
}

/// Order validation gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderValidationConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Minimum order notional in minor units.
    #[serde(default = "default_min_order_notional")]
    pub min_order_notional: Money,
    /// Maximum order notional in minor units.
    #[serde(default = "default_max_order_notional")]
    pub max_order_notional: Money,
}

impl Default for OrderValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_order_notional: default_min_order_notional(),
            max_order_notional: default_max_order_notional(),
        }
    }
}

/// Full risk configuration: one immutable struct per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskConfig {
    /// Profile name for audit records ("equity_conservative", ...).
    #[serde(default)]
    pub profile: String,
    #[serde(default)]
    pub var: VarGateConfig,
    #[serde(default)]
    pub stress: StressGateConfig,
    #[serde(default)]
    pub liquidity: LiquidityGateConfig,
    #[serde(default)]
    pub order_validation: OrderValidationConfig,
}

impl RiskConfig {
    /// Conservative equity profile: tight spreads, deep-book requirement,
    /// metrics mandatory.
    #[must_use]
    pub fn equity_conservative() -> Self {
        Self {
            profile: "equity_conservative".to_string(),
            liquidity: LiquidityGateConfig {
                require_micro_metrics: true,
                warn_spread_pct: Decimal::new(2, 3),          // 0.2%
                max_spread_pct: Decimal::new(5, 3),           // 0.5%
                warn_slippage_pct: Decimal::new(15, 4),       // 0.15%
                max_slippage_pct: Decimal::new(4, 3),         // 0.4%
                min_book_depth_multiple: Decimal::from(10),
                max_order_to_adv_pct: Decimal::new(2, 2),     // 2%
                ..LiquidityGateConfig::default()
            },
            ..Self::default()
        }
    }

    /// Moderate crypto profile: wider spreads tolerated, shallower book.
    #[must_use]
    pub fn crypto_moderate() -> Self {
        Self {
            profile: "crypto_moderate".to_string(),
            liquidity: LiquidityGateConfig {
                warn_spread_pct: Decimal::new(1, 2),          // 1%
                max_spread_pct: Decimal::new(2, 2),           // 2%
                warn_slippage_pct: Decimal::new(5, 3),        // 0.5%
                max_slippage_pct: Decimal::new(12, 3),        // 1.2%
                min_book_depth_multiple: Decimal::from(3),
                max_order_to_adv_pct: Decimal::new(1, 1),     // 10%
                ..LiquidityGateConfig::default()
            },
            ..Self::default()
        }
    }

    /// Load from a TOML file; unknown or malformed keys fail fast.
    pub fn from_file(path: impl AsRef<Path>) -> RiskResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| RiskError::Config(format!("Failed to read config: {e}")))?;
        Self::from_toml_str(&content)
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(content: &str) -> RiskResult<Self> {
        toml::from_str(content).map_err(|e| RiskError::Config(format!("Failed to parse config: {e}")))
    }
}

fn default_enabled() -> bool {
    true
}

fn default_significance() -> f64 {
    0.05
}

fn default_warn_stress_loss() -> Money {
    Money::from_minor(50_000_00) // $50k
}

fn default_max_stress_loss() -> Money {
    Money::from_minor(250_000_00) // $250k
}

fn default_warn_spread_pct() -> Decimal {
    Decimal::new(5, 3) // 0.5%
}

fn default_max_spread_pct() -> Decimal {
    Decimal::new(1, 2) // 1%
}

fn default_warn_slippage_pct() -> Decimal {
    Decimal::new(3, 3) // 0.3%
}

fn default_max_slippage_pct() -> Decimal {
    Decimal::new(8, 3) // 0.8%
}

fn default_min_book_depth_multiple() -> Decimal {
    Decimal::from(5)
}

fn default_max_order_to_adv_pct() -> Decimal {
    Decimal::new(5, 2) // 5%
}

fn default_market_order_strictness() -> Decimal {
    Decimal::new(7, 1) // 0.7 = 30% tighter
}

fn default_min_order_notional() -> Money {
    Money::from_minor(1_00) // $1
}

fn default_max_order_notional() -> Money {
    Money::from_minor(10_000_000_00) // $10m
}
