//! Kill switch latch.
//!
//! Once triggered, stays triggered (with the original reason preserved)
//! until explicitly reset by an operator. The orchestrator checks it first
//! on every evaluation; an active switch is authoritative and
//! non-overridable.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::RwLock;
use tracing::{error, warn};

use tg_core::Money;

/// Reason the kill switch was pulled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillSwitchReason {
    /// Manual trigger by operator.
    Manual { message: String },
    /// Loss limit breached (minor units).
    LossLimit { loss: Money },
    /// Data integrity problem detected downstream.
    DataIntegrity { detail: String },
}

impl std::fmt::Display for KillSwitchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual { message } => write!(f, "Manual: {message}"),
            Self::LossLimit { loss } => write!(f, "Loss limit breached: {loss}"),
            Self::DataIntegrity { detail } => write!(f, "Data integrity: {detail}"),
        }
    }
}

/// Emergency stop latch, shareable via `Arc<KillSwitch>`.
pub struct KillSwitch {
    triggered: AtomicBool,
    /// Unix ms when triggered (0 = never).
    triggered_at: AtomicU64,
    reason: RwLock<Option<KillSwitchReason>>,
}

impl Default for KillSwitch {
    fn default() -> Self {
        Self::new()
    }
}

impl KillSwitch {
    /// Create a new latch in the inactive state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            triggered: AtomicBool::new(false),
            triggered_at: AtomicU64::new(0),
            reason: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Trigger the latch. If already active this is a no-op and the original
    /// reason is kept.
    pub fn trigger(&self, reason: KillSwitchReason) {
        if self
            .triggered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let now = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_millis() as u64);
            self.triggered_at.store(now, Ordering::SeqCst);
            *self.reason.write() = Some(reason.clone());
            error!(reason = %reason, "KILL SWITCH TRIGGERED");
        } else {
            warn!(new_reason = %reason, "kill switch already active, ignoring new trigger");
        }
    }

    /// Unix ms when the latch was triggered, if it has been.
    pub fn triggered_at_ms(&self) -> Option<u64> {
        match self.triggered_at.load(Ordering::SeqCst) {
            0 => None,
            t => Some(t),
        }
    }

    pub fn reason(&self) -> Option<KillSwitchReason> {
        self.reason.read().clone()
    }

    /// Operator reset. Clears the reason and re-arms the latch.
    pub fn reset(&self) {
        self.triggered.store(false, Ordering::SeqCst);
        self.triggered_at.store(0, Ordering::SeqCst);
        *self.reason.write() = None;
        warn!("kill switch reset");
    }
}
