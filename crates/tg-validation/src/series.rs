//! Return/VaR observation series and breach indicator extraction.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// One day's observation: realized return and the VaR estimate that was in
/// force for that day (both as fractions, VaR quoted positive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarObservation {
    pub actual_return: f64,
    pub var_estimate: f64,
}

impl VarObservation {
    /// A breach occurs when the realized loss exceeds the VaR estimate.
    pub fn is_breach(&self) -> bool {
        self.actual_return < -self.var_estimate
    }
}

/// A fixed-length series of observations at one confidence level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarSeries {
    confidence: f64,
    observations: Vec<VarObservation>,
}

impl VarSeries {
    /// Build a series, validating the confidence level and rejecting
    /// non-finite values (a NaN here would silently corrupt every statistic
    /// downstream).
    pub fn new(confidence: f64, observations: Vec<VarObservation>) -> ValidationResult<Self> {
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(ValidationError::InvalidConfidence(confidence));
        }
        for (i, obs) in observations.iter().enumerate() {
            if !obs.actual_return.is_finite() || !obs.var_estimate.is_finite() {
                return Err(ValidationError::NonFiniteValue(i));
            }
        }
        Ok(Self {
            confidence,
            observations,
        })
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Expected breach probability under a correct model: 1 - confidence.
    pub fn expected_breach_rate(&self) -> f64 {
        1.0 - self.confidence
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[VarObservation] {
        &self.observations
    }

    /// 0/1 breach indicator sequence, in series order.
    pub fn breach_indicators(&self) -> Vec<bool> {
        self.observations.iter().map(VarObservation::is_breach).collect()
    }

    pub fn breach_count(&self) -> usize {
        self.observations.iter().filter(|o| o.is_breach()).count()
    }
}
