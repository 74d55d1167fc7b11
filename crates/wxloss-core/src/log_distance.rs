//! Log-distance path loss stage
//!
//! ```text
//! L = L0 + 10 n log10(d / d0)      for d > d0
//! L = L0                           for d <= d0
//! ```
//!
//! The defaults (n = 3, d0 = 1 m, L0 = 46.6777 dB) are the usual Wi-Fi
//! channel front stage, where L0 is the Friis loss at 1 m for 5.15 GHz.

use crate::coordinates::Position;
use crate::error::{LossError, LossResult};
use crate::stage::LossStage;
use serde::{Deserialize, Serialize};

/// Parameters for [`LogDistanceStage`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogDistanceConfig {
    /// Path-loss exponent
    pub exponent: f64,
    /// Reference distance in metres
    pub reference_distance_m: f64,
    /// Loss at the reference distance in dB
    pub reference_loss_db: f64,
}

impl Default for LogDistanceConfig {
    fn default() -> Self {
        Self {
            exponent: 3.0,
            reference_distance_m: 1.0,
            reference_loss_db: 46.6777,
        }
    }
}

impl LogDistanceConfig {
    pub fn validate(&self) -> LossResult<()> {
        if !self.exponent.is_finite() || self.exponent < 0.0 {
            return Err(LossError::invalid(format!(
                "exponent must be a non-negative number, got {}",
                self.exponent
            )));
        }
        if !(self.reference_distance_m > 0.0) || !self.reference_distance_m.is_finite() {
            return Err(LossError::invalid(format!(
                "reference_distance_m must be positive, got {}",
                self.reference_distance_m
            )));
        }
        if !(self.reference_loss_db >= 0.0) || !self.reference_loss_db.is_finite() {
            return Err(LossError::invalid(format!(
                "reference_loss_db must be >= 0, got {}",
                self.reference_loss_db
            )));
        }
        Ok(())
    }
}

/// Log-distance loss stage
#[derive(Debug, Clone)]
pub struct LogDistanceStage {
    config: LogDistanceConfig,
}

impl LogDistanceStage {
    pub fn new(config: LogDistanceConfig) -> LossResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LogDistanceConfig {
        &self.config
    }

    /// Total loss in dB at a distance
    pub fn loss_db(&self, distance_m: f64) -> f64 {
        let c = &self.config;
        if distance_m <= c.reference_distance_m {
            return c.reference_loss_db;
        }
        c.reference_loss_db + 10.0 * c.exponent * (distance_m / c.reference_distance_m).log10()
    }
}

impl LossStage for LogDistanceStage {
    fn name(&self) -> &str {
        "log_distance"
    }

    fn evaluate(&self, tx_power_dbm: f64, a: &Position, b: &Position) -> LossResult<f64> {
        Ok(tx_power_dbm - self.loss_db(a.distance_to(b)))
    }
}
