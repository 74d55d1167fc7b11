//! Scenario configuration
//!
//! Timing and power parameters for a periodic signal-strength probe between
//! two endpoints.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};

/// Largest probe count whose indices are still exact in `f64`
pub const MAX_PROBES: u64 = 1 << 53;

/// Configuration for the scenario engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Scenario end in virtual seconds (exclusive)
    pub duration_s: f64,
    /// Virtual time of the first probe
    pub probe_start_s: f64,
    /// Interval between probes in seconds
    pub probe_interval_s: f64,
    /// Transmit power in dBm
    pub tx_power_dbm: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            duration_s: 30.0,
            probe_start_s: 2.0,  // client starts at 2 s
            probe_interval_s: 1.0,
            tx_power_dbm: 16.0206, // 40 mW, common Wi-Fi PHY default
        }
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> SimResult<()> {
        if !(self.probe_interval_s > 0.0) || !self.probe_interval_s.is_finite() {
            return Err(SimError::InvalidScenario(format!(
                "probe_interval_s must be positive, got {}",
                self.probe_interval_s
            )));
        }
        if !(self.probe_start_s >= 0.0) || !(self.duration_s >= 0.0) {
            return Err(SimError::InvalidScenario(format!(
                "times must be >= 0, got start {} and duration {}",
                self.probe_start_s, self.duration_s
            )));
        }
        if !self.duration_s.is_finite() || !self.tx_power_dbm.is_finite() {
            return Err(SimError::InvalidScenario(
                "duration_s and tx_power_dbm must be finite".to_string(),
            ));
        }
        let span = (self.duration_s - self.probe_start_s).max(0.0);
        if span / self.probe_interval_s > MAX_PROBES as f64 {
            return Err(SimError::InvalidScenario(format!(
                "{} s at {} s intervals exceeds {} probes",
                span, self.probe_interval_s, MAX_PROBES
            )));
        }
        Ok(())
    }

    /// Virtual time of probe `index`
    pub fn probe_time(&self, index: u64) -> f64 {
        self.probe_start_s + index as f64 * self.probe_interval_s
    }

    /// Number of probes before `duration_s`
    pub fn num_probes(&self) -> u64 {
        if self.probe_start_s >= self.duration_s {
            return 0;
        }
        ((self.duration_s - self.probe_start_s) / self.probe_interval_s).ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ScenarioConfig::default();
        assert!(cfg.validate().is_ok());
        // Probes at 2, 3, ..., 29
        assert_eq!(cfg.num_probes(), 28);
        assert_eq!(cfg.probe_time(0), 2.0);
        assert_eq!(cfg.probe_time(27), 29.0);
    }

    #[test]
    fn test_invalid_interval() {
        let cfg = ScenarioConfig {
            probe_interval_s: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_no_probes_when_start_after_end() {
        let cfg = ScenarioConfig {
            probe_start_s: 40.0,
            ..Default::default()
        };
        assert_eq!(cfg.num_probes(), 0);
    }

    #[test]
    fn test_probe_count_must_fit() {
        let cfg = ScenarioConfig {
            duration_s: 1e300,
            probe_interval_s: 1.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ScenarioConfig {
            duration_s: 1e9,
            probe_start_s: 0.0,
            probe_interval_s: 1e-6,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
        assert!(cfg.num_probes() <= MAX_PROBES);
    }
}
