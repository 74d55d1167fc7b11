//! Positions and power-unit helpers
//!
//! Endpoints are placed in a local Cartesian frame measured in metres. The
//! mobility side of a simulation owns these values and hands them to the
//! loss pipeline on every evaluation; nothing in this crate keeps them.

use serde::{Deserialize, Serialize};

/// Speed of light in vacuum, m/s
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Point in the local Cartesian frame, metres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::default()
    }

    /// Euclidean distance to another position in metres
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Offset this position by a displacement vector
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Linear interpolation towards `other`; `frac` of 0 is `self`, 1 is `other`
    pub fn lerp(&self, other: &Position, frac: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * frac,
            self.y + (other.y - self.y) * frac,
            self.z + (other.z - self.z) * frac,
        )
    }
}

/// Wavelength in metres for a carrier frequency in Hz
pub fn wavelength_m(frequency_hz: f64) -> f64 {
    SPEED_OF_LIGHT / frequency_hz
}
