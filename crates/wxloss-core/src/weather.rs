//! Weather state shared between a loss stage and its scheduler
//!
//! A weathered stage reads its condition from a [`WeatherHandle`], a small
//! atomic cell behind an `Arc`. The stage keeps one clone and the scheduler
//! side keeps another, so the scheduler can change the weather of a stage
//! that the pipeline owns without holding a reference to the stage itself.
//!
//! Only the three [`Weather`] values are ever written. Out-of-range requests
//! are ignored and the last good value stays in effect.

use crate::error::{LossError, LossResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Weather condition applied on top of geometric path loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Clear,
    Rain,
    Snow,
}

impl Default for Weather {
    fn default() -> Self {
        Self::Clear
    }
}

impl Weather {
    pub const ALL: [Weather; 3] = [Weather::Clear, Weather::Rain, Weather::Snow];

    /// Map an external integer code (0 clear, 1 rain, 2 snow)
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Weather::Clear),
            1 => Some(Weather::Rain),
            2 => Some(Weather::Snow),
            _ => None,
        }
    }

    /// Integer code of this condition
    pub fn value(self) -> i64 {
        match self {
            Weather::Clear => 0,
            Weather::Rain => 1,
            Weather::Snow => 2,
        }
    }

    /// Extra attenuation in dB
    pub fn offset_db(self) -> f64 {
        match self {
            Weather::Clear => 0.0,
            Weather::Rain => 5.0,
            Weather::Snow => 10.0,
        }
    }

    fn to_raw(self) -> u8 {
        self.value() as u8
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weather::Clear => write!(f, "clear"),
            Weather::Rain => write!(f, "rain"),
            Weather::Snow => write!(f, "snow"),
        }
    }
}

/// Outcome of a weather mutation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherUpdate {
    /// The new condition is now in effect
    Applied(Weather),
    /// The requested code was not a known condition; state is unchanged
    Ignored { requested: i64 },
}

impl WeatherUpdate {
    pub fn is_applied(&self) -> bool {
        matches!(self, WeatherUpdate::Applied(_))
    }
}

/// Shared, thread-safe weather cell
#[derive(Debug, Clone)]
pub struct WeatherHandle {
    cell: Arc<AtomicU8>,
}

impl WeatherHandle {
    pub fn new(initial: Weather) -> Self {
        Self {
            cell: Arc::new(AtomicU8::new(initial.to_raw())),
        }
    }

    /// Current condition
    ///
    /// Fails with [`LossError::InternalInvariantViolation`] if the cell holds a
    /// value that is not a known condition.
    pub fn get(&self) -> LossResult<Weather> {
        let raw = self.cell.load(Ordering::Acquire);
        Weather::from_value(i64::from(raw)).ok_or_else(|| {
            LossError::InternalInvariantViolation(format!("weather cell holds unknown value {}", raw))
        })
    }

    /// Request a condition by integer code; unknown codes are ignored
    pub fn set(&self, value: i64) -> WeatherUpdate {
        match Weather::from_value(value) {
            Some(weather) => {
                self.store(weather);
                WeatherUpdate::Applied(weather)
            }
            None => WeatherUpdate::Ignored { requested: value },
        }
    }

    pub fn store(&self, weather: Weather) {
        self.cell.store(weather.to_raw(), Ordering::Release);
    }

    /// Whether two handles refer to the same stage's weather
    pub fn same_cell(&self, other: &WeatherHandle) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    #[cfg(test)]
    pub(crate) fn store_raw(&self, raw: u8) {
        self.cell.store(raw, Ordering::Release);
    }
}

impl Default for WeatherHandle {
    fn default() -> Self {
        Self::new(Weather::Clear)
    }
}
