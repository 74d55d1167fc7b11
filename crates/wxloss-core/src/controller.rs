//! Scheduler-facing weather control
//!
//! The controller carries no state. It is the entry point a discrete-event
//! scheduler calls, at a given virtual time, to change the weather of a stage
//! it does not own. Calls take effect immediately; ordering in virtual time is
//! the scheduler's job.

use crate::weather::{WeatherHandle, WeatherUpdate};
use tracing::debug;

/// Virtual time in seconds, as maintained by the scheduler
pub type SimTime = f64;

/// Stateless weather mutation capability
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherController;

impl WeatherController {
    pub fn new() -> Self {
        Self
    }

    /// Apply a weather code to one stage at virtual time `at`
    pub fn set_weather(&self, handle: &WeatherHandle, value: i64, at: SimTime) -> WeatherUpdate {
        let update = handle.set(value);
        match update {
            WeatherUpdate::Applied(weather) => {
                debug!(at_s = at, %weather, "weather changed");
            }
            WeatherUpdate::Ignored { requested } => {
                debug!(at_s = at, requested, "weather change ignored");
            }
        }
        update
    }

    /// Apply the same weather code to several stages
    pub fn set_all(&self, handles: &[WeatherHandle], value: i64, at: SimTime) -> Vec<WeatherUpdate> {
        handles
            .iter()
            .map(|handle| self.set_weather(handle, value, at))
            .collect()
    }
}
