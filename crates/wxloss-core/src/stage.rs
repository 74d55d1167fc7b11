//! Loss stage abstraction
//!
//! Every attenuation model implements [`LossStage`]. Stages are combined only
//! by placing them in a [`LossPipeline`](crate::pipeline::LossPipeline); there
//! is no inheritance between them.

use crate::coordinates::Position;
use crate::error::LossResult;
use crate::weather::WeatherHandle;

/// A single unit of propagation attenuation
pub trait LossStage: Send + Sync {
    /// Short identifier used in logs and traces
    fn name(&self) -> &str;

    /// Received power in dBm for a transmit power and two endpoint positions
    ///
    /// Must be deterministic for the current configuration and weather, and
    /// must not keep the positions.
    fn evaluate(&self, tx_power_dbm: f64, a: &Position, b: &Position) -> LossResult<f64>;

    /// Weather capability of this stage, if it reacts to weather
    fn weather_handle(&self) -> Option<WeatherHandle> {
        None
    }
}
