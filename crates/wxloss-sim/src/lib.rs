//! # wxloss simulation harness
//!
//! The scheduler side of a weather-aware loss pipeline: a virtual-time
//! [`WeatherSchedule`] that fires weather changes through the stateless
//! controller, endpoint [`Trajectory`] models, and a [`ScenarioEngine`] that
//! probes received power between two endpoints over time.
//!
//! ```text
//! ┌──────────────────────────── ScenarioEngine ───────────────────────────┐
//! │  t = start, start + dt, ...                                           │
//! │    1. WeatherSchedule::advance_to(t) ──► WeatherController ──► handle │
//! │    2. Trajectory::position_at(t) for both endpoints                   │
//! │    3. LossPipeline::evaluate(tx, a, b) ──► RssiSample                 │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod scenario;
pub mod schedule;

pub use error::{SimError, SimResult};
pub use scenario::{Endpoint, RssiSample, ScenarioConfig, ScenarioEngine, Trajectory};
pub use schedule::{Target, WeatherSchedule};
