//! Two-endpoint probe scenarios
//!
//! Moves two endpoints along their trajectories, fires scheduled weather
//! changes, and samples the received power of a loss pipeline at a fixed
//! interval of virtual time.

pub mod config;
pub mod engine;
pub mod trajectory;

pub use config::ScenarioConfig;
pub use engine::{Endpoint, RssiSample, ScenarioEngine};
pub use trajectory::Trajectory;
