//! # wxloss core
//!
//! Composable propagation-loss models for discrete-event network simulation.
//!
//! A [`LossPipeline`] threads a transmit power through an ordered chain of
//! [`LossStage`]s and returns the received power for two endpoint positions.
//! The [`WeatheredFriisStage`] adds a Clear/Rain/Snow offset on top of
//! free-space loss; its weather is changed at runtime through a
//! [`WeatherHandle`] by the [`WeatherController`], which the surrounding
//! scheduler calls at the right virtual times.
//!
//! ## Signal Flow
//!
//! ```text
//! tx dBm ─► log-distance ─► weathered Friis ─► building wall ─► rx dBm
//!                                 ▲
//!               WeatherController ┘  (set at virtual time T)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use wxloss_core::prelude::*;
//!
//! let pipeline = LossPipeline::new()
//!     .with_stage(WeatheredFriisStage::new(FriisConfig::default()).unwrap());
//! let weather = pipeline.weather_handles().remove(0);
//!
//! let a = Position::origin();
//! let b = Position::new(100.0, 0.0, 0.0);
//! let clear = pipeline.evaluate(16.0, &a, &b).unwrap();
//!
//! WeatherController::new().set_weather(&weather, 1, 6.0);
//! let rain = pipeline.evaluate(16.0, &a, &b).unwrap();
//! assert!((clear - rain - 5.0).abs() < 1e-9);
//! ```

pub mod building;
pub mod config;
pub mod controller;
pub mod coordinates;
pub mod error;
pub mod friis;
pub mod log_distance;
pub mod observe;
pub mod pipeline;
pub mod stage;
pub mod weather;

pub use controller::{SimTime, WeatherController};
pub use coordinates::Position;
pub use error::{LossError, LossResult};
pub use friis::{FriisConfig, WeatheredFriisStage};
pub use pipeline::LossPipeline;
pub use stage::LossStage;
pub use weather::{Weather, WeatherHandle, WeatherUpdate};

/// Prelude for common imports
pub mod prelude {
    pub use crate::building::{Building, ExternalWallStage, WallType};
    pub use crate::config::{WeatherChange, WxlossConfig};
    pub use crate::controller::{SimTime, WeatherController};
    pub use crate::coordinates::{Position, SPEED_OF_LIGHT};
    pub use crate::error::{LossError, LossResult};
    pub use crate::friis::{FriisConfig, WeatheredFriisStage};
    pub use crate::log_distance::{LogDistanceConfig, LogDistanceStage};
    pub use crate::pipeline::LossPipeline;
    pub use crate::stage::LossStage;
    pub use crate::weather::{Weather, WeatherHandle, WeatherUpdate};
}
