//! Weathered free-space (Friis) loss stage
//!
//! Friis transmission equation with transmitter and receiver gains ignored,
//! expressed in dB:
//!
//! ```text
//!                          lambda^2
//! rx = tx + 10 log10 ( ------------------ ) - weather
//!                      (4 pi d)^2 * L
//! ```
//!
//! - `d`: distance between endpoints (m)
//! - `L`: system loss (unitless, >= 1)
//! - `lambda`: carrier wavelength (m)
//! - `weather`: 0 dB clear, 5 dB rain, 10 dB snow
//!
//! The geometric term is floored at `min_loss_db` before the weather offset is
//! subtracted, so the floor does not bound the total attenuation.
//!
//! ## Usage
//!
//! ```rust
//! use wxloss_core::coordinates::Position;
//! use wxloss_core::friis::{FriisConfig, WeatheredFriisStage};
//! use wxloss_core::stage::LossStage;
//!
//! let stage = WeatheredFriisStage::new(FriisConfig::default()).unwrap();
//! stage.set_weather(1); // rain
//!
//! let rx = stage
//!     .evaluate(16.0, &Position::origin(), &Position::new(100.0, 0.0, 0.0))
//!     .unwrap();
//! assert!(rx < 16.0 - 80.0);
//! ```

use crate::coordinates::{wavelength_m, Position};
use crate::error::{LossError, LossResult};
use crate::stage::LossStage;
use crate::weather::{Weather, WeatherHandle, WeatherUpdate};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

/// Default carrier frequency, 5.15 GHz
pub const DEFAULT_FREQUENCY_HZ: f64 = 5.150e9;

/// Far-field boundary in wavelengths
const FAR_FIELD_WAVELENGTHS: f64 = 3.0;

/// Construction parameters for [`WeatheredFriisStage`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FriisConfig {
    /// Carrier frequency in Hz
    pub frequency_hz: f64,
    /// System loss factor (unitless)
    pub system_loss: f64,
    /// Minimum geometric loss in dB, used at short ranges
    pub min_loss_db: f64,
    /// Initial weather code (0 clear, 1 rain, 2 snow)
    pub weather: i64,
}

impl Default for FriisConfig {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            system_loss: 1.0,
            min_loss_db: 0.0,
            weather: 0,
        }
    }
}

impl FriisConfig {
    pub fn with_frequency(frequency_hz: f64) -> Self {
        Self {
            frequency_hz,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> LossResult<()> {
        validate_frequency(self.frequency_hz)?;
        if !(self.system_loss >= 1.0) || !self.system_loss.is_finite() {
            return Err(LossError::invalid(format!(
                "system_loss must be >= 1, got {}",
                self.system_loss
            )));
        }
        if !(self.min_loss_db >= 0.0) || !self.min_loss_db.is_finite() {
            return Err(LossError::invalid(format!(
                "min_loss_db must be >= 0, got {}",
                self.min_loss_db
            )));
        }
        if Weather::from_value(self.weather).is_none() {
            return Err(LossError::invalid(format!(
                "weather must be 0, 1 or 2, got {}",
                self.weather
            )));
        }
        Ok(())
    }
}

fn validate_frequency(frequency_hz: f64) -> LossResult<()> {
    if frequency_hz > 0.0 && frequency_hz.is_finite() {
        Ok(())
    } else {
        Err(LossError::invalid(format!(
            "frequency must be positive, got {} Hz",
            frequency_hz
        )))
    }
}

/// Friis free-space loss with a weather-dependent offset
#[derive(Debug)]
pub struct WeatheredFriisStage {
    frequency_hz: f64,
    /// Always `SPEED_OF_LIGHT / frequency_hz`
    wavelength_m: f64,
    system_loss: f64,
    min_loss_db: f64,
    weather: WeatherHandle,
}

impl WeatheredFriisStage {
    /// Create a stage, rejecting out-of-range parameters
    pub fn new(config: FriisConfig) -> LossResult<Self> {
        config.validate()?;
        let initial = Weather::from_value(config.weather).unwrap_or_default();
        Ok(Self {
            frequency_hz: config.frequency_hz,
            wavelength_m: wavelength_m(config.frequency_hz),
            system_loss: config.system_loss,
            min_loss_db: config.min_loss_db,
            weather: WeatherHandle::new(initial),
        })
    }

    /// Change the carrier frequency and recompute the wavelength
    ///
    /// A non-positive frequency is rejected and the stage is left unchanged.
    pub fn set_frequency(&mut self, frequency_hz: f64) -> LossResult<()> {
        validate_frequency(frequency_hz)?;
        self.frequency_hz = frequency_hz;
        self.wavelength_m = wavelength_m(frequency_hz);
        Ok(())
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn wavelength_m(&self) -> f64 {
        self.wavelength_m
    }

    pub fn system_loss(&self) -> f64 {
        self.system_loss
    }

    pub fn min_loss_db(&self) -> f64 {
        self.min_loss_db
    }

    /// Request a weather code; anything outside 0..=2 is ignored
    pub fn set_weather(&self, value: i64) -> WeatherUpdate {
        let update = self.weather.set(value);
        if let WeatherUpdate::Ignored { requested } = update {
            debug!(requested, "ignoring unknown weather code");
        }
        update
    }

    pub fn weather(&self) -> LossResult<Weather> {
        self.weather.get()
    }

    /// Geometric Friis loss in dB for a positive distance, before the floor
    pub fn geometric_loss_db(&self, distance_m: f64) -> f64 {
        let numerator = self.wavelength_m * self.wavelength_m;
        let denominator = 16.0 * PI * PI * distance_m * distance_m * self.system_loss;
        -10.0 * (numerator / denominator).log10()
    }
}

impl LossStage for WeatheredFriisStage {
    fn name(&self) -> &str {
        "weathered_friis"
    }

    fn evaluate(&self, tx_power_dbm: f64, a: &Position, b: &Position) -> LossResult<f64> {
        let weather = self.weather.get()?;
        let distance = a.distance_to(b);
        if distance <= 0.0 {
            return Ok(tx_power_dbm - self.min_loss_db);
        }
        if distance < FAR_FIELD_WAVELENGTHS * self.wavelength_m {
            warn!(
                distance_m = distance,
                wavelength_m = self.wavelength_m,
                "distance not within the far field region, propagation loss is inaccurate"
            );
        }

        let loss_db = self.geometric_loss_db(distance).max(self.min_loss_db);
        Ok(tx_power_dbm - loss_db - weather.offset_db())
    }

    fn weather_handle(&self) -> Option<WeatherHandle> {
        Some(self.weather.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::SPEED_OF_LIGHT;

    fn at(d: f64) -> Position {
        Position::new(d, 0.0, 0.0)
    }

    fn stage() -> WeatheredFriisStage {
        WeatheredFriisStage::new(FriisConfig::default()).unwrap()
    }

    #[test]
    fn test_wavelength_follows_frequency() {
        let mut s = stage();
        assert!((s.wavelength_m() - 0.0582).abs() < 1e-4, "lambda = {}", s.wavelength_m());
        assert!((s.wavelength_m() - SPEED_OF_LIGHT / 5.15e9).abs() < 1e-15);

        s.set_frequency(2.4e9).unwrap();
        assert_eq!(s.frequency_hz(), 2.4e9);
        assert!((s.wavelength_m() - SPEED_OF_LIGHT / 2.4e9).abs() < 1e-15);
    }

    #[test]
    fn test_set_frequency_rejects_non_positive() {
        let mut s = stage();
        assert!(s.set_frequency(0.0).is_err());
        assert!(s.set_frequency(-1.0).is_err());
        assert!(s.set_frequency(f64::NAN).is_err());
        assert_eq!(s.frequency_hz(), DEFAULT_FREQUENCY_HZ);
        assert!((s.wavelength_m() - SPEED_OF_LIGHT / DEFAULT_FREQUENCY_HZ).abs() < 1e-15);
    }

    #[test]
    fn test_invalid_config() {
        let bad = [
            FriisConfig { frequency_hz: 0.0, ..Default::default() },
            FriisConfig { frequency_hz: -5.0, ..Default::default() },
            FriisConfig { system_loss: 0.5, ..Default::default() },
            FriisConfig { system_loss: f64::NAN, ..Default::default() },
            FriisConfig { min_loss_db: -1.0, ..Default::default() },
            FriisConfig { weather: 3, ..Default::default() },
            FriisConfig { weather: -1, ..Default::default() },
        ];
        for config in bad {
            assert!(
                matches!(WeatheredFriisStage::new(config), Err(LossError::InvalidConfig(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_zero_distance_returns_tx_minus_min_loss() {
        let s = WeatheredFriisStage::new(FriisConfig {
            min_loss_db: 12.5,
            weather: 2,
            ..Default::default()
        })
        .unwrap();
        let p = Position::new(1.0, 2.0, 3.0);
        assert_eq!(s.evaluate(20.0, &p, &p).unwrap(), 20.0 - 12.5);
    }

    #[test]
    fn test_closed_form_at_100m() {
        let s = stage();
        let lambda = SPEED_OF_LIGHT / 5.15e9;
        let expected_loss = -10.0 * (lambda * lambda / (16.0 * PI * PI * 100.0 * 100.0)).log10();
        let rx = s.evaluate(0.0, &Position::origin(), &at(100.0)).unwrap();
        assert!((rx + expected_loss).abs() < 1e-9, "rx = {}, loss = {}", rx, expected_loss);

        // Same value as the textbook FSPL form 20 log10(4 pi d f / c)
        let fspl = 20.0 * (4.0 * PI * 100.0 * 5.15e9 / SPEED_OF_LIGHT).log10();
        assert!((expected_loss - fspl).abs() < 1e-9);
        assert!((expected_loss - 86.68).abs() < 0.05, "loss = {}", expected_loss);
    }

    #[test]
    fn test_system_loss_adds_attenuation() {
        let s = WeatheredFriisStage::new(FriisConfig {
            system_loss: 10.0,
            ..Default::default()
        })
        .unwrap();
        let reference = stage();
        let a = Position::origin();
        let b = at(50.0);
        let diff = reference.evaluate(0.0, &a, &b).unwrap() - s.evaluate(0.0, &a, &b).unwrap();
        assert!((diff - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_in_distance() {
        let s = WeatheredFriisStage::new(FriisConfig {
            min_loss_db: 40.0,
            ..Default::default()
        })
        .unwrap();
        let mut last = f64::INFINITY;
        let mut d = 0.01;
        while d < 10_000.0 {
            let rx = s.evaluate(10.0, &Position::origin(), &at(d)).unwrap();
            assert!(rx <= last, "rx increased at d = {}", d);
            last = rx;
            d *= 1.3;
        }
        // Inside the floor region the value holds at tx - min_loss
        assert_eq!(s.evaluate(10.0, &Position::origin(), &at(0.05)).unwrap(), -30.0);
    }

    #[test]
    fn test_weather_offsets() {
        let s = stage();
        let a = Position::origin();
        let b = at(250.0);
        let clear = s.evaluate(15.0, &a, &b).unwrap();

        assert!(s.set_weather(1).is_applied());
        let rain = s.evaluate(15.0, &a, &b).unwrap();

        assert!(s.set_weather(2).is_applied());
        let snow = s.evaluate(15.0, &a, &b).unwrap();

        assert!((clear - rain - 5.0).abs() < 1e-12);
        assert!((clear - snow - 10.0).abs() < 1e-12);
        assert!(snow <= rain && rain <= clear);
    }

    #[test]
    fn test_invalid_weather_is_a_no_op() {
        let s = stage();
        let a = Position::origin();
        let b = at(80.0);
        s.set_weather(1);
        let rain = s.evaluate(0.0, &a, &b).unwrap();

        assert_eq!(s.set_weather(5), WeatherUpdate::Ignored { requested: 5 });
        assert_eq!(s.set_weather(-1), WeatherUpdate::Ignored { requested: -1 });
        assert_eq!(s.weather(), Ok(Weather::Rain));
        assert_eq!(s.evaluate(0.0, &a, &b).unwrap(), rain);
    }

    #[test]
    fn test_min_loss_floors_before_weather() {
        let s = WeatheredFriisStage::new(FriisConfig {
            min_loss_db: 100.0,
            weather: 2,
            ..Default::default()
        })
        .unwrap();
        // Geometric loss at 10 m is far below the floor; snow still adds 10 dB
        let rx = s.evaluate(0.0, &Position::origin(), &at(10.0)).unwrap();
        assert_eq!(rx, -110.0);
    }

    #[test]
    fn test_corrupt_weather_fails_loudly() {
        let s = stage();
        s.weather.store_raw(200);
        let result = s.evaluate(0.0, &Position::origin(), &at(10.0));
        assert!(matches!(result, Err(LossError::InternalInvariantViolation(_))));
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Evaluate at distance `d` and return what the stage logged at WARN
    fn warnings_at(d: f64) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            stage().evaluate(0.0, &Position::origin(), &at(d)).unwrap();
        });
        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_near_field_warning() {
        // 3 wavelengths at 5.15 GHz is about 0.175 m
        let near = warnings_at(0.1);
        assert!(near.contains("WARN"), "log: {:?}", near);
        assert!(near.contains("far field"), "log: {:?}", near);

        assert_eq!(warnings_at(0.0), "");
        assert_eq!(warnings_at(1.0), "");
    }

    #[test]
    fn test_handle_controls_stage() {
        let s = stage();
        let handle = s.weather_handle().unwrap();
        handle.store(Weather::Snow);
        assert_eq!(s.weather(), Ok(Weather::Snow));
    }
}
