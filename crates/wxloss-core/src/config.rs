//! # Configuration
//!
//! YAML description of a loss pipeline, its logging and an optional weather
//! timeline.
//!
//! ## Configuration Search Path
//!
//! Configuration is loaded from the first file found:
//! 1. Path specified via `WXLOSS_CONFIG` environment variable
//! 2. `./wxloss.yaml` (current directory)
//! 3. `~/.config/wxloss/config.yaml` (user config)
//! 4. `/etc/wxloss/config.yaml` (system config)
//!
//! ## Example Configuration
//!
//! ```yaml
//! logging:
//!   level: debug
//!
//! pipeline:
//!   stages:
//!     - type: log_distance
//!       exponent: 3.0
//!     - type: weathered_friis
//!       frequency_hz: 5.15e9
//!       min_loss_db: 0.0
//!       weather: 0
//!
//! weather_schedule:
//!   - { at_s: 6.0, weather: 1 }
//!   - { at_s: 9.0, weather: 2 }
//! ```

use crate::building::{Building, ExternalWallStage};
use crate::error::LossError;
use crate::friis::{FriisConfig, WeatheredFriisStage};
use crate::log_distance::{LogDistanceConfig, LogDistanceStage};
use crate::observe::LogConfig;
use crate::pipeline::LossPipeline;
use crate::stage::LossStage;
use crate::weather::Weather;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "WXLOSS_CONFIG";

/// Error type for configuration operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {0}")]
    NotFound(String),

    #[error("failed to read config: {0}")]
    Read(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Validation(String),
}

impl From<LossError> for ConfigError {
    fn from(e: LossError) -> Self {
        ConfigError::Validation(e.to_string())
    }
}

/// One stage of the pipeline, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageConfig {
    WeatheredFriis(FriisConfig),
    LogDistance(LogDistanceConfig),
    ExternalWall(Building),
}

impl StageConfig {
    pub fn validate(&self) -> Result<(), LossError> {
        match self {
            StageConfig::WeatheredFriis(c) => c.validate(),
            StageConfig::LogDistance(c) => c.validate(),
            StageConfig::ExternalWall(b) => b.validate(),
        }
    }

    pub fn build(&self) -> Result<Box<dyn LossStage>, LossError> {
        Ok(match self {
            StageConfig::WeatheredFriis(c) => Box::new(WeatheredFriisStage::new(*c)?),
            StageConfig::LogDistance(c) => Box::new(LogDistanceStage::new(*c)?),
            StageConfig::ExternalWall(b) => Box::new(ExternalWallStage::new(*b)?),
        })
    }
}

/// Ordered stage list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub stages: Vec<StageConfig>,
}

impl Default for PipelineConfig {
    /// Log-distance front stage followed by the weathered Friis stage
    fn default() -> Self {
        Self {
            stages: vec![
                StageConfig::LogDistance(LogDistanceConfig::default()),
                StageConfig::WeatheredFriis(FriisConfig::default()),
            ],
        }
    }
}

impl PipelineConfig {
    pub fn build(&self) -> Result<LossPipeline, LossError> {
        let mut pipeline = LossPipeline::new();
        for stage in &self.stages {
            pipeline.append_boxed(stage.build()?);
        }
        Ok(pipeline)
    }
}

/// A weather change at a virtual time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherChange {
    /// Virtual time in seconds
    pub at_s: f64,
    /// Weather code (0 clear, 1 rain, 2 snow)
    pub weather: i64,
}

impl WeatherChange {
    pub fn new(at_s: f64, weather: Weather) -> Self {
        Self {
            at_s,
            weather: weather.value(),
        }
    }
}

/// Complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WxlossConfig {
    pub version: String,
    pub logging: LogConfig,
    pub pipeline: PipelineConfig,
    pub weather_schedule: Vec<WeatherChange>,
}

impl Default for WxlossConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            logging: LogConfig::default(),
            pipeline: PipelineConfig::default(),
            weather_schedule: Vec::new(),
        }
    }
}

impl WxlossConfig {
    /// Load configuration from the default search path.
    ///
    /// Returns default config if no file is found.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            return Self::load_from(&path);
        }

        for path in Self::config_search_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_yaml()?;
        std::fs::write(path, content)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Get configuration search paths.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./wxloss.yaml")];

        if let Some(dirs) = directories::ProjectDirs::from("", "", "wxloss") {
            paths.push(dirs.config_dir().join("config.yaml"));
        }

        paths.push(PathBuf::from("/etc/wxloss/config.yaml"));
        paths
    }

    /// Validate every stage and schedule entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, stage) in self.pipeline.stages.iter().enumerate() {
            stage
                .validate()
                .map_err(|e| ConfigError::Validation(format!("stage {}: {}", i, e)))?;
        }

        for change in &self.weather_schedule {
            if !(change.at_s >= 0.0) || !change.at_s.is_finite() {
                return Err(ConfigError::Validation(format!(
                    "weather change time must be >= 0, got {}",
                    change.at_s
                )));
            }
            if Weather::from_value(change.weather).is_none() {
                return Err(ConfigError::Validation(format!(
                    "weather change at {} s has unknown code {}",
                    change.at_s, change.weather
                )));
            }
        }

        Ok(())
    }

    /// Build the configured pipeline.
    pub fn build_pipeline(&self) -> Result<LossPipeline, ConfigError> {
        Ok(self.pipeline.build()?)
    }

    /// Example configuration reproducing the alternating rain/snow run.
    pub fn example_yaml() -> String {
        let config = Self {
            weather_schedule: vec![
                WeatherChange::new(3.0, Weather::Clear),
                WeatherChange::new(6.0, Weather::Rain),
                WeatherChange::new(9.0, Weather::Snow),
                WeatherChange::new(12.0, Weather::Rain),
                WeatherChange::new(15.0, Weather::Snow),
                WeatherChange::new(18.0, Weather::Rain),
                WeatherChange::new(21.0, Weather::Clear),
            ],
            ..Default::default()
        };

        serde_yaml::to_string(&config).unwrap_or_default()
    }
}
