//! Cascaded loss pipeline
//!
//! A [`LossPipeline`] owns an ordered list of stages. Evaluation feeds the
//! received power of each stage into the next one as its transmit power:
//!
//! ```text
//! tx ──► stage 0 ──► stage 1 ──► ... ──► stage n-1 ──► rx
//! ```
//!
//! Stages can only be appended. Once the pipeline is handed to a channel its
//! structure stays fixed; weather is the only thing that changes during a run.
//!
//! ## Usage
//!
//! ```rust
//! use wxloss_core::coordinates::Position;
//! use wxloss_core::friis::{FriisConfig, WeatheredFriisStage};
//! use wxloss_core::log_distance::{LogDistanceConfig, LogDistanceStage};
//! use wxloss_core::pipeline::LossPipeline;
//!
//! let mut pipeline = LossPipeline::new();
//! pipeline.append(LogDistanceStage::new(LogDistanceConfig::default()).unwrap());
//! pipeline.append(WeatheredFriisStage::new(FriisConfig::default()).unwrap());
//!
//! let rx = pipeline
//!     .evaluate(16.0, &Position::origin(), &Position::new(0.5, 0.0, 0.0))
//!     .unwrap();
//! assert!(rx < 16.0);
//! assert_eq!(pipeline.weather_handles().len(), 1);
//! ```

use crate::coordinates::Position;
use crate::error::LossResult;
use crate::stage::LossStage;
use crate::weather::WeatherHandle;
use std::fmt;

/// Ordered chain of loss stages
#[derive(Default)]
pub struct LossPipeline {
    stages: Vec<Box<dyn LossStage>>,
}

impl LossPipeline {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Builder-style append
    pub fn with_stage(mut self, stage: impl LossStage + 'static) -> Self {
        self.append(stage);
        self
    }

    /// Add a stage to the end of the chain
    pub fn append(&mut self, stage: impl LossStage + 'static) {
        self.stages.push(Box::new(stage));
    }

    /// Add an already boxed stage to the end of the chain
    pub fn append_boxed(&mut self, stage: Box<dyn LossStage>) {
        self.stages.push(stage);
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in evaluation order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Weather handles of every weathered stage, in stage order
    pub fn weather_handles(&self) -> Vec<WeatherHandle> {
        self.stages.iter().filter_map(|s| s.weather_handle()).collect()
    }

    /// Received power after the last stage
    pub fn evaluate(&self, tx_power_dbm: f64, a: &Position, b: &Position) -> LossResult<f64> {
        self.stages
            .iter()
            .try_fold(tx_power_dbm, |power, stage| stage.evaluate(power, a, b))
    }

    /// Power after each stage; the last element equals [`evaluate`](Self::evaluate)
    pub fn evaluate_trace(&self, tx_power_dbm: f64, a: &Position, b: &Position) -> LossResult<Vec<f64>> {
        let mut trace = Vec::with_capacity(self.stages.len());
        let mut power = tx_power_dbm;
        for stage in &self.stages {
            power = stage.evaluate(power, a, b)?;
            trace.push(power);
        }
        Ok(trace)
    }
}

impl fmt::Debug for LossPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LossPipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
