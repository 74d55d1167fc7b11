//! Scenario engine: periodic received-power probes over virtual time
//!
//! At every probe time the engine first fires due weather changes, then reads
//! both endpoint positions and evaluates the pipeline. This is the ordering
//! the surrounding event scheduler provides in a full network simulation.

use super::config::ScenarioConfig;
use super::trajectory::Trajectory;
use crate::error::SimResult;
use crate::schedule::WeatherSchedule;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wxloss_core::config::{PipelineConfig, WeatherChange};
use wxloss_core::{LossPipeline, Position, Weather};

/// Upper bound on the sample buffer reserved up front by [`ScenarioEngine::run`]
const RUN_PREALLOC: usize = 4096;

/// A named moving endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: String,
    pub trajectory: Trajectory,
}

impl Endpoint {
    pub fn new(id: impl Into<String>, trajectory: Trajectory) -> Self {
        Self {
            id: id.into(),
            trajectory,
        }
    }

    pub fn position_at(&self, t: f64) -> Position {
        self.trajectory.position_at(t)
    }
}

/// One signal-strength observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RssiSample {
    pub time_s: f64,
    pub distance_m: f64,
    pub rx_power_dbm: f64,
    /// Weather of the first weathered stage, if any
    pub weather: Option<Weather>,
}

/// Drives a loss pipeline between two endpoints
pub struct ScenarioEngine {
    config: ScenarioConfig,
    pipeline: LossPipeline,
    tx: Endpoint,
    rx: Endpoint,
    schedule: WeatherSchedule,
    probe_index: u64,
}

impl ScenarioEngine {
    /// Create an engine; the schedule targets every weathered stage of `pipeline`
    pub fn new(
        config: ScenarioConfig,
        pipeline: LossPipeline,
        tx: Endpoint,
        rx: Endpoint,
        changes: &[WeatherChange],
    ) -> SimResult<Self> {
        config.validate()?;
        let schedule = WeatherSchedule::from_changes(pipeline.weather_handles(), changes)?;
        Ok(Self {
            config,
            pipeline,
            tx,
            rx,
            schedule,
            probe_index: 0,
        })
    }

    /// Access point at the origin, station 0.5 m away, weather cycling
    /// clear, rain, snow between 3 s and 21 s
    pub fn rain_experiment() -> SimResult<Self> {
        let pipeline = PipelineConfig::default().build()?;
        let changes = [
            WeatherChange::new(3.0, Weather::Clear),
            WeatherChange::new(6.0, Weather::Rain),
            WeatherChange::new(9.0, Weather::Snow),
            WeatherChange::new(12.0, Weather::Rain),
            WeatherChange::new(15.0, Weather::Snow),
            WeatherChange::new(18.0, Weather::Rain),
            WeatherChange::new(21.0, Weather::Clear),
        ];
        Self::new(
            ScenarioConfig::default(),
            pipeline,
            Endpoint::new("ap", Trajectory::fixed(0.0, 0.0, 0.0)),
            Endpoint::new("sta", Trajectory::fixed(0.5, 0.0, 0.0)),
            &changes,
        )
    }

    /// Produce the next probe, or `None` once the scenario is over
    pub fn step(&mut self) -> SimResult<Option<RssiSample>> {
        if self.is_done() {
            return Ok(None);
        }
        let t = self.config.probe_time(self.probe_index);
        self.probe_index += 1;

        let fired = self.schedule.advance_to(t);
        if fired > 0 {
            debug!(time_s = t, fired, "applied weather changes");
        }

        let a = self.tx.position_at(t);
        let b = self.rx.position_at(t);
        let rx_power_dbm = self.pipeline.evaluate(self.config.tx_power_dbm, &a, &b)?;
        let weather = match self.schedule.targets().first() {
            Some(handle) => Some(handle.get()?),
            None => None,
        };

        Ok(Some(RssiSample {
            time_s: t,
            distance_m: a.distance_to(&b),
            rx_power_dbm,
            weather,
        }))
    }

    /// Run to completion and collect every probe
    pub fn run(&mut self) -> SimResult<Vec<RssiSample>> {
        info!(
            tx = %self.tx.id,
            rx = %self.rx.id,
            probes = self.config.num_probes(),
            stages = ?self.pipeline.stage_names(),
            "running scenario"
        );
        let mut samples = Vec::with_capacity(self.capacity_hint());
        while let Some(sample) = self.step()? {
            samples.push(sample);
        }
        info!(samples = samples.len(), "scenario complete");
        Ok(samples)
    }

    /// Rewind the probe clock. Weather changes already fired stay applied.
    pub fn reset(&mut self) {
        self.probe_index = 0;
    }

    pub fn is_done(&self) -> bool {
        self.probe_index >= self.config.num_probes()
    }

    /// Current progress as fraction (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        let total = self.config.num_probes();
        if total == 0 {
            1.0
        } else {
            self.probe_index as f64 / total as f64
        }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &LossPipeline {
        &self.pipeline
    }

    fn capacity_hint(&self) -> usize {
        usize::try_from(self.config.num_probes())
            .unwrap_or(usize::MAX)
            .min(RUN_PREALLOC)
    }
}
