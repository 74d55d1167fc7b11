//! Virtual-time weather schedule
//!
//! Holds pending weather changes in a min-heap keyed on virtual time, with
//! insertion order breaking ties. The owner advances the schedule to the
//! current virtual time before evaluating the pipeline, so a change at `T` is
//! seen by every evaluation at `t >= T` and by none before it.

use crate::error::{SimError, SimResult};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::trace;
use wxloss_core::config::WeatherChange;
use wxloss_core::{SimTime, WeatherController, WeatherHandle};

/// Which weather cells a change applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Every registered handle
    All,
    /// One handle, by registration index
    Index(usize),
}

#[derive(Debug, Clone)]
struct PendingChange {
    at: SimTime,
    seq: u64,
    target: Target,
    value: i64,
}

impl PartialEq for PendingChange {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingChange {}

impl PartialOrd for PendingChange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingChange {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behavior (earliest time, then first scheduled)
        match other.at.total_cmp(&self.at) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            ord => ord,
        }
    }
}

/// Timeline of weather changes for a set of weather handles
#[derive(Debug, Default)]
pub struct WeatherSchedule {
    targets: Vec<WeatherHandle>,
    pending: BinaryHeap<PendingChange>,
    next_seq: u64,
    controller: WeatherController,
}

impl WeatherSchedule {
    pub fn new(targets: Vec<WeatherHandle>) -> Self {
        Self {
            targets,
            ..Default::default()
        }
    }

    /// Build a schedule from configured changes, each applied to every target
    pub fn from_changes(targets: Vec<WeatherHandle>, changes: &[WeatherChange]) -> SimResult<Self> {
        let mut schedule = Self::new(targets);
        for change in changes {
            schedule.schedule(change.at_s, change.weather)?;
        }
        Ok(schedule)
    }

    pub fn targets(&self) -> &[WeatherHandle] {
        &self.targets
    }

    /// Schedule a weather code for every target at virtual time `at`
    pub fn schedule(&mut self, at: SimTime, value: i64) -> SimResult<()> {
        self.push(at, Target::All, value)
    }

    /// Schedule a weather code for a single target
    pub fn schedule_for(&mut self, index: usize, at: SimTime, value: i64) -> SimResult<()> {
        if index >= self.targets.len() {
            return Err(SimError::InvalidScenario(format!(
                "weather target {} out of range ({} targets)",
                index,
                self.targets.len()
            )));
        }
        self.push(at, Target::Index(index), value)
    }

    fn push(&mut self, at: SimTime, target: Target, value: i64) -> SimResult<()> {
        if !(at >= 0.0) || !at.is_finite() {
            return Err(SimError::InvalidScenario(format!(
                "weather change time must be >= 0, got {}",
                at
            )));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(PendingChange { at, seq, target, value });
        Ok(())
    }

    /// Apply every change due at or before `now`; returns how many fired
    pub fn advance_to(&mut self, now: SimTime) -> usize {
        let mut fired = 0;
        while self.pending.peek().map_or(false, |c| c.at <= now) {
            let Some(change) = self.pending.pop() else {
                break;
            };
            trace!(at_s = change.at, now_s = now, value = change.value, "firing weather change");
            match change.target {
                Target::All => {
                    self.controller.set_all(&self.targets, change.value, change.at);
                }
                Target::Index(i) => {
                    self.controller.set_weather(&self.targets[i], change.value, change.at);
                }
            }
            fired += 1;
        }
        fired
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Virtual time of the next pending change
    pub fn next_time(&self) -> Option<SimTime> {
        self.pending.peek().map(|c| c.at)
    }
}
