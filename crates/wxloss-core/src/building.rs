//! Building penetration loss
//!
//! A building is an axis-aligned box with one exterior wall material. When a
//! link crosses the building shell, that is when exactly one endpoint is
//! inside, the wall's penetration loss is applied. Links fully outdoors or
//! fully indoors pass through unchanged.

use crate::coordinates::Position;
use crate::error::{LossError, LossResult};
use crate::stage::LossStage;
use serde::{Deserialize, Serialize};

/// Exterior wall material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallType {
    Wood,
    ConcreteWithWindows,
    ConcreteWithoutWindows,
    StoneBlocks,
}

impl Default for WallType {
    fn default() -> Self {
        Self::ConcreteWithWindows
    }
}

impl WallType {
    /// Penetration loss in dB
    pub fn loss_db(self) -> f64 {
        match self {
            WallType::Wood => 4.0,
            WallType::ConcreteWithWindows => 7.0,
            WallType::ConcreteWithoutWindows => 15.0,
            WallType::StoneBlocks => 12.0,
        }
    }
}

/// Axis-aligned building footprint and wall material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub min: Position,
    pub max: Position,
    #[serde(default)]
    pub wall: WallType,
}

impl Building {
    pub fn new(min: Position, max: Position, wall: WallType) -> LossResult<Self> {
        let building = Self { min, max, wall };
        building.validate()?;
        Ok(building)
    }

    pub fn validate(&self) -> LossResult<()> {
        let ordered = self.min.x < self.max.x && self.min.y < self.max.y && self.min.z < self.max.z;
        if !ordered {
            return Err(LossError::invalid(format!(
                "building corners must satisfy min < max on every axis, got {:?} .. {:?}",
                self.min, self.max
            )));
        }
        Ok(())
    }

    /// Whether a position lies inside or on the shell
    pub fn contains(&self, p: &Position) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }
}

/// Applies exterior wall loss for links entering or leaving a building
#[derive(Debug, Clone)]
pub struct ExternalWallStage {
    building: Building,
}

impl ExternalWallStage {
    pub fn new(building: Building) -> LossResult<Self> {
        building.validate()?;
        Ok(Self { building })
    }

    pub fn building(&self) -> &Building {
        &self.building
    }
}

impl LossStage for ExternalWallStage {
    fn name(&self) -> &str {
        "external_wall"
    }

    fn evaluate(&self, tx_power_dbm: f64, a: &Position, b: &Position) -> LossResult<f64> {
        let crosses_shell = self.building.contains(a) != self.building.contains(b);
        if crosses_shell {
            Ok(tx_power_dbm - self.building.wall.loss_db())
        } else {
            Ok(tx_power_dbm)
        }
    }
}
