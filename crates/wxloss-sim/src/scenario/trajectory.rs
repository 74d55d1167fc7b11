//! Endpoint trajectory models
//!
//! Motion profiles in the local Cartesian frame: static, constant velocity,
//! timed waypoints.

use serde::{Deserialize, Serialize};
use wxloss_core::Position;

/// Endpoint motion definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trajectory {
    /// Fixed position
    Static { position: Position },
    /// Constant velocity from a start position
    Linear {
        start: Position,
        /// Velocity (x, y, z) in m/s
        velocity: [f64; 3],
    },
    /// Sequence of waypoints with timestamps
    Waypoints {
        /// (time_s, position), sorted by time
        points: Vec<(f64, Position)>,
    },
}

impl Trajectory {
    pub fn fixed(x: f64, y: f64, z: f64) -> Self {
        Trajectory::Static {
            position: Position::new(x, y, z),
        }
    }

    /// Position at virtual time `t` in seconds
    pub fn position_at(&self, t: f64) -> Position {
        match self {
            Trajectory::Static { position } => *position,
            Trajectory::Linear { start, velocity } => {
                start.offset(velocity[0] * t, velocity[1] * t, velocity[2] * t)
            }
            Trajectory::Waypoints { points } => {
                let (first, last) = match (points.first(), points.last()) {
                    (Some(first), Some(last)) => (first, last),
                    _ => return Position::origin(),
                };
                if t <= first.0 {
                    return first.1;
                }
                if t >= last.0 {
                    return last.1;
                }
                // End of the segment containing t; none for NaN
                let end = match points.iter().position(|(pt, _)| *pt > t) {
                    Some(end) => end,
                    None => return last.1,
                };
                let (t0, p0) = &points[end - 1];
                let (t1, p1) = &points[end];
                let dt = t1 - t0;
                if dt <= 0.0 {
                    return *p1;
                }
                p0.lerp(p1, (t - t0) / dt)
            }
        }
    }
}

impl Default for Trajectory {
    fn default() -> Self {
        Trajectory::Static {
            position: Position::origin(),
        }
    }
}
