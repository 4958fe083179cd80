//! Transcription configuration
//!
//! Describes how a continuous trajectory is sampled: how many points, how
//! each point is laid out, and the fixed step between consecutive points.

use serde::{Deserialize, Serialize};
use tracing::debug;

use trajopt_core::trajectory::PointLayout;

use crate::error::{ConstraintError, Result};

/// Discretization of the trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionConfig {
    /// Number of sampled points (N)
    pub number_of_points: usize,
    /// Scalars per point
    pub point_dimension: usize,
    /// Position slots per point (p)
    pub position_dimension: usize,
    /// Step between consecutive points [s]
    pub dt: f64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            number_of_points: 2,
            point_dimension: 6,
            position_dimension: 2,
            dt: 0.1,
        }
    }
}

impl TranscriptionConfig {
    /// Spread `number_of_points` evenly over `horizon_time`.
    ///
    /// N points span N - 1 intervals.
    pub fn from_horizon(
        number_of_points: usize,
        point_dimension: usize,
        position_dimension: usize,
        horizon_time: f64,
    ) -> Result<Self> {
        if number_of_points < 2 {
            return Err(ConstraintError::NoFollowingPoint {
                time_index: 0,
                number_of_points,
            });
        }

        let config = Self {
            number_of_points,
            point_dimension,
            position_dimension,
            dt: horizon_time / (number_of_points - 1) as f64,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the layout, point count and time step
    pub fn validate(&self) -> Result<()> {
        let layout = self.layout()?;
        if self.number_of_points == 0 {
            return Err(ConstraintError::EmptyTrajectory);
        }
        validate_time_step(self.dt)?;

        debug!(
            "Transcription: {} points × {} (p={}, c={}), dt={}",
            self.number_of_points,
            self.point_dimension,
            layout.position_dimension,
            layout.control_dimension,
            self.dt
        );
        Ok(())
    }

    /// Point layout derived from the point and position sizes
    pub fn layout(&self) -> Result<PointLayout> {
        Ok(PointLayout::from_point_dimension(
            self.point_dimension,
            self.position_dimension,
        )?)
    }

    /// Position plus velocity scalars per point
    pub fn kinematic_dimension(&self) -> usize {
        2 * self.position_dimension
    }

    /// Length of the flat trajectory vector
    pub fn variable_count(&self) -> usize {
        self.number_of_points * self.point_dimension
    }

    /// Number of intervals that carry a defect constraint
    pub fn defect_count(&self) -> usize {
        self.number_of_points.saturating_sub(1)
    }

    /// Sample times starting at zero
    pub fn time_stamps(&self) -> Vec<f64> {
        (0..self.number_of_points)
            .map(|k| k as f64 * self.dt)
            .collect()
    }

    /// Check that `time_index` names an existing point
    pub fn check_time_index(&self, time_index: usize) -> Result<()> {
        if time_index >= self.number_of_points {
            return Err(ConstraintError::TimeIndexOutOfRange {
                time_index,
                number_of_points: self.number_of_points,
            });
        }
        Ok(())
    }
}

/// A goal for the kinematic state at one time index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalSpec {
    /// Point the goal applies to
    pub time_index: usize,
    /// Target position ++ velocity
    pub goal: Vec<f64>,
}

impl GoalSpec {
    pub fn new(time_index: usize, goal: Vec<f64>) -> Self {
        Self { time_index, goal }
    }

    /// Goal at the last point of the trajectory
    pub fn terminal(config: &TranscriptionConfig, goal: Vec<f64>) -> Self {
        Self {
            time_index: config.number_of_points.saturating_sub(1),
            goal,
        }
    }
}

pub(crate) fn validate_time_step(dt: f64) -> Result<()> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(ConstraintError::InvalidTimeStep(dt));
    }
    Ok(())
}
