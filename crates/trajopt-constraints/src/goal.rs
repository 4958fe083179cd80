//! Kinematic goal constraint
//!
//! Squared distance of the kinematic state (position ++ velocity) at one
//! time index T to a fixed goal G:
//!
//! cᵢ(x)    = (Gᵢ - x[T·n + i])²,      i ∈ [0, k)
//! ∂cᵢ/∂x   = -2 (Gᵢ - x[T·n + i])     at column T·n + i only
//!
//! with n the point dimension and k the kinematic dimension. Each residual
//! row has exactly one nonzero.

use trajopt_core::trajectory::PointLayout;

use crate::config::{GoalSpec, TranscriptionConfig};
use crate::constraint::{Constraint, ConstraintGradient, SparseGradient};
use crate::error::{ConstraintError, Result};
use crate::sparse::TripletBlock;

/// Squared distance to a kinematic goal at one time index
#[derive(Debug, Clone, PartialEq)]
pub struct GoalConstraint {
    number_of_points: usize,
    point_dimension: usize,
    kinematic_dimension: usize,
    goal_time_index: usize,
    goal: Vec<f64>,
    kinematic_start: usize,
}

impl GoalConstraint {
    /// Bind `goal` to the kinematic slice of point `goal_time_index`.
    ///
    /// # Errors
    ///
    /// - `goal.len() != kinematic_dimension`
    /// - `kinematic_dimension > point_dimension`
    /// - `goal_time_index >= number_of_points`
    pub fn new(
        number_of_points: usize,
        point_dimension: usize,
        kinematic_dimension: usize,
        goal_time_index: usize,
        goal: Vec<f64>,
    ) -> Result<Self> {
        if goal.len() != kinematic_dimension {
            return Err(ConstraintError::GoalDimensionMismatch {
                expected: kinematic_dimension,
                got: goal.len(),
            });
        }
        if kinematic_dimension > point_dimension {
            return Err(ConstraintError::KinematicExceedsPoint {
                kinematic: kinematic_dimension,
                point: point_dimension,
            });
        }
        if goal_time_index >= number_of_points {
            return Err(ConstraintError::TimeIndexOutOfRange {
                time_index: goal_time_index,
                number_of_points,
            });
        }

        Ok(Self {
            number_of_points,
            point_dimension,
            kinematic_dimension,
            goal_time_index,
            goal,
            kinematic_start: goal_time_index * point_dimension,
        })
    }

    /// Build from a transcription and a goal description
    pub fn from_config(config: &TranscriptionConfig, target: &GoalSpec) -> Result<Self> {
        let layout: PointLayout = config.layout()?;
        Self::new(
            config.number_of_points,
            config.point_dimension,
            layout.kinematic_dimension(),
            target.time_index,
            target.goal.clone(),
        )
    }

    pub fn goal(&self) -> &[f64] {
        &self.goal
    }

    pub fn goal_time_index(&self) -> usize {
        self.goal_time_index
    }

    pub fn number_of_points(&self) -> usize {
        self.number_of_points
    }

    fn current_kinematics<'a>(&self, trajectory: &'a [f64]) -> &'a [f64] {
        &trajectory[self.kinematic_start..self.kinematic_start + self.kinematic_dimension]
    }

    /// Residuals (Gᵢ - xᵢ)²
    pub fn values(&self, trajectory: &[f64]) -> Vec<f64> {
        self.goal
            .iter()
            .zip(self.current_kinematics(trajectory))
            .map(|(goal, current)| (goal - current).powi(2))
            .collect()
    }

    /// Gradient entries -2 (Gᵢ - xᵢ), one per residual
    pub fn gradient_values(&self, trajectory: &[f64]) -> Vec<f64> {
        self.goal
            .iter()
            .zip(self.current_kinematics(trajectory))
            .map(|(goal, current)| -2.0 * (goal - current))
            .collect()
    }
}

impl Constraint for GoalConstraint {
    fn evaluate(&self, trajectory: &[f64]) -> Vec<f64> {
        self.values(trajectory)
    }
}

impl ConstraintGradient for GoalConstraint {
    fn evaluate_gradient(&self, trajectory: &[f64]) -> Vec<f64> {
        self.gradient_values(trajectory)
    }
}

impl SparseGradient for GoalConstraint {
    fn constraint_count(&self) -> usize {
        self.kinematic_dimension
    }

    fn gradient_indices(&self, row_offset: usize) -> TripletBlock {
        goal_gradient_indices(
            row_offset,
            self.point_dimension,
            self.kinematic_dimension,
            self.goal_time_index,
        )
    }
}

/// Sparsity of the goal gradient placed at `row_offset`.
///
/// Rows `row_offset..row_offset + k`, columns `T·n..T·n + k`, one entry per
/// row. `constraint_count` is k, so the next block starts at
/// `row_offset + k`.
pub fn goal_gradient_indices(
    row_offset: usize,
    point_dimension: usize,
    kinematic_dimension: usize,
    goal_time_index: usize,
) -> TripletBlock {
    let kinematic_start = goal_time_index * point_dimension;

    TripletBlock {
        constraint_count: kinematic_dimension,
        rows: (row_offset..row_offset + kinematic_dimension).collect(),
        cols: (kinematic_start..kinematic_start + kinematic_dimension).collect(),
    }
}
