//! Construction-time errors
//!
//! Evaluation never fails: dimension, time-index and offset relationships
//! are checked once when a constraint, configuration or sparse structure is
//! built.

use thiserror::Error;
use trajopt_core::trajectory::{LayoutError, TrajectoryError};

/// Constraint construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstraintError {
    #[error("Invalid point layout: {0}")]
    Layout(#[from] LayoutError),
    #[error("Invalid trajectory: {0}")]
    Trajectory(#[from] TrajectoryError),
    #[error("Invalid goal dimension: expected {expected}, got {got}")]
    GoalDimensionMismatch { expected: usize, got: usize },
    #[error("Kinematic dimension {kinematic} exceeds point dimension {point}")]
    KinematicExceedsPoint { kinematic: usize, point: usize },
    #[error("Time index {time_index} out of range for {number_of_points} points")]
    TimeIndexOutOfRange {
        time_index: usize,
        number_of_points: usize,
    },
    #[error("Defect at time index {time_index} needs a following point, trajectory has {number_of_points}")]
    NoFollowingPoint {
        time_index: usize,
        number_of_points: usize,
    },
    #[error("Trajectory needs at least one point")]
    EmptyTrajectory,
    #[error("Invalid time step {0}: must be finite and positive")]
    InvalidTimeStep(f64),
    #[error("Dynamics dimension mismatch: layout has {layout} {what}, dynamics has {dynamics}")]
    DynamicsDimensionMismatch {
        what: &'static str,
        layout: usize,
        dynamics: usize,
    },
    #[error("Fixed-pattern defect gradient needs control dimension {expected}, got {got}")]
    UnsupportedFixedPattern { expected: usize, got: usize },
    #[error("Sparse block has {rows} row indices but {cols} column indices")]
    TripletLengthMismatch { rows: usize, cols: usize },
    #[error("Row {row} outside block rows {start}..{end}")]
    RowOutsideBlock { row: usize, start: usize, end: usize },
    #[error("Column {col} outside {variable_count} trajectory variables")]
    ColumnOutOfRange { col: usize, variable_count: usize },
    #[error("Got {got} gradient values for {expected} sparse entries")]
    ValueCountMismatch { expected: usize, got: usize },
    #[error("Sparse index {0} does not fit in i32")]
    IndexOverflow(usize),
}

/// Result type for constraint construction
pub type Result<T> = std::result::Result<T, ConstraintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConstraintError::GoalDimensionMismatch { expected: 4, got: 6 };
        assert_eq!(format!("{err}"), "Invalid goal dimension: expected 4, got 6");

        let err = ConstraintError::InvalidTimeStep(-0.5);
        assert!(format!("{err}").contains("-0.5"));

        let err: ConstraintError = LayoutError::ZeroPositionDimension.into();
        assert!(format!("{err}").starts_with("Invalid point layout"));
    }
}
