//! Point layout
//!
//! Every point is `position ++ velocity ++ control` with
//! `velocity_dimension == position_dimension`:
//!
//! point_dimension     = p + p + c
//! kinematic_dimension = p + p

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Layout errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Position dimension must be at least 1")]
    ZeroPositionDimension,
    #[error("Kinematic dimension {kinematic} exceeds point dimension {point}")]
    KinematicExceedsPoint { kinematic: usize, point: usize },
}

/// Dimensions of a single trajectory point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointLayout {
    /// Position slots (p)
    pub position_dimension: usize,
    /// Velocity slots, always equal to p
    pub velocity_dimension: usize,
    /// Control slots (c)
    pub control_dimension: usize,
}

impl PointLayout {
    /// Derive the layout from the point size and the position size.
    ///
    /// Control takes whatever remains after position and velocity.
    pub fn from_point_dimension(
        point_dimension: usize,
        position_dimension: usize,
    ) -> Result<Self, LayoutError> {
        if position_dimension == 0 {
            return Err(LayoutError::ZeroPositionDimension);
        }
        let kinematic = 2 * position_dimension;
        if kinematic > point_dimension {
            return Err(LayoutError::KinematicExceedsPoint {
                kinematic,
                point: point_dimension,
            });
        }

        Ok(Self {
            position_dimension,
            velocity_dimension: position_dimension,
            control_dimension: point_dimension - kinematic,
        })
    }

    /// Layout with equal position, velocity and control sizes
    pub fn uniform(dimension: usize) -> Result<Self, LayoutError> {
        Self::from_point_dimension(3 * dimension, dimension)
    }

    /// Scalars per point (p + p + c)
    pub fn point_dimension(&self) -> usize {
        self.position_dimension + self.velocity_dimension + self.control_dimension
    }

    /// Position plus velocity scalars (2p)
    pub fn kinematic_dimension(&self) -> usize {
        self.position_dimension + self.velocity_dimension
    }

    /// Offset of the velocity slice inside a point
    pub fn velocity_offset(&self) -> usize {
        self.position_dimension
    }

    /// Offset of the control slice inside a point
    pub fn control_offset(&self) -> usize {
        self.kinematic_dimension()
    }
}
