//! Borrowed trajectory access
//!
//! The accessor never copies: points and their position/velocity/control
//! parts are sub-slices of the caller's buffer.

use thiserror::Error;

use super::PointLayout;

/// Trajectory access errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrajectoryError {
    #[error("Point dimension must be at least 1")]
    ZeroPointDimension,
    #[error("Invalid trajectory length: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("Time index {time_index} out of range for {number_of_points} points")]
    TimeIndexOutOfRange {
        time_index: usize,
        number_of_points: usize,
    },
}

/// One point split into its parts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointParts<'a> {
    pub position: &'a [f64],
    pub velocity: &'a [f64],
    pub control: &'a [f64],
}

/// Point `time_index` of a flat trajectory buffer.
///
/// Bounds are the caller's responsibility; an out-of-range index panics
/// like any slice index.
pub fn get_point(buffer: &[f64], time_index: usize, point_dimension: usize) -> &[f64] {
    let start = time_index * point_dimension;
    &buffer[start..start + point_dimension]
}

/// Split a point into position, velocity and control slices
pub fn split_point<'a>(point: &'a [f64], layout: &PointLayout) -> PointParts<'a> {
    let (position, rest) = point.split_at(layout.position_dimension);
    let (velocity, rest) = rest.split_at(layout.velocity_dimension);
    let control = &rest[..layout.control_dimension];

    PointParts {
        position,
        velocity,
        control,
    }
}

/// Non-owning view over a trajectory buffer with a checked length
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryView<'a> {
    data: &'a [f64],
    number_of_points: usize,
    point_dimension: usize,
}

impl<'a> TrajectoryView<'a> {
    /// Wrap `data`, requiring `data.len() == number_of_points * point_dimension`
    pub fn new(
        data: &'a [f64],
        number_of_points: usize,
        point_dimension: usize,
    ) -> Result<Self, TrajectoryError> {
        if point_dimension == 0 {
            return Err(TrajectoryError::ZeroPointDimension);
        }
        let expected = number_of_points * point_dimension;
        if data.len() != expected {
            return Err(TrajectoryError::LengthMismatch {
                expected,
                got: data.len(),
            });
        }

        Ok(Self {
            data,
            number_of_points,
            point_dimension,
        })
    }

    pub fn number_of_points(&self) -> usize {
        self.number_of_points
    }

    pub fn point_dimension(&self) -> usize {
        self.point_dimension
    }

    /// The underlying buffer
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Point at `time_index`, checked
    pub fn point(&self, time_index: usize) -> Result<&'a [f64], TrajectoryError> {
        if time_index >= self.number_of_points {
            return Err(TrajectoryError::TimeIndexOutOfRange {
                time_index,
                number_of_points: self.number_of_points,
            });
        }
        Ok(get_point(self.data, time_index, self.point_dimension))
    }

    /// Point at `time_index` split by `layout`
    pub fn parts(
        &self,
        time_index: usize,
        layout: &PointLayout,
    ) -> Result<PointParts<'a>, TrajectoryError> {
        let point = self.point(time_index)?;
        Ok(split_point(point, layout))
    }

    /// Iterate over all points in time order
    pub fn points(&self) -> impl Iterator<Item = &'a [f64]> + 'a {
        self.data.chunks_exact(self.point_dimension)
    }
}
