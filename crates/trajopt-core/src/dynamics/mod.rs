//! Dynamics models
//!
//! A dynamics model maps one point's parts to an acceleration:
//!
//! a = f(x, v, u),    x, v, a ∈ Rᵖ,  u ∈ Rᶜ
//!
//! Defect constraints hold models by reference and query both the value and,
//! for the general defect Jacobian, the partial derivatives
//! ∂a/∂x, ∂a/∂v and ∂a/∂u.

pub mod point_mass;
pub mod pendulum;
pub mod function;

pub use point_mass::*;
pub use pendulum::*;
pub use function::*;

use nalgebra::{DMatrix, DVector};

use crate::math::central_difference_jacobian;

/// Partial derivatives of acceleration at one point
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicsJacobian {
    /// ∂a/∂x (p × p)
    pub position: DMatrix<f64>,
    /// ∂a/∂v (p × p)
    pub velocity: DMatrix<f64>,
    /// ∂a/∂u (p × c)
    pub control: DMatrix<f64>,
}

impl DynamicsJacobian {
    pub fn zeros(position_dimension: usize, control_dimension: usize) -> Self {
        Self {
            position: DMatrix::zeros(position_dimension, position_dimension),
            velocity: DMatrix::zeros(position_dimension, position_dimension),
            control: DMatrix::zeros(position_dimension, control_dimension),
        }
    }

    /// Rows of acceleration, columns in point order `[x | v | u]`
    pub fn point_block(&self) -> DMatrix<f64> {
        let p = self.position.nrows();
        let c = self.control.ncols();
        let mut block = DMatrix::zeros(p, 2 * p + c);

        block.view_mut((0, 0), (p, p)).copy_from(&self.position);
        block.view_mut((0, p), (p, p)).copy_from(&self.velocity);
        block.view_mut((0, 2 * p), (p, c)).copy_from(&self.control);

        block
    }
}

/// Acceleration model for one trajectory point
///
/// Implementations must be pure: the same inputs always give the same
/// acceleration.
pub trait Dynamics {
    /// Position (and acceleration) size p
    fn position_dimension(&self) -> usize;

    /// Control size c
    fn control_dimension(&self) -> usize;

    /// Acceleration a = f(x, v, u)
    fn evaluate(&self, position: &[f64], velocity: &[f64], control: &[f64]) -> DVector<f64>;

    /// ∂a/∂(x, v, u) at the given point.
    ///
    /// Defaults to central differences over the concatenated point.
    fn jacobian(&self, position: &[f64], velocity: &[f64], control: &[f64]) -> DynamicsJacobian {
        let p = position.len();
        let c = control.len();

        let mut point = Vec::with_capacity(2 * p + c);
        point.extend_from_slice(position);
        point.extend_from_slice(velocity);
        point.extend_from_slice(control);

        let block = central_difference_jacobian(&point, |y| {
            self.evaluate(&y[..p], &y[p..2 * p], &y[2 * p..])
        });

        DynamicsJacobian {
            position: block.columns(0, p).into_owned(),
            velocity: block.columns(p, p).into_owned(),
            control: block.columns(2 * p, c).into_owned(),
        }
    }

    /// Whether acceleration equals the control input identically.
    ///
    /// Only such models make the fixed-pattern defect gradient exact.
    fn control_is_acceleration(&self) -> bool {
        false
    }
}

impl<D: Dynamics + ?Sized> Dynamics for &D {
    fn position_dimension(&self) -> usize {
        (**self).position_dimension()
    }

    fn control_dimension(&self) -> usize {
        (**self).control_dimension()
    }

    fn evaluate(&self, position: &[f64], velocity: &[f64], control: &[f64]) -> DVector<f64> {
        (**self).evaluate(position, velocity, control)
    }

    fn jacobian(&self, position: &[f64], velocity: &[f64], control: &[f64]) -> DynamicsJacobian {
        (**self).jacobian(position, velocity, control)
    }

    fn control_is_acceleration(&self) -> bool {
        (**self).control_is_acceleration()
    }
}

impl<D: Dynamics + ?Sized> Dynamics for Box<D> {
    fn position_dimension(&self) -> usize {
        (**self).position_dimension()
    }

    fn control_dimension(&self) -> usize {
        (**self).control_dimension()
    }

    fn evaluate(&self, position: &[f64], velocity: &[f64], control: &[f64]) -> DVector<f64> {
        (**self).evaluate(position, velocity, control)
    }

    fn jacobian(&self, position: &[f64], velocity: &[f64], control: &[f64]) -> DynamicsJacobian {
        (**self).jacobian(position, velocity, control)
    }

    fn control_is_acceleration(&self) -> bool {
        (**self).control_is_acceleration()
    }
}
