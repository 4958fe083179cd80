//! Closure-backed dynamics
//!
//! Wraps any `Fn(x, v, u) -> a` as a [`Dynamics`] model. The Jacobian falls
//! back to central differences.

use std::fmt;

use nalgebra::DVector;

use super::Dynamics;

/// Dynamics defined by a plain function
#[derive(Clone)]
pub struct FnDynamics<F> {
    position_dimension: usize,
    control_dimension: usize,
    function: F,
}

impl<F> FnDynamics<F>
where
    F: Fn(&[f64], &[f64], &[f64]) -> DVector<f64>,
{
    pub fn new(position_dimension: usize, control_dimension: usize, function: F) -> Self {
        Self {
            position_dimension,
            control_dimension,
            function,
        }
    }
}

impl<F> fmt::Debug for FnDynamics<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDynamics")
            .field("position_dimension", &self.position_dimension)
            .field("control_dimension", &self.control_dimension)
            .finish_non_exhaustive()
    }
}

impl<F> Dynamics for FnDynamics<F>
where
    F: Fn(&[f64], &[f64], &[f64]) -> DVector<f64>,
{
    fn position_dimension(&self) -> usize {
        self.position_dimension
    }

    fn control_dimension(&self) -> usize {
        self.control_dimension
    }

    fn evaluate(&self, position: &[f64], velocity: &[f64], control: &[f64]) -> DVector<f64> {
        (self.function)(position, velocity, control)
    }
}
