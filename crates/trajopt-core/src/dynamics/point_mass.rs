//! Point-mass models
//!
//! Double integrator (control is acceleration):
//!
//! a = u
//!
//! Spring-damper point mass with constant gravity:
//!
//! a = (u - k·x - c·v) / m + g

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::{Dynamics, DynamicsJacobian};

/// Acceleration equals control, one control slot per axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleIntegrator {
    pub dimension: usize,
}

impl DoubleIntegrator {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Dynamics for DoubleIntegrator {
    fn position_dimension(&self) -> usize {
        self.dimension
    }

    fn control_dimension(&self) -> usize {
        self.dimension
    }

    fn evaluate(&self, _position: &[f64], _velocity: &[f64], control: &[f64]) -> DVector<f64> {
        DVector::from_column_slice(&control[..self.dimension])
    }

    fn jacobian(&self, _position: &[f64], _velocity: &[f64], _control: &[f64]) -> DynamicsJacobian {
        let mut jacobian = DynamicsJacobian::zeros(self.dimension, self.dimension);
        jacobian.control.fill_with_identity();
        jacobian
    }

    fn control_is_acceleration(&self) -> bool {
        true
    }
}

/// Point mass on a linear spring-damper under constant gravity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMass {
    /// Mass [kg]
    pub mass: f64,
    /// Spring stiffness [N/m], pulls toward the origin
    pub stiffness: f64,
    /// Viscous damping [N·s/m]
    pub damping: f64,
    /// Gravity acceleration per axis [m/s²]
    pub gravity: Vec<f64>,
}

impl PointMass {
    /// Free point mass in `dimension` axes, no spring, damping or gravity
    pub fn new(mass: f64, dimension: usize) -> Self {
        Self {
            mass,
            stiffness: 0.0,
            damping: 0.0,
            gravity: vec![0.0; dimension],
        }
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec<f64>) -> Self {
        self.gravity = gravity;
        self
    }
}

impl Dynamics for PointMass {
    fn position_dimension(&self) -> usize {
        self.gravity.len()
    }

    fn control_dimension(&self) -> usize {
        self.gravity.len()
    }

    fn evaluate(&self, position: &[f64], velocity: &[f64], control: &[f64]) -> DVector<f64> {
        let inv_mass = 1.0 / self.mass;

        DVector::from_iterator(
            self.gravity.len(),
            self.gravity.iter().enumerate().map(|(i, g)| {
                (control[i] - self.stiffness * position[i] - self.damping * velocity[i]) * inv_mass
                    + g
            }),
        )
    }

    fn jacobian(&self, _position: &[f64], _velocity: &[f64], _control: &[f64]) -> DynamicsJacobian {
        let n = self.gravity.len();
        let inv_mass = 1.0 / self.mass;

        DynamicsJacobian {
            position: DMatrix::from_diagonal_element(n, n, -self.stiffness * inv_mass),
            velocity: DMatrix::from_diagonal_element(n, n, -self.damping * inv_mass),
            control: DMatrix::from_diagonal_element(n, n, inv_mass),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GRAVITY;
    use approx::assert_relative_eq;

    #[test]
    fn test_double_integrator_returns_control() {
        let model = DoubleIntegrator::new(2);
        let acc = model.evaluate(&[9.0, 9.0], &[9.0, 9.0], &[1.0, 2.0]);

        assert_eq!(acc.as_slice(), &[1.0, 2.0]);
        assert!(model.control_is_acceleration());
    }

    #[test]
    fn test_double_integrator_jacobian() {
        let jacobian = DoubleIntegrator::new(2).jacobian(&[0.0; 2], &[0.0; 2], &[0.0; 2]);

        assert_eq!(jacobian.position, DMatrix::zeros(2, 2));
        assert_eq!(jacobian.velocity, DMatrix::zeros(2, 2));
        assert_eq!(jacobian.control, DMatrix::identity(2, 2));
    }

    #[test]
    fn test_point_mass_free_fall() {
        let model = PointMass::new(1.0, 3).with_gravity(vec![0.0, 0.0, -GRAVITY]);
        let acc = model.evaluate(&[0.0; 3], &[0.0; 3], &[0.0; 3]);

        assert_relative_eq!(acc[2], -GRAVITY, epsilon = 1e-12);
        assert!(!model.control_is_acceleration());
    }

    #[test]
    fn test_point_mass_spring_damper() {
        let model = PointMass::new(2.0, 1).with_stiffness(4.0).with_damping(1.0);

        // (u - k x - c v) / m = (3 - 4·0.5 - 1·2) / 2
        let acc = model.evaluate(&[0.5], &[2.0], &[3.0]);
        assert_relative_eq!(acc[0], -0.5, epsilon = 1e-12);

        let jacobian = model.jacobian(&[0.5], &[2.0], &[3.0]);
        assert_relative_eq!(jacobian.position[(0, 0)], -2.0);
        assert_relative_eq!(jacobian.velocity[(0, 0)], -0.5);
        assert_relative_eq!(jacobian.control[(0, 0)], 0.5);
    }
}
