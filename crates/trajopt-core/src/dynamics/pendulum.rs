//! Damped, actuated pendulum
//!
//! θ̈ = -(g/l)·sin(θ) - b·θ̇ + τ / (m·l²)
//!
//! One position slot (θ), one control slot (torque τ). Nonlinear in θ, so
//! its Jacobian varies along the trajectory.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use super::{Dynamics, DynamicsJacobian};
use crate::GRAVITY;

/// Pendulum parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pendulum {
    /// Bob mass [kg]
    pub mass: f64,
    /// Rod length [m]
    pub length: f64,
    /// Viscous damping [1/s]
    pub damping: f64,
    /// Gravity [m/s²]
    pub gravity: f64,
}

impl Default for Pendulum {
    fn default() -> Self {
        Self {
            mass: 1.0,
            length: 1.0,
            damping: 0.0,
            gravity: GRAVITY,
        }
    }
}

impl Pendulum {
    pub fn new(mass: f64, length: f64, damping: f64) -> Self {
        Self {
            mass,
            length,
            damping,
            gravity: GRAVITY,
        }
    }

    fn inertia(&self) -> f64 {
        self.mass * self.length * self.length
    }
}

impl Dynamics for Pendulum {
    fn position_dimension(&self) -> usize {
        1
    }

    fn control_dimension(&self) -> usize {
        1
    }

    fn evaluate(&self, position: &[f64], velocity: &[f64], control: &[f64]) -> DVector<f64> {
        let theta = position[0];
        let omega = velocity[0];
        let torque = control[0];

        let alpha = -(self.gravity / self.length) * theta.sin() - self.damping * omega
            + torque / self.inertia();

        DVector::from_element(1, alpha)
    }

    fn jacobian(&self, position: &[f64], _velocity: &[f64], _control: &[f64]) -> DynamicsJacobian {
        let theta = position[0];

        DynamicsJacobian {
            position: DMatrix::from_element(1, 1, -(self.gravity / self.length) * theta.cos()),
            velocity: DMatrix::from_element(1, 1, -self.damping),
            control: DMatrix::from_element(1, 1, 1.0 / self.inertia()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::FnDynamics;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_pendulum_equilibrium() {
        let pendulum = Pendulum::default();

        // Hanging straight down, at rest, no torque
        let alpha = pendulum.evaluate(&[0.0], &[0.0], &[0.0]);
        assert_relative_eq!(alpha[0], 0.0, epsilon = 1e-12);

        // Horizontal: full gravity torque
        let alpha = pendulum.evaluate(&[PI / 2.0], &[0.0], &[0.0]);
        assert_relative_eq!(alpha[0], -GRAVITY, epsilon = 1e-12);
    }

    #[test]
    fn test_pendulum_torque_balance() {
        let pendulum = Pendulum::new(2.0, 0.5, 0.0);
        let theta: f64 = 0.3;
        let hold_torque = pendulum.mass * pendulum.gravity * pendulum.length * theta.sin();

        let alpha = pendulum.evaluate(&[theta], &[0.0], &[hold_torque]);
        assert_relative_eq!(alpha[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pendulum_jacobian_matches_numeric() {
        let pendulum = Pendulum::new(1.5, 0.8, 0.2);
        let numeric = FnDynamics::new(1, 1, |x: &[f64], v: &[f64], u: &[f64]| {
            pendulum.evaluate(x, v, u)
        });

        for &theta in &[-2.0, -0.3, 0.0, 0.7, 2.5] {
            let analytic = pendulum.jacobian(&[theta], &[0.4], &[1.0]);
            let approx = numeric.jacobian(&[theta], &[0.4], &[1.0]);

            assert_relative_eq!(analytic.point_block(), approx.point_block(), epsilon = 1e-7);
        }
    }
}
