//! Constraint function contracts
//!
//! Every block reduces the flat trajectory to a vector:
//!
//! - [`Constraint`]: residual values c(x)
//! - [`ConstraintGradient`]: the nonzero entries of ∂c/∂x, in the order the
//!   block's index generator lists them
//! - [`SparseGradient`]: the (row, column) structure for those entries,
//!   placed at a caller-supplied row offset
//!
//! Plain closures `Fn(&[f64]) -> Vec<f64>` are both value and gradient-value
//! functions, so hand-written blocks stack alongside the built-in ones.

use crate::sparse::TripletBlock;

/// Residual vector of one constraint block
pub trait Constraint {
    fn evaluate(&self, trajectory: &[f64]) -> Vec<f64>;
}

/// Nonzero gradient values of one constraint block
pub trait ConstraintGradient {
    fn evaluate_gradient(&self, trajectory: &[f64]) -> Vec<f64>;
}

/// Static sparsity structure of one constraint block
pub trait SparseGradient {
    /// Number of residual rows in the block
    fn constraint_count(&self) -> usize;

    /// Row/column coordinates with rows starting at `row_offset`
    fn gradient_indices(&self, row_offset: usize) -> TripletBlock;
}

impl<F> Constraint for F
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn evaluate(&self, trajectory: &[f64]) -> Vec<f64> {
        self(trajectory)
    }
}

impl<F> ConstraintGradient for F
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    fn evaluate_gradient(&self, trajectory: &[f64]) -> Vec<f64> {
        self(trajectory)
    }
}
