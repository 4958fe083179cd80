//! Stacking combinators
//!
//! Concatenate the outputs of several blocks, in insertion order, into one
//! vector. Stacks are index-agnostic: the matching sparsity must be built
//! from the same blocks in the same order, e.g. with
//! [`SparseJacobianBuilder`](crate::sparse::SparseJacobianBuilder).

use std::fmt;

use crate::constraint::{Constraint, ConstraintGradient};

/// Concatenated residuals of several constraints
#[derive(Default)]
pub struct StackedConstraints<'a> {
    constraints: Vec<&'a dyn Constraint>,
}

impl<'a> StackedConstraints<'a> {
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
        }
    }

    pub fn push(&mut self, constraint: &'a dyn Constraint) {
        self.constraints.push(constraint);
    }

    pub fn with(mut self, constraint: &'a dyn Constraint) -> Self {
        self.push(constraint);
        self
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

impl<'a> FromIterator<&'a dyn Constraint> for StackedConstraints<'a> {
    fn from_iter<I: IntoIterator<Item = &'a dyn Constraint>>(iter: I) -> Self {
        Self {
            constraints: iter.into_iter().collect(),
        }
    }
}

impl Constraint for StackedConstraints<'_> {
    fn evaluate(&self, trajectory: &[f64]) -> Vec<f64> {
        let mut stacked = Vec::new();
        for constraint in &self.constraints {
            stacked.extend(constraint.evaluate(trajectory));
        }
        stacked
    }
}

impl fmt::Debug for StackedConstraints<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackedConstraints")
            .field("len", &self.constraints.len())
            .finish()
    }
}

/// Concatenated gradient values of several constraints
#[derive(Default)]
pub struct StackedGradients<'a> {
    gradients: Vec<&'a dyn ConstraintGradient>,
}

impl<'a> StackedGradients<'a> {
    pub fn new() -> Self {
        Self {
            gradients: Vec::new(),
        }
    }

    pub fn push(&mut self, gradient: &'a dyn ConstraintGradient) {
        self.gradients.push(gradient);
    }

    pub fn with(mut self, gradient: &'a dyn ConstraintGradient) -> Self {
        self.push(gradient);
        self
    }

    pub fn len(&self) -> usize {
        self.gradients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gradients.is_empty()
    }
}

impl<'a> FromIterator<&'a dyn ConstraintGradient> for StackedGradients<'a> {
    fn from_iter<I: IntoIterator<Item = &'a dyn ConstraintGradient>>(iter: I) -> Self {
        Self {
            gradients: iter.into_iter().collect(),
        }
    }
}

impl ConstraintGradient for StackedGradients<'_> {
    fn evaluate_gradient(&self, trajectory: &[f64]) -> Vec<f64> {
        let mut stacked = Vec::new();
        for gradient in &self.gradients {
            stacked.extend(gradient.evaluate_gradient(trajectory));
        }
        stacked
    }
}

impl fmt::Debug for StackedGradients<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackedGradients")
            .field("len", &self.gradients.len())
            .finish()
    }
}
