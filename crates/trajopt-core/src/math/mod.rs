//! Numerical utilities
//!
//! Central-difference differentiation used as the fallback Jacobian for
//! dynamics models and for checking analytic gradients.

pub mod finite_difference;

pub use finite_difference::*;
