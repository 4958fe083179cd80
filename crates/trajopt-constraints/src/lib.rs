//! # trajopt-constraints
//!
//! Constraint residuals and sparse Jacobians for direct-collocation
//! trajectory optimization.
//!
//! A trajectory of N points is one flat vector x. Each constraint block
//! reduces x to residuals, emits the nonzero partial derivatives of those
//! residuals, and describes where those nonzeros sit in the global Jacobian:
//!
//! ```text
//! values      c(x)      = [ c_goal(x) ; c_defect,0(x) ; c_defect,1(x) ; ... ]
//! structure   (row, col)  fixed once, row offsets chained block by block
//! gradient    ∂c/∂x     = values at (row, col), recomputed per iteration
//! ```
//!
//! # Components
//!
//! - [`goal`]: squared distance to a kinematic goal at one time index
//! - [`defect`]: trapezoidal collocation defects and their gradients
//! - [`stacking`]: concatenation of value and gradient-value functions
//! - [`sparse`]: triplet blocks and the offset-tracking Jacobian builder
//! - [`config`]: transcription parameters
//!
//! # Example
//!
//! ```
//! use trajopt_constraints::{
//!     Constraint, ConstraintGradient, GoalConstraint, KinematicDefect,
//!     SparseJacobianBuilder, StackedConstraints, StackedGradients,
//! };
//! use trajopt_core::dynamics::DoubleIntegrator;
//!
//! let trajectory = vec![0.0, 0.0, 3.0, 4.0, 1.0, 2.0, 1.5, 2.0, 3.5, 5.0, 2.0, 4.0];
//! let dynamics = DoubleIntegrator::new(2);
//!
//! let goal = GoalConstraint::new(2, 6, 4, 1, vec![1.5, 2.0, 3.5, 5.0])?;
//! let defect = KinematicDefect::new(&dynamics, 6, 2, 0, 0.5)?;
//! let defect_gradient = defect.fixed_pattern_gradient()?;
//!
//! let values = StackedConstraints::new().with(&goal).with(&defect);
//! let gradients = StackedGradients::new().with(&goal).with(&defect_gradient);
//!
//! let mut builder = SparseJacobianBuilder::new(trajectory.len());
//! builder.add(&goal)?;
//! builder.add(&defect_gradient)?;
//! let structure = builder.finish();
//!
//! assert_eq!(values.evaluate(&trajectory).len(), structure.constraint_count());
//! assert_eq!(gradients.evaluate_gradient(&trajectory).len(), structure.nonzeros());
//! # Ok::<(), trajopt_constraints::ConstraintError>(())
//! ```

pub mod config;
pub mod constraint;
pub mod defect;
pub mod error;
pub mod goal;
pub mod sparse;
pub mod stacking;

// Re-exports
pub use config::{GoalSpec, TranscriptionConfig};
pub use constraint::{Constraint, ConstraintGradient, SparseGradient};
pub use defect::{
    defect_gradient_indices, defect_jacobian_indices, KinematicDefect, KinematicDefectGradient,
    KinematicDefectJacobian,
};
pub use error::{ConstraintError, Result};
pub use goal::{goal_gradient_indices, GoalConstraint};
pub use sparse::{BlockSpan, SparseJacobianBuilder, SparseStructure, TripletBlock};
pub use stacking::{StackedConstraints, StackedGradients};
