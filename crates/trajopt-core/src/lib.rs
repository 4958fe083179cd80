//! # trajopt-core
//!
//! Shared building blocks for discretized trajectory-optimization problems.
//!
//! A trajectory is a flat buffer of `number_of_points` points, each laid out as
//!
//! ```text
//! [ position (p) | velocity (p) | control (c) ]
//! ```
//!
//! ## Modules
//!
//! - [`trajectory`]: point layout and borrowed trajectory views
//! - [`dynamics`]: the dynamics capability and concrete models
//! - [`math`]: numerical differentiation helpers

pub mod trajectory;
pub mod dynamics;
pub mod math;

/// Standard gravity [m/s²]
pub const GRAVITY: f64 = 9.81;
