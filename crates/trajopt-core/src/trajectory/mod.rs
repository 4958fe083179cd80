//! Trajectory layout and point access
//!
//! A trajectory is stored as one flat `&[f64]`. Point `t` occupies
//! `[t * point_dimension, (t + 1) * point_dimension)` and splits into
//! position, velocity and control slices according to a [`PointLayout`].

mod layout;
mod view;

pub use layout::*;
pub use view::*;
