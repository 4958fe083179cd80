//! Trapezoidal collocation defects
//!
//! Between points T and T+1 a step of length h must satisfy trapezoidal
//! integration of the kinematics:
//!
//! position defect   dₓ = (x₊ - x) - ½h (v + v₊)
//! velocity defect   dᵥ = (v₊ - v) - ½h (a + a₊),   a = f(x, v, u)
//!
//! giving 2p residuals per interval. Both rows share the stencil
//!
//! ∂d/∂now = -1,  ∂d/∂(rate now) = -½h,  ∂d/∂next = +1,  ∂d/∂(rate next) = -½h
//!
//! For the position defect the rate is velocity and the stencil is exact.
//! For the velocity defect the rate is acceleration, whose partials come
//! from the dynamics model:
//!
//! - [`KinematicDefectGradient`] assumes a = u, so the rate columns are the
//!   control slots and every row keeps 4 entries.
//! - [`KinematicDefectJacobian`] composes the stencil with ∂a/∂(x, v, u),
//!   valid for any model; velocity rows then span both points.

use std::fmt;

use tracing::warn;

use trajopt_core::dynamics::Dynamics;
use trajopt_core::trajectory::{get_point, split_point, PointLayout, PointParts};

use crate::config::{validate_time_step, TranscriptionConfig};
use crate::constraint::{Constraint, ConstraintGradient, SparseGradient};
use crate::error::{ConstraintError, Result};
use crate::sparse::TripletBlock;

/// Nonzeros per row of the fixed stencil
pub const STENCIL_WIDTH: usize = 4;

/// The interval [T, T+1] a defect applies to
#[derive(Debug, Clone, Copy, PartialEq)]
struct Interval {
    layout: PointLayout,
    time_index: usize,
    dt: f64,
}

impl Interval {
    fn new(point_dimension: usize, position_dimension: usize, time_index: usize, dt: f64) -> Result<Self> {
        let layout = PointLayout::from_point_dimension(point_dimension, position_dimension)?;
        validate_time_step(dt)?;
        Ok(Self {
            layout,
            time_index,
            dt,
        })
    }

    fn from_config(config: &TranscriptionConfig, time_index: usize) -> Result<Self> {
        if time_index + 1 >= config.number_of_points {
            return Err(ConstraintError::NoFollowingPoint {
                time_index,
                number_of_points: config.number_of_points,
            });
        }
        Self::new(config.point_dimension, config.position_dimension, time_index, config.dt)
    }

    fn points<'a>(&self, trajectory: &'a [f64]) -> (PointParts<'a>, PointParts<'a>) {
        let point_dimension = self.layout.point_dimension();
        let now = get_point(trajectory, self.time_index, point_dimension);
        let next = get_point(trajectory, self.time_index + 1, point_dimension);
        (split_point(now, &self.layout), split_point(next, &self.layout))
    }

    fn check_dynamics<D: Dynamics + ?Sized>(&self, dynamics: &D) -> Result<()> {
        if dynamics.position_dimension() != self.layout.position_dimension {
            return Err(ConstraintError::DynamicsDimensionMismatch {
                what: "position slots",
                layout: self.layout.position_dimension,
                dynamics: dynamics.position_dimension(),
            });
        }
        if dynamics.control_dimension() != self.layout.control_dimension {
            return Err(ConstraintError::DynamicsDimensionMismatch {
                what: "control slots",
                layout: self.layout.control_dimension,
                dynamics: dynamics.control_dimension(),
            });
        }
        Ok(())
    }
}

/// Trapezoidal defect residual between points T and T+1
pub struct KinematicDefect<'d, D: ?Sized> {
    dynamics: &'d D,
    interval: Interval,
}

impl<'d, D: Dynamics + ?Sized> KinematicDefect<'d, D> {
    /// Defect between `time_index` and `time_index + 1`.
    ///
    /// # Errors
    ///
    /// Fails if the layout is invalid, `dt` is not finite and positive, or
    /// the dynamics model's sizes differ from the layout.
    pub fn new(
        dynamics: &'d D,
        point_dimension: usize,
        position_dimension: usize,
        time_index: usize,
        dt: f64,
    ) -> Result<Self> {
        let interval = Interval::new(point_dimension, position_dimension, time_index, dt)?;
        interval.check_dynamics(dynamics)?;
        Ok(Self { dynamics, interval })
    }

    /// Defect for interval `time_index` of a transcription.
    ///
    /// Also checks that `time_index + 1` is a point of the trajectory.
    pub fn from_config(
        config: &TranscriptionConfig,
        dynamics: &'d D,
        time_index: usize,
    ) -> Result<Self> {
        let interval = Interval::from_config(config, time_index)?;
        interval.check_dynamics(dynamics)?;
        Ok(Self { dynamics, interval })
    }

    pub fn time_index(&self) -> usize {
        self.interval.time_index
    }

    pub fn dt(&self) -> f64 {
        self.interval.dt
    }

    pub fn layout(&self) -> &PointLayout {
        &self.interval.layout
    }

    /// Position defects followed by velocity defects (2p values)
    pub fn values(&self, trajectory: &[f64]) -> Vec<f64> {
        let (now, next) = self.interval.points(trajectory);
        let half_dt = 0.5 * self.interval.dt;
        let violation = |now: f64, next: f64, rate_now: f64, rate_next: f64| {
            (next - now) - half_dt * (rate_now + rate_next)
        };

        let p = self.interval.layout.position_dimension;
        let mut defect = Vec::with_capacity(2 * p);

        for i in 0..p {
            defect.push(violation(
                now.position[i],
                next.position[i],
                now.velocity[i],
                next.velocity[i],
            ));
        }

        let acc_now = self.dynamics.evaluate(now.position, now.velocity, now.control);
        let acc_next = self.dynamics.evaluate(next.position, next.velocity, next.control);

        for i in 0..p {
            defect.push(violation(now.velocity[i], next.velocity[i], acc_now[i], acc_next[i]));
        }

        defect
    }

    /// Fixed-pattern gradient for this interval, see [`KinematicDefectGradient`]
    pub fn fixed_pattern_gradient(&self) -> Result<KinematicDefectGradient> {
        KinematicDefectGradient::from_interval(self.dynamics, self.interval)
    }

    /// General gradient for this interval using the model's Jacobian
    pub fn jacobian(&self) -> KinematicDefectJacobian<'d, D> {
        KinematicDefectJacobian {
            dynamics: self.dynamics,
            interval: self.interval,
        }
    }
}

impl<D: Dynamics + ?Sized> Constraint for KinematicDefect<'_, D> {
    fn evaluate(&self, trajectory: &[f64]) -> Vec<f64> {
        self.values(trajectory)
    }
}

impl<D: ?Sized> Clone for KinematicDefect<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for KinematicDefect<'_, D> {}

impl<D: ?Sized> fmt::Debug for KinematicDefect<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KinematicDefect")
            .field("layout", &self.interval.layout)
            .field("time_index", &self.interval.time_index)
            .field("dt", &self.interval.dt)
            .finish_non_exhaustive()
    }
}

/// Fixed-stencil defect gradient.
///
/// Every one of the 2p rows emits `[-1, -½h, +1, -½h]`. On velocity rows
/// the rate columns are the control slots, which is the exact derivative
/// only when acceleration equals control (`a = u`). For other models use
/// [`KinematicDefectJacobian`].
///
/// Requires `control_dimension == position_dimension`; a model that does
/// not report [`Dynamics::control_is_acceleration`] is accepted with a
/// warning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicDefectGradient {
    interval: Interval,
}

impl KinematicDefectGradient {
    pub fn new<D: Dynamics + ?Sized>(
        dynamics: &D,
        point_dimension: usize,
        position_dimension: usize,
        time_index: usize,
        dt: f64,
    ) -> Result<Self> {
        let interval = Interval::new(point_dimension, position_dimension, time_index, dt)?;
        Self::from_interval(dynamics, interval)
    }

    pub fn from_config<D: Dynamics + ?Sized>(
        config: &TranscriptionConfig,
        dynamics: &D,
        time_index: usize,
    ) -> Result<Self> {
        let interval = Interval::from_config(config, time_index)?;
        Self::from_interval(dynamics, interval)
    }

    fn from_interval<D: Dynamics + ?Sized>(dynamics: &D, interval: Interval) -> Result<Self> {
        interval.check_dynamics(dynamics)?;

        let layout = &interval.layout;
        if layout.control_dimension != layout.position_dimension {
            return Err(ConstraintError::UnsupportedFixedPattern {
                expected: layout.position_dimension,
                got: layout.control_dimension,
            });
        }
        if !dynamics.control_is_acceleration() {
            warn!(
                "Fixed-pattern defect gradient at time index {} assumes acceleration == control; \
                 the dynamics model does not guarantee it",
                interval.time_index
            );
        }

        Ok(Self { interval })
    }

    pub fn time_index(&self) -> usize {
        self.interval.time_index
    }

    /// 4 entries per row, 2p rows.
    ///
    /// Constant for a given `dt`; the trajectory does not enter.
    pub fn values(&self, _trajectory: &[f64]) -> Vec<f64> {
        let half_dt = 0.5 * self.interval.dt;
        let rows = self.interval.layout.kinematic_dimension();

        let mut values = Vec::with_capacity(STENCIL_WIDTH * rows);
        for _ in 0..rows {
            values.extend_from_slice(&[-1.0, -half_dt, 1.0, -half_dt]);
        }
        values
    }
}

impl ConstraintGradient for KinematicDefectGradient {
    fn evaluate_gradient(&self, trajectory: &[f64]) -> Vec<f64> {
        self.values(trajectory)
    }
}

impl SparseGradient for KinematicDefectGradient {
    fn constraint_count(&self) -> usize {
        self.interval.layout.kinematic_dimension()
    }

    fn gradient_indices(&self, row_offset: usize) -> TripletBlock {
        defect_gradient_indices(
            row_offset,
            self.interval.layout.point_dimension(),
            self.interval.layout.position_dimension,
            self.interval.time_index,
        )
    }
}

/// Sparsity of the fixed-stencil defect gradient placed at `row_offset`.
///
/// Row `row_offset + i` (i ∈ [0, 2p)) repeats 4 times with columns
///
/// now = T·n + i,  rate now = now + p,  next = now + n,  rate next = next + p
///
/// matching the emission order of [`KinematicDefectGradient::values`].
pub fn defect_gradient_indices(
    row_offset: usize,
    point_dimension: usize,
    position_dimension: usize,
    time_index: usize,
) -> TripletBlock {
    let constraint_count = 2 * position_dimension;
    let kinematic_start = time_index * point_dimension;

    let mut rows = Vec::with_capacity(STENCIL_WIDTH * constraint_count);
    let mut cols = Vec::with_capacity(STENCIL_WIDTH * constraint_count);

    for i in 0..constraint_count {
        let row = row_offset + i;
        let now = kinematic_start + i;
        let next = now + point_dimension;

        rows.extend_from_slice(&[row; STENCIL_WIDTH]);
        cols.extend_from_slice(&[now, now + position_dimension, next, next + position_dimension]);
    }

    TripletBlock {
        constraint_count,
        rows,
        cols,
    }
}

/// Defect gradient composed with the dynamics Jacobian.
///
/// Position rows keep the 4-entry stencil. Velocity row i spans every
/// column of points T and T+1:
///
/// ∂dᵥᵢ/∂yⱼ  = -δ(j, p+i) - ½h ∂aᵢ/∂yⱼ     (point T)
/// ∂dᵥᵢ/∂y₊ⱼ = +δ(j, p+i) - ½h ∂a₊ᵢ/∂y₊ⱼ   (point T+1)
///
/// Structural zeros are emitted so the sparsity never changes.
pub struct KinematicDefectJacobian<'d, D: ?Sized> {
    dynamics: &'d D,
    interval: Interval,
}

impl<'d, D: Dynamics + ?Sized> KinematicDefectJacobian<'d, D> {
    pub fn new(
        dynamics: &'d D,
        point_dimension: usize,
        position_dimension: usize,
        time_index: usize,
        dt: f64,
    ) -> Result<Self> {
        let interval = Interval::new(point_dimension, position_dimension, time_index, dt)?;
        interval.check_dynamics(dynamics)?;
        Ok(Self { dynamics, interval })
    }

    pub fn from_config(
        config: &TranscriptionConfig,
        dynamics: &'d D,
        time_index: usize,
    ) -> Result<Self> {
        let interval = Interval::from_config(config, time_index)?;
        interval.check_dynamics(dynamics)?;
        Ok(Self { dynamics, interval })
    }

    pub fn time_index(&self) -> usize {
        self.interval.time_index
    }

    /// Entries in the order of [`defect_jacobian_indices`]
    pub fn values(&self, trajectory: &[f64]) -> Vec<f64> {
        let layout = &self.interval.layout;
        let p = layout.position_dimension;
        let n = layout.point_dimension();
        let half_dt = 0.5 * self.interval.dt;

        let mut values = Vec::with_capacity(defect_jacobian_nonzeros(layout));
        for _ in 0..p {
            values.extend_from_slice(&[-1.0, -half_dt, 1.0, -half_dt]);
        }

        let (now, next) = self.interval.points(trajectory);
        let jac_now = self
            .dynamics
            .jacobian(now.position, now.velocity, now.control)
            .point_block();
        let jac_next = self
            .dynamics
            .jacobian(next.position, next.velocity, next.control)
            .point_block();

        for i in 0..p {
            let own_velocity = |j: usize| if j == p + i { 1.0 } else { 0.0 };
            values.extend((0..n).map(|j| -own_velocity(j) - half_dt * jac_now[(i, j)]));
            values.extend((0..n).map(|j| own_velocity(j) - half_dt * jac_next[(i, j)]));
        }

        values
    }
}

impl<D: Dynamics + ?Sized> ConstraintGradient for KinematicDefectJacobian<'_, D> {
    fn evaluate_gradient(&self, trajectory: &[f64]) -> Vec<f64> {
        self.values(trajectory)
    }
}

impl<D: Dynamics + ?Sized> SparseGradient for KinematicDefectJacobian<'_, D> {
    fn constraint_count(&self) -> usize {
        self.interval.layout.kinematic_dimension()
    }

    fn gradient_indices(&self, row_offset: usize) -> TripletBlock {
        defect_jacobian_indices(row_offset, &self.interval.layout, self.interval.time_index)
    }
}

impl<D: ?Sized> Clone for KinematicDefectJacobian<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: ?Sized> Copy for KinematicDefectJacobian<'_, D> {}

impl<D: ?Sized> fmt::Debug for KinematicDefectJacobian<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KinematicDefectJacobian")
            .field("layout", &self.interval.layout)
            .field("time_index", &self.interval.time_index)
            .field("dt", &self.interval.dt)
            .finish_non_exhaustive()
    }
}

/// Nonzeros of one general defect block: 4p + 2p·n
pub fn defect_jacobian_nonzeros(layout: &PointLayout) -> usize {
    let p = layout.position_dimension;
    STENCIL_WIDTH * p + 2 * p * layout.point_dimension()
}

/// Sparsity of [`KinematicDefectJacobian`] placed at `row_offset`
pub fn defect_jacobian_indices(
    row_offset: usize,
    layout: &PointLayout,
    time_index: usize,
) -> TripletBlock {
    let p = layout.position_dimension;
    let n = layout.point_dimension();
    let now_start = time_index * n;
    let next_start = now_start + n;

    let nonzeros = defect_jacobian_nonzeros(layout);
    let mut rows = Vec::with_capacity(nonzeros);
    let mut cols = Vec::with_capacity(nonzeros);

    for i in 0..p {
        let now = now_start + i;
        let next = next_start + i;
        rows.extend_from_slice(&[row_offset + i; STENCIL_WIDTH]);
        cols.extend_from_slice(&[now, now + p, next, next + p]);
    }

    for i in 0..p {
        rows.extend(std::iter::repeat(row_offset + p + i).take(2 * n));
        cols.extend(now_start..next_start + n);
    }

    TripletBlock {
        constraint_count: 2 * p,
        rows,
        cols,
    }
}
