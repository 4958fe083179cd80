//! Property-based tests for constraint blocks.
//!
//! Random layouts, time indices and trajectories; checks the structural
//! invariants every block must keep regardless of the numbers involved.
//!
//! Run with: cargo test -p trajopt-constraints -- proptest

use nalgebra::DMatrix;
use proptest::prelude::*;

use trajopt_constraints::{
    defect_gradient_indices, goal_gradient_indices, Constraint, ConstraintGradient,
    GoalConstraint, KinematicDefect, SparseGradient, SparseJacobianBuilder, StackedConstraints,
};
use trajopt_core::dynamics::{DoubleIntegrator, PointMass};

// =============================================================================
// Strategies
// =============================================================================

/// (position dimension, extra control slots)
fn arb_layout() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=3, 0usize..=2)
}

/// Trajectory of `number_of_points` points of `point_dimension` scalars
fn arb_trajectory(
    number_of_points: usize,
    point_dimension: usize,
) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-10.0..10.0f64, number_of_points * point_dimension)
}

/// Layout, point count, time index and matching trajectory
fn arb_problem() -> impl Strategy<Value = (usize, usize, usize, usize, Vec<f64>)> {
    (1usize..=3, 2usize..=5).prop_flat_map(|(position_dimension, number_of_points)| {
        let point_dimension = 3 * position_dimension;
        (
            Just(position_dimension),
            Just(point_dimension),
            Just(number_of_points),
            0..number_of_points - 1,
            arb_trajectory(number_of_points, point_dimension),
        )
    })
}

fn finite_difference(constraint: &dyn Constraint, trajectory: &[f64]) -> DMatrix<f64> {
    let rows = constraint.evaluate(trajectory).len();
    let h = 1e-6;
    let mut jacobian = DMatrix::zeros(rows, trajectory.len());

    for col in 0..trajectory.len() {
        let mut plus = trajectory.to_vec();
        let mut minus = trajectory.to_vec();
        plus[col] += h;
        minus[col] -= h;

        let f_plus = constraint.evaluate(&plus);
        let f_minus = constraint.evaluate(&minus);
        for row in 0..rows {
            jacobian[(row, col)] = (f_plus[row] - f_minus[row]) / (2.0 * h);
        }
    }
    jacobian
}

fn assembled<G: ConstraintGradient + SparseGradient>(
    gradient: &G,
    trajectory: &[f64],
) -> DMatrix<f64> {
    let mut builder = SparseJacobianBuilder::new(trajectory.len());
    builder.add(gradient).unwrap();
    builder
        .finish()
        .to_dense(&gradient.evaluate_gradient(trajectory))
        .unwrap()
}

// =============================================================================
// Index generators
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_goal_indices_chain(
        (position_dimension, extra_control) in arb_layout(),
        row_offset in 0usize..100,
        time_index in 0usize..10,
    ) {
        let kinematic_dimension = 2 * position_dimension;
        let point_dimension = kinematic_dimension + extra_control + 1;

        let block = goal_gradient_indices(row_offset, point_dimension, kinematic_dimension, time_index);

        prop_assert_eq!(block.constraint_count, kinematic_dimension);
        prop_assert_eq!(block.rows.len(), block.cols.len());
        prop_assert_eq!(block.next_offset(row_offset), row_offset + kinematic_dimension);

        for (k, (row, col)) in block.entries().enumerate() {
            prop_assert_eq!(row, row_offset + k);
            prop_assert_eq!(col, time_index * point_dimension + k);
        }
    }

    #[test]
    fn proptest_defect_indices_stay_in_block(
        (position_dimension, extra_control) in arb_layout(),
        row_offset in 0usize..100,
        time_index in 0usize..10,
    ) {
        let point_dimension = 3 * position_dimension + extra_control;
        let block = defect_gradient_indices(row_offset, point_dimension, position_dimension, time_index);

        prop_assert_eq!(block.constraint_count, 2 * position_dimension);
        prop_assert_eq!(block.rows.len(), 4 * block.constraint_count);
        prop_assert_eq!(block.cols.len(), block.rows.len());

        let first_col = time_index * point_dimension;
        let end_col = first_col + 2 * point_dimension;
        for (row, col) in block.entries() {
            prop_assert!(row >= row_offset && row < row_offset + block.constraint_count);
            prop_assert!(col >= first_col && col < end_col);
        }
    }

    #[test]
    fn proptest_builder_blocks_are_contiguous(
        time_indices in prop::collection::vec(0usize..4, 1..6),
        goal_first in any::<bool>(),
    ) {
        let (number_of_points, point_dimension, position_dimension) = (5, 6, 2);
        let dynamics = DoubleIntegrator::new(position_dimension);
        let mut builder = SparseJacobianBuilder::new(number_of_points * point_dimension);

        let goal = GoalConstraint::new(number_of_points, point_dimension, 4, 4, vec![0.0; 4]).unwrap();
        if goal_first {
            builder.add(&goal).unwrap();
        }
        for &time_index in &time_indices {
            let defect = KinematicDefect::new(&dynamics, point_dimension, position_dimension, time_index, 0.1)
                .unwrap()
                .fixed_pattern_gradient()
                .unwrap();
            builder.add(&defect).unwrap();
        }
        let structure = builder.finish();

        let mut expected_row = 0;
        let mut expected_nonzero = 0;
        for span in structure.blocks() {
            prop_assert_eq!(span.rows.start, expected_row);
            prop_assert_eq!(span.nonzeros.start, expected_nonzero);
            expected_row = span.rows.end;
            expected_nonzero = span.nonzeros.end;

            for &row in &structure.rows()[span.nonzeros.clone()] {
                prop_assert!(span.rows.contains(&row));
            }
        }
        prop_assert_eq!(expected_row, structure.constraint_count());
        prop_assert_eq!(expected_nonzero, structure.nonzeros());
    }
}

// =============================================================================
// Values and gradients
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn proptest_goal_gradient_matches_finite_difference(
        (position_dimension, point_dimension, number_of_points, time_index, trajectory) in arb_problem(),
        offset in -5.0..5.0f64,
    ) {
        let kinematic_dimension = 2 * position_dimension;
        let goal: Vec<f64> = (0..kinematic_dimension).map(|i| offset + i as f64).collect();
        let constraint = GoalConstraint::new(
            number_of_points,
            point_dimension,
            kinematic_dimension,
            time_index,
            goal,
        ).unwrap();

        let analytic = assembled(&constraint, &trajectory);
        let numeric = finite_difference(&constraint, &trajectory);

        prop_assert!((analytic - numeric).abs().max() < 1e-4);
    }

    #[test]
    fn proptest_general_jacobian_matches_finite_difference(
        (position_dimension, point_dimension, _number_of_points, time_index, trajectory) in arb_problem(),
        mass in 0.5..5.0f64,
        stiffness in 0.0..3.0f64,
        damping in 0.0..2.0f64,
        dt in 0.01..1.0f64,
    ) {
        let dynamics = PointMass::new(mass, position_dimension)
            .with_stiffness(stiffness)
            .with_damping(damping);
        let defect = KinematicDefect::new(&dynamics, point_dimension, position_dimension, time_index, dt)
            .unwrap();

        let analytic = assembled(&defect.jacobian(), &trajectory);
        let numeric = finite_difference(&defect, &trajectory);

        prop_assert!((analytic - numeric).abs().max() < 1e-4);
    }

    #[test]
    fn proptest_fixed_pattern_equals_general_for_double_integrator(
        (position_dimension, point_dimension, _number_of_points, time_index, trajectory) in arb_problem(),
        dt in 0.01..1.0f64,
    ) {
        let dynamics = DoubleIntegrator::new(position_dimension);
        let defect = KinematicDefect::new(&dynamics, point_dimension, position_dimension, time_index, dt)
            .unwrap();

        let fixed = assembled(&defect.fixed_pattern_gradient().unwrap(), &trajectory);
        let general = assembled(&defect.jacobian(), &trajectory);

        prop_assert!((fixed - general).abs().max() < 1e-12);
    }

    #[test]
    fn proptest_stack_is_concatenation(
        (position_dimension, point_dimension, number_of_points, time_index, trajectory) in arb_problem(),
    ) {
        let kinematic_dimension = 2 * position_dimension;
        let dynamics = DoubleIntegrator::new(position_dimension);
        let goal = GoalConstraint::new(
            number_of_points,
            point_dimension,
            kinematic_dimension,
            time_index + 1,
            vec![1.0; kinematic_dimension],
        ).unwrap();
        let defect = KinematicDefect::new(&dynamics, point_dimension, position_dimension, time_index, 0.2)
            .unwrap();

        let stack = StackedConstraints::new().with(&defect).with(&goal);

        let mut expected = defect.evaluate(&trajectory);
        expected.extend(goal.evaluate(&trajectory));
        prop_assert_eq!(stack.evaluate(&trajectory), expected);
    }
}
