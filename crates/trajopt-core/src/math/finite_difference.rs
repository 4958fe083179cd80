//! Central-difference Jacobians
//!
//! J[i, j] = (f(x + h eⱼ)ᵢ - f(x - h eⱼ)ᵢ) / 2h
//!
//! with h = ε^(1/3) · max(|xⱼ|, 1), the step that balances truncation and
//! round-off error for central differences.

use nalgebra::{DMatrix, DVector};

/// Cube root of `f64::EPSILON`
pub const EPS_CBRT: f64 = 6.055_454_452_393_343e-6;

/// Step size for coordinate value `x`
pub fn central_difference_step(x: f64) -> f64 {
    EPS_CBRT * if x.is_finite() { x.abs().max(1.0) } else { 1.0 }
}

/// Compute the Jacobian of `f` at `x` via central differences.
///
/// `f` maps Rⁿ → Rᵐ and must be deterministic around `x`. The output
/// dimension is taken from `f(x)`.
///
/// # Returns
/// `m × n` matrix with J[i, j] = ∂fᵢ/∂xⱼ
pub fn central_difference_jacobian<F>(x: &[f64], f: F) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> DVector<f64>,
{
    let m = f(x).len();
    let n = x.len();
    let mut jacobian = DMatrix::zeros(m, n);

    let mut xp = x.to_vec();
    let mut xm = x.to_vec();

    for col in 0..n {
        let xi = x[col];
        let h = central_difference_step(xi);

        xp[col] = xi + h;
        xm[col] = xi - h;

        let fp = f(&xp);
        let fm = f(&xm);

        let inv_2h = 0.5 / h;
        for row in 0..m {
            jacobian[(row, col)] = (fp[row] - fm[row]) * inv_2h;
        }

        // restore
        xp[col] = xi;
        xm[col] = xi;
    }

    jacobian
}

/// Central-difference gradient of a scalar function
pub fn central_difference_gradient<F>(x: &[f64], f: F) -> DVector<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let jacobian = central_difference_jacobian(x, |y| DVector::from_element(1, f(y)));
    jacobian.row(0).transpose()
}
