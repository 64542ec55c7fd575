//! Successive Over-Relaxation sweep for the pressure Poisson equation.
//!
//! One call performs a single lexicographic Gauss-Seidel-SOR pass over the
//! fluid cells only; obstacle and ghost pressures are held by the boundary
//! operators and the halo exchange between sweeps. The residual is returned
//! as a raw squared sum so the caller can reduce it across ranks before
//! normalizing.

use ndarray::Array2;

use crate::discretization::Discretization;

/// One in-place SOR sweep over `fluid` in list order.
///
/// `omega` = 1 is plain Gauss-Seidel; the usable range is (0, 2).
pub fn sor_sweep(
    p: &mut Array2<f64>,
    rs: &Array2<f64>,
    fluid: &[(usize, usize)],
    disc: &Discretization,
    omega: f64,
) {
    let coef = omega / (2.0 * (1.0 / (disc.dx * disc.dx) + 1.0 / (disc.dy * disc.dy)));
    for &(i, j) in fluid {
        p[[i, j]] =
            (1.0 - omega) * p[[i, j]] + coef * (disc.sor_helper(p, i, j) - rs[[i, j]]);
    }
}

/// Sum of squared residuals `(lap(p) - rs)^2` over the fluid cells.
pub fn sor_residual_sq(
    p: &Array2<f64>,
    rs: &Array2<f64>,
    fluid: &[(usize, usize)],
    disc: &Discretization,
) -> f64 {
    let mut acc = 0.0;
    for &(i, j) in fluid {
        let r = disc.laplacian(p, i, j) - rs[[i, j]];
        acc += r * r;
    }
    acc
}
