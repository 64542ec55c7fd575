// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Discretization
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Finite-difference stencils on the staggered grid.
//!
//! Convection terms use the donor-cell scheme: central differences of
//! face-averaged products blended with a first-order upwind correction by
//! the factor `gamma` (gamma = 0 recovers pure central differences).
//! Diffusion is the standard 5-point Laplacian. All functions are pure in
//! their array arguments; the struct only carries `dx`, `dy`, `gamma`.
//!
//! Field layout: `u(i, j)` lives on the east face of cell (i, j),
//! `v(i, j)` on the north face, scalars at cell centers.

use ndarray::Array2;

#[derive(Debug, Clone, Copy)]
pub struct Discretization {
    pub dx: f64,
    pub dy: f64,
    pub gamma: f64,
}

impl Discretization {
    pub fn new(dx: f64, dy: f64, gamma: f64) -> Self {
        Discretization { dx, dy, gamma }
    }

    /// Donor-cell evaluation of d(u^2)/dx + d(uv)/dy at the u-location (i, j).
    pub fn convection_u(&self, u: &Array2<f64>, v: &Array2<f64>, i: usize, j: usize) -> f64 {
        let g = self.gamma;

        // d(u^2)/dx from east/west face averages.
        let ue = u[[i, j]] + u[[i + 1, j]];
        let uw = u[[i - 1, j]] + u[[i, j]];
        let du2dx = 0.25 / self.dx
            * ((ue * ue - uw * uw)
                + g * (ue.abs() * (u[[i, j]] - u[[i + 1, j]])
                    - uw.abs() * (u[[i - 1, j]] - u[[i, j]])));

        // d(uv)/dy; the transporting v is averaged onto the u-face corners.
        let vn = v[[i, j]] + v[[i + 1, j]];
        let vs = v[[i, j - 1]] + v[[i + 1, j - 1]];
        let duvdy = 0.25 / self.dy
            * ((vn * (u[[i, j]] + u[[i, j + 1]]) - vs * (u[[i, j - 1]] + u[[i, j]]))
                + g * (vn.abs() * (u[[i, j]] - u[[i, j + 1]])
                    - vs.abs() * (u[[i, j - 1]] - u[[i, j]])));

        du2dx + duvdy
    }

    /// Donor-cell evaluation of d(uv)/dx + d(v^2)/dy at the v-location (i, j).
    pub fn convection_v(&self, u: &Array2<f64>, v: &Array2<f64>, i: usize, j: usize) -> f64 {
        let g = self.gamma;

        let ue = u[[i, j]] + u[[i, j + 1]];
        let uw = u[[i - 1, j]] + u[[i - 1, j + 1]];
        let duvdx = 0.25 / self.dx
            * ((ue * (v[[i, j]] + v[[i + 1, j]]) - uw * (v[[i - 1, j]] + v[[i, j]]))
                + g * (ue.abs() * (v[[i, j]] - v[[i + 1, j]])
                    - uw.abs() * (v[[i - 1, j]] - v[[i, j]])));

        let vn = v[[i, j]] + v[[i, j + 1]];
        let vs = v[[i, j - 1]] + v[[i, j]];
        let dv2dy = 0.25 / self.dy
            * ((vn * vn - vs * vs)
                + g * (vn.abs() * (v[[i, j]] - v[[i, j + 1]])
                    - vs.abs() * (v[[i, j - 1]] - v[[i, j]])));

        duvdx + dv2dy
    }

    /// Donor-cell evaluation of d(uT)/dx + d(vT)/dy at the cell center (i, j).
    pub fn convection_t(
        &self,
        u: &Array2<f64>,
        v: &Array2<f64>,
        t: &Array2<f64>,
        i: usize,
        j: usize,
    ) -> f64 {
        let g = self.gamma;

        let dutdx = 0.5 / self.dx
            * ((u[[i, j]] * (t[[i, j]] + t[[i + 1, j]])
                - u[[i - 1, j]] * (t[[i - 1, j]] + t[[i, j]]))
                + g * (u[[i, j]].abs() * (t[[i, j]] - t[[i + 1, j]])
                    - u[[i - 1, j]].abs() * (t[[i - 1, j]] - t[[i, j]])));

        let dvtdy = 0.5 / self.dy
            * ((v[[i, j]] * (t[[i, j]] + t[[i, j + 1]])
                - v[[i, j - 1]] * (t[[i, j - 1]] + t[[i, j]]))
                + g * (v[[i, j]].abs() * (t[[i, j]] - t[[i, j + 1]])
                    - v[[i, j - 1]].abs() * (t[[i, j - 1]] - t[[i, j]])));

        dutdx + dvtdy
    }

    /// 5-point Laplacian of a scalar or face field.
    pub fn laplacian(&self, a: &Array2<f64>, i: usize, j: usize) -> f64 {
        (a[[i + 1, j]] - 2.0 * a[[i, j]] + a[[i - 1, j]]) / (self.dx * self.dx)
            + (a[[i, j + 1]] - 2.0 * a[[i, j]] + a[[i, j - 1]]) / (self.dy * self.dy)
    }

    /// Off-center part of the Laplacian, as used by the SOR update.
    pub fn sor_helper(&self, p: &Array2<f64>, i: usize, j: usize) -> f64 {
        (p[[i + 1, j]] + p[[i - 1, j]]) / (self.dx * self.dx)
            + (p[[i, j + 1]] + p[[i, j - 1]]) / (self.dy * self.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc() -> Discretization {
        Discretization::new(0.1, 0.1, 0.5)
    }

    #[test]
    fn test_convection_vanishes_on_uniform_flow() {
        let u = Array2::from_elem((6, 6), 1.3);
        let v = Array2::from_elem((6, 6), -0.7);
        let d = disc();
        assert!(d.convection_u(&u, &v, 2, 2).abs() < 1e-12);
        assert!(d.convection_v(&u, &v, 2, 2).abs() < 1e-12);
    }

    #[test]
    fn test_convection_t_vanishes_on_uniform_temperature() {
        let u = Array2::from_shape_fn((6, 6), |(i, j)| (i as f64 * 0.3) - (j as f64 * 0.1));
        let v = Array2::from_shape_fn((6, 6), |(i, j)| (j as f64 * 0.2) + i as f64);
        let t = Array2::from_elem((6, 6), 4.2);
        // With uniform T, d(uT)/dx + d(vT)/dy = T * div(u, v) on the stencil.
        let d = disc();
        let div = (u[[2, 2]] - u[[1, 2]]) / d.dx + (v[[2, 2]] - v[[2, 1]]) / d.dy;
        let conv = d.convection_t(&u, &v, &t, 2, 2);
        assert!((conv - 4.2 * div).abs() < 1e-12, "conv = {conv}, T*div = {}", 4.2 * div);
    }

    #[test]
    fn test_laplacian_of_linear_field_is_zero() {
        let a = Array2::from_shape_fn((6, 6), |(i, j)| 2.0 * i as f64 - 3.0 * j as f64 + 1.0);
        let d = disc();
        assert!(d.laplacian(&a, 2, 2).abs() < 1e-10);
        assert!(d.laplacian(&a, 3, 3).abs() < 1e-10);
    }

    #[test]
    fn test_laplacian_of_quadratic_field() {
        // a = x^2 with x = i*dx has Laplacian 2 exactly for the 3-point stencil.
        let d = disc();
        let a = Array2::from_shape_fn((6, 6), |(i, _)| {
            let x = i as f64 * d.dx;
            x * x
        });
        assert!((d.laplacian(&a, 2, 2) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_sor_helper_matches_laplacian_decomposition() {
        let p = Array2::from_shape_fn((6, 6), |(i, j)| (i as f64).sin() + (j as f64).cos());
        let d = disc();
        let (i, j) = (2, 3);
        let center = 2.0 * (1.0 / (d.dx * d.dx) + 1.0 / (d.dy * d.dy));
        let reconstructed = d.sor_helper(&p, i, j) - center * p[[i, j]];
        assert!((reconstructed - d.laplacian(&p, i, j)).abs() < 1e-9);
    }

    #[test]
    fn test_gamma_blends_central_and_upwind_linearly() {
        let u = Array2::from_shape_fn((6, 6), |(i, j)| (i * j) as f64 * 0.1);
        let v = Array2::from_shape_fn((6, 6), |(i, j)| (i + j) as f64 * 0.05);
        let central = Discretization::new(0.1, 0.1, 0.0);
        let upwind = Discretization::new(0.1, 0.1, 1.0);
        let half = Discretization::new(0.1, 0.1, 0.5);

        let c = central.convection_u(&u, &v, 2, 2);
        let w = upwind.convection_u(&u, &v, 2, 2);
        let h = half.convection_u(&u, &v, 2, 2);
        assert!((h - 0.5 * (c + w)).abs() < 1e-12);
    }
}
