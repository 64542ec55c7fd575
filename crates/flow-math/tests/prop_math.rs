// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Property-Based Tests (proptest) for flow-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for flow-math using proptest.
//!
//! Covers: Laplacian/sor_helper consistency, donor-cell blend linearity,
//! SOR residual decrease and fluid-cell confinement.

use flow_math::discretization::Discretization;
use flow_math::sor::{sor_residual_sq, sor_sweep};
use ndarray::Array2;
use proptest::prelude::*;

fn interior(n: usize) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for j in 1..n - 1 {
        for i in 1..n - 1 {
            cells.push((i, j));
        }
    }
    cells
}

// ── Stencil properties ───────────────────────────────────────────────

proptest! {
    /// The Laplacian of an affine field a(x, y) = c0 + cx*x + cy*y is zero.
    #[test]
    fn laplacian_annihilates_affine_fields(
        c0 in -10.0..10.0f64,
        cx in -5.0..5.0f64,
        cy in -5.0..5.0f64,
    ) {
        let disc = Discretization::new(0.1, 0.2, 0.3);
        let a = Array2::from_shape_fn((8, 8), |(i, j)| {
            c0 + cx * i as f64 * disc.dx + cy * j as f64 * disc.dy
        });
        for j in 1..7 {
            for i in 1..7 {
                prop_assert!(disc.laplacian(&a, i, j).abs() < 1e-9);
            }
        }
    }

    /// sor_helper is the Laplacian with the center term removed.
    #[test]
    fn sor_helper_completes_the_laplacian(seed in 0u64..1000) {
        let disc = Discretization::new(0.05, 0.07, 0.0);
        let p = Array2::from_shape_fn((8, 8), |(i, j)| {
            (((i * 31 + j * 17 + seed as usize * 7) % 23) as f64) * 0.3 - 3.0
        });
        let center = 2.0 * (1.0 / (disc.dx * disc.dx) + 1.0 / (disc.dy * disc.dy));
        for j in 1..7 {
            for i in 1..7 {
                let lhs = disc.sor_helper(&p, i, j) - center * p[[i, j]];
                prop_assert!((lhs - disc.laplacian(&p, i, j)).abs() < 1e-8);
            }
        }
    }

    /// The donor-cell convection terms are linear in gamma: the value at any
    /// blend factor is the straight line between central and full upwind.
    #[test]
    fn donor_cell_blend_is_linear_in_gamma(g in 0.0..1.0f64, seed in 0u64..1000) {
        let make = |gamma| Discretization::new(0.1, 0.1, gamma);
        let u = Array2::from_shape_fn((8, 8), |(i, j)| {
            (((i * 13 + j * 29 + seed as usize) % 19) as f64) * 0.2 - 1.5
        });
        let v = Array2::from_shape_fn((8, 8), |(i, j)| {
            (((i * 7 + j * 11 + seed as usize * 3) % 17) as f64) * 0.25 - 2.0
        });

        let central = make(0.0).convection_u(&u, &v, 3, 3);
        let upwind = make(1.0).convection_u(&u, &v, 3, 3);
        let blended = make(g).convection_u(&u, &v, 3, 3);
        prop_assert!((blended - ((1.0 - g) * central + g * upwind)).abs() < 1e-10);
    }
}

// ── SOR properties ───────────────────────────────────────────────────

proptest! {
    /// With zero RHS and zero boundary the solution stays identically zero.
    #[test]
    fn sor_zero_rhs_preserves_zero(n in 6usize..20, iters in 1usize..60) {
        let disc = Discretization::new(1.0 / n as f64, 1.0 / n as f64, 0.0);
        let fluid = interior(n);
        let mut p = Array2::zeros((n, n));
        let rs = Array2::zeros((n, n));

        for _ in 0..iters {
            sor_sweep(&mut p, &rs, &fluid, &disc, 1.6);
        }
        let max: f64 = p.iter().fold(0.0_f64, |a, &b| a.max(b.abs()));
        prop_assert!(max < 1e-13, "Zero RHS should keep zero, got {max}");
    }

    /// Sweeping reduces the residual on a constant-RHS problem for any
    /// admissible omega.
    #[test]
    fn sor_residual_decreases(omega in 0.5..1.9f64) {
        let n = 16;
        let disc = Discretization::new(1.0 / n as f64, 1.0 / n as f64, 0.0);
        let fluid = interior(n);
        let mut p = Array2::zeros((n, n));
        let rs = Array2::from_elem((n, n), -1.0);

        let before = sor_residual_sq(&p, &rs, &fluid, &disc);
        for _ in 0..60 {
            sor_sweep(&mut p, &rs, &fluid, &disc, omega);
        }
        let after = sor_residual_sq(&p, &rs, &fluid, &disc);
        prop_assert!(after < before, "Residual should decrease: {before} -> {after}");
        prop_assert!(!p.iter().any(|v| v.is_nan()));
    }

    /// The sweep writes only the listed cells.
    #[test]
    fn sor_confined_to_fluid_list(i0 in 2usize..8, j0 in 2usize..8) {
        let n = 12;
        let disc = Discretization::new(0.1, 0.1, 0.0);
        let fluid = vec![(i0, j0)];
        let mut p = Array2::from_elem((n, n), 1.0);
        let rs = Array2::from_elem((n, n), 0.5);

        sor_sweep(&mut p, &rs, &fluid, &disc, 1.4);

        for j in 0..n {
            for i in 0..n {
                if (i, j) != (i0, j0) {
                    prop_assert!((p[[i, j]] - 1.0).abs() < 1e-15);
                }
            }
        }
    }
}
