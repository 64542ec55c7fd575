// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Staggered Fields
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Field matrices of the local subdomain and the per-phase update sweeps.
//!
//! Every matrix is `(size_x + 2) x (size_y + 2)`, one ghost cell per side.
//! `u(i, j)` lives on the east face of cell (i, j), `v(i, j)` on the north
//! face, `p` and `t` at cell centers; `f`/`g` are the tentative velocities
//! co-located with `u`/`v`. The sweeps read the previous phase's state in
//! full; the temperature update goes through a scratch buffer so the donor
//! stencil never reads a cell already overwritten in the same sweep.

use ndarray::Array2;

use flow_math::discretization::Discretization;
use flow_types::config::CaseConfig;

use crate::cell::BorderPosition;
use crate::grid::Grid;

/// Field selector for halo exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTag {
    U,
    V,
    P,
    T,
    F,
    G,
}

#[derive(Debug)]
pub struct Fields {
    u: Array2<f64>,
    v: Array2<f64>,
    p: Array2<f64>,
    t: Array2<f64>,
    f: Array2<f64>,
    g: Array2<f64>,
    rs: Array2<f64>,

    nu: f64,
    alpha: f64,
    beta: f64,
    gx: f64,
    gy: f64,
    tau: f64,
    energy_eq: bool,
    dt: f64,
}

impl Fields {
    /// Allocate the matrices for one rank and fill the interior with the
    /// configured initial values; the ghost layer starts at zero and is
    /// owned by the boundary operators and the halo exchange.
    pub fn new(config: &CaseConfig, size_x: usize, size_y: usize) -> Self {
        let shape = (size_x + 2, size_y + 2);
        let interior = |value: f64| {
            Array2::from_shape_fn(shape, |(i, j)| {
                if i >= 1 && i <= size_x && j >= 1 && j <= size_y {
                    value
                } else {
                    0.0
                }
            })
        };

        Fields {
            u: interior(config.ui),
            v: interior(config.vi),
            p: interior(config.pi),
            t: interior(config.ti),
            f: Array2::zeros(shape),
            g: Array2::zeros(shape),
            rs: Array2::zeros(shape),
            nu: config.nu,
            alpha: config.alpha,
            beta: config.beta,
            gx: config.gx,
            gy: config.gy,
            tau: config.tau,
            energy_eq: config.energy_eq,
            dt: config.dt,
        }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn set_dt(&mut self, dt: f64) {
        self.dt = dt;
    }

    /// Local adaptive timestep candidate, bounded by the viscous, CFL and
    /// (when the energy equation is on) thermal stability limits over the
    /// interior. Zero maxima skip their term. `tau <= 0` keeps the
    /// configured fixed step. The caller reduces the candidates across
    /// ranks before storing the result with [`set_dt`](Self::set_dt).
    pub fn calculate_dt(&self, grid: &Grid) -> f64 {
        if self.tau <= 0.0 {
            return self.dt;
        }
        let domain = grid.domain();
        let inv_sq = 1.0 / (domain.dx * domain.dx) + 1.0 / (domain.dy * domain.dy);

        let mut umax = 0.0_f64;
        let mut vmax = 0.0_f64;
        for j in 1..=grid.size_y() {
            for i in 1..=grid.size_x() {
                umax = umax.max(self.u[[i, j]].abs());
                vmax = vmax.max(self.v[[i, j]].abs());
            }
        }

        let mut limit = f64::INFINITY;
        if self.nu > 0.0 {
            limit = limit.min(0.5 / (self.nu * inv_sq));
        }
        if umax > 0.0 {
            limit = limit.min(domain.dx / umax);
        }
        if vmax > 0.0 {
            limit = limit.min(domain.dy / vmax);
        }
        if self.energy_eq && self.alpha > 0.0 {
            limit = limit.min(0.5 / (self.alpha * inv_sq));
        }

        if limit.is_finite() {
            self.tau * limit
        } else {
            self.dt
        }
    }

    /// Advance the temperature by one explicit step (diffusion + donor-cell
    /// convection), double-buffered.
    pub fn calculate_temperature(&mut self, grid: &Grid, disc: &Discretization) {
        let mut t_new = self.t.clone();
        for &(i, j) in grid.fluid_cells() {
            t_new[[i, j]] = self.t[[i, j]]
                + self.dt
                    * (self.alpha * disc.laplacian(&self.t, i, j)
                        - disc.convection_t(&self.u, &self.v, &self.t, i, j));
        }
        self.t = t_new;
    }

    /// Tentative velocities F, G on the fluid cells; faces on obstacle
    /// borders carry the boundary velocity unchanged.
    pub fn calculate_fluxes(&mut self, grid: &Grid, disc: &Discretization) {
        let dt = self.dt;
        for &(i, j) in grid.fluid_cells() {
            let mut fval = self.u[[i, j]]
                + dt * (self.nu * disc.laplacian(&self.u, i, j)
                    - disc.convection_u(&self.u, &self.v, i, j)
                    + self.gx);
            let mut gval = self.v[[i, j]]
                + dt * (self.nu * disc.laplacian(&self.v, i, j)
                    - disc.convection_v(&self.u, &self.v, i, j)
                    + self.gy);
            if self.energy_eq {
                fval -= dt * self.beta * 0.5 * (self.t[[i, j]] + self.t[[i + 1, j]]) * self.gx;
                gval -= dt * self.beta * 0.5 * (self.t[[i, j]] + self.t[[i, j + 1]]) * self.gy;
            }
            self.f[[i, j]] = fval;
            self.g[[i, j]] = gval;
        }

        for (i, j) in grid.boundary_cells() {
            for &border in grid.cell(i, j).borders() {
                match border {
                    BorderPosition::Top => self.g[[i, j]] = self.v[[i, j]],
                    BorderPosition::Bottom => self.g[[i, j - 1]] = self.v[[i, j - 1]],
                    BorderPosition::Left => self.f[[i - 1, j]] = self.u[[i - 1, j]],
                    BorderPosition::Right => self.f[[i, j]] = self.u[[i, j]],
                }
            }
        }
    }

    /// Right-hand side of the pressure Poisson equation.
    pub fn calculate_rs(&mut self, grid: &Grid, disc: &Discretization) {
        let dt = self.dt;
        for &(i, j) in grid.fluid_cells() {
            self.rs[[i, j]] = ((self.f[[i, j]] - self.f[[i - 1, j]]) / disc.dx
                + (self.g[[i, j]] - self.g[[i, j - 1]]) / disc.dy)
                / dt;
        }
    }

    /// Project the tentative velocities with the solved pressure gradient.
    pub fn calculate_velocities(&mut self, grid: &Grid, disc: &Discretization) {
        let dt = self.dt;
        for &(i, j) in grid.fluid_cells() {
            self.u[[i, j]] =
                self.f[[i, j]] - dt / disc.dx * (self.p[[i + 1, j]] - self.p[[i, j]]);
            self.v[[i, j]] =
                self.g[[i, j]] - dt / disc.dy * (self.p[[i, j + 1]] - self.p[[i, j]]);
        }
    }

    /// Sum of the discrete divergence over the fluid cells; collapses
    /// toward zero as the pressure solve converges.
    pub fn total_divergence(&self, grid: &Grid) -> f64 {
        let domain = grid.domain();
        let mut acc = 0.0;
        for &(i, j) in grid.fluid_cells() {
            acc += (self.u[[i, j]] - self.u[[i - 1, j]]) / domain.dx
                + (self.v[[i, j]] - self.v[[i, j - 1]]) / domain.dy;
        }
        acc
    }

    pub fn u(&self, i: usize, j: usize) -> f64 {
        self.u[[i, j]]
    }

    pub fn v(&self, i: usize, j: usize) -> f64 {
        self.v[[i, j]]
    }

    pub fn p(&self, i: usize, j: usize) -> f64 {
        self.p[[i, j]]
    }

    pub fn t(&self, i: usize, j: usize) -> f64 {
        self.t[[i, j]]
    }

    pub fn set_u(&mut self, i: usize, j: usize, value: f64) {
        self.u[[i, j]] = value;
    }

    pub fn set_v(&mut self, i: usize, j: usize, value: f64) {
        self.v[[i, j]] = value;
    }

    pub fn set_p(&mut self, i: usize, j: usize, value: f64) {
        self.p[[i, j]] = value;
    }

    pub fn set_t(&mut self, i: usize, j: usize, value: f64) {
        self.t[[i, j]] = value;
    }

    pub fn u_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.u[[i, j]]
    }

    pub fn v_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.v[[i, j]]
    }

    pub fn p_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.p[[i, j]]
    }

    pub fn t_mut(&mut self, i: usize, j: usize) -> &mut f64 {
        &mut self.t[[i, j]]
    }

    /// Whole-matrix view for halo exchange.
    pub fn matrix(&self, tag: FieldTag) -> &Array2<f64> {
        match tag {
            FieldTag::U => &self.u,
            FieldTag::V => &self.v,
            FieldTag::P => &self.p,
            FieldTag::T => &self.t,
            FieldTag::F => &self.f,
            FieldTag::G => &self.g,
        }
    }

    pub fn matrix_mut(&mut self, tag: FieldTag) -> &mut Array2<f64> {
        match tag {
            FieldTag::U => &mut self.u,
            FieldTag::V => &mut self.v,
            FieldTag::P => &mut self.p,
            FieldTag::T => &mut self.t,
            FieldTag::F => &mut self.f,
            FieldTag::G => &mut self.g,
        }
    }

    pub fn p_matrix(&self) -> &Array2<f64> {
        &self.p
    }

    /// Split borrow for the pressure sweep: mutable p next to read-only RS.
    pub fn p_rs_mut(&mut self) -> (&mut Array2<f64>, &Array2<f64>) {
        (&mut self.p, &self.rs)
    }

    pub fn p_matrix_mut(&mut self) -> &mut Array2<f64> {
        &mut self.p
    }

    pub fn rs_matrix(&self) -> &Array2<f64> {
        &self.rs
    }
}
