// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Boundary Operators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Boundary condition operators, one variant per cell family.
//!
//! Each variant owns its classified cell list and touches only the faces
//! of those cells. Velocity conditions run in two passes per cell —
//! tangential reconstruction first, then wall-normal faces — so that a
//! two-border corner ends with both normal faces zeroed regardless of the
//! border enumeration order.

use std::collections::BTreeMap;

use crate::cell::BorderPosition;
use crate::fields::Fields;
use crate::grid::Grid;
use flow_types::config::{CaseConfig, MOVING_WALL_VELOCITY};

#[derive(Debug)]
pub enum Boundary {
    /// No-slip wall; optional Dirichlet wall temperatures keyed by wall id.
    FixedWall {
        cells: Vec<(usize, usize)>,
        wall_temps: BTreeMap<i32, f64>,
    },
    /// No-slip wall moving tangentially with the given velocity.
    MovingWall {
        cells: Vec<(usize, usize)>,
        velocity: f64,
    },
    /// Zero shear: tangential velocity copied, normal velocity zero.
    FreeSlip { cells: Vec<(usize, usize)> },
    /// Prescribed inflow velocity and temperature.
    Inlet {
        cells: Vec<(usize, usize)>,
        uin: f64,
        vin: f64,
        tin: f64,
    },
    /// Zero-gradient outflow; pressure pinned to the reference value.
    Outlet { cells: Vec<(usize, usize)> },
    /// No-slip wall with a zero-flux temperature condition.
    Adiabatic { cells: Vec<(usize, usize)> },
}

/// Boundary set for one rank, in apply order: moving walls, inlets,
/// outlets, fixed walls, free-slip, adiabatic.
pub fn build_boundaries(config: &CaseConfig, grid: &Grid) -> Vec<Boundary> {
    let mut out = Vec::new();
    if !grid.moving_wall_cells().is_empty() {
        out.push(Boundary::MovingWall {
            cells: grid.moving_wall_cells().to_vec(),
            velocity: MOVING_WALL_VELOCITY,
        });
    }
    if !grid.inlet_cells().is_empty() {
        out.push(Boundary::Inlet {
            cells: grid.inlet_cells().to_vec(),
            uin: config.uin,
            vin: config.vin,
            tin: config.ti,
        });
    }
    if !grid.outlet_cells().is_empty() {
        out.push(Boundary::Outlet {
            cells: grid.outlet_cells().to_vec(),
        });
    }
    if !grid.fixed_wall_cells().is_empty() {
        out.push(Boundary::FixedWall {
            cells: grid.fixed_wall_cells().to_vec(),
            wall_temps: config.wall_temps.clone(),
        });
    }
    if !grid.free_slip_cells().is_empty() {
        out.push(Boundary::FreeSlip {
            cells: grid.free_slip_cells().to_vec(),
        });
    }
    if !grid.adiabatic_cells().is_empty() {
        out.push(Boundary::Adiabatic {
            cells: grid.adiabatic_cells().to_vec(),
        });
    }
    out
}

impl Boundary {
    /// Velocity conditions.
    pub fn apply(&self, grid: &Grid, fields: &mut Fields) {
        match self {
            Boundary::FixedWall { cells, .. } | Boundary::Adiabatic { cells } => {
                apply_noslip(cells, grid, fields, 0.0);
            }
            Boundary::MovingWall { cells, velocity } => {
                apply_noslip(cells, grid, fields, *velocity);
            }
            Boundary::FreeSlip { cells } => {
                for &(i, j) in cells {
                    let borders = grid.cell(i, j).borders();
                    for &b in borders {
                        match b {
                            BorderPosition::Top => fields.set_u(i, j, fields.u(i, j + 1)),
                            BorderPosition::Bottom => fields.set_u(i, j, fields.u(i, j - 1)),
                            BorderPosition::Left => fields.set_v(i, j, fields.v(i - 1, j)),
                            BorderPosition::Right => fields.set_v(i, j, fields.v(i + 1, j)),
                        }
                    }
                    zero_normal_faces(borders, i, j, fields);
                }
            }
            Boundary::Inlet {
                cells, uin, vin, ..
            } => {
                for &(i, j) in cells {
                    let borders = grid.cell(i, j).borders();
                    for &b in borders {
                        match b {
                            BorderPosition::Top => {
                                fields.set_u(i, j, 2.0 * uin - fields.u(i, j + 1))
                            }
                            BorderPosition::Bottom => {
                                fields.set_u(i, j, 2.0 * uin - fields.u(i, j - 1))
                            }
                            BorderPosition::Left => {
                                fields.set_v(i, j, 2.0 * vin - fields.v(i - 1, j))
                            }
                            BorderPosition::Right => {
                                fields.set_v(i, j, 2.0 * vin - fields.v(i + 1, j))
                            }
                        }
                    }
                    for &b in borders {
                        match b {
                            BorderPosition::Top => fields.set_v(i, j, *vin),
                            BorderPosition::Bottom => fields.set_v(i, j - 1, *vin),
                            BorderPosition::Left => fields.set_u(i - 1, j, *uin),
                            BorderPosition::Right => fields.set_u(i, j, *uin),
                        }
                    }
                }
            }
            Boundary::Outlet { cells } => {
                for &(i, j) in cells {
                    for &b in grid.cell(i, j).borders() {
                        match b {
                            BorderPosition::Top => {
                                fields.set_u(i, j, fields.u(i, j + 1));
                                fields.set_v(i, j, fields.v(i, j + 1));
                            }
                            BorderPosition::Bottom => {
                                fields.set_u(i, j, fields.u(i, j - 1));
                                fields.set_v(i, j, fields.v(i, j - 1));
                            }
                            BorderPosition::Left => {
                                fields.set_u(i, j, fields.u(i - 1, j));
                                fields.set_v(i, j, fields.v(i - 1, j));
                            }
                            BorderPosition::Right => {
                                fields.set_u(i, j, fields.u(i + 1, j));
                                fields.set_v(i, j, fields.v(i + 1, j));
                            }
                        }
                    }
                }
            }
        }
    }

    /// Pressure conditions: homogeneous Neumann everywhere except the
    /// outlet, which pins the reference value 0.
    pub fn apply_pressure(&self, grid: &Grid, fields: &mut Fields) {
        match self {
            Boundary::Outlet { cells } => {
                for &(i, j) in cells {
                    if !grid.cell(i, j).borders().is_empty() {
                        fields.set_p(i, j, 0.0);
                    }
                }
            }
            Boundary::FixedWall { cells, .. }
            | Boundary::MovingWall { cells, .. }
            | Boundary::FreeSlip { cells }
            | Boundary::Inlet { cells, .. }
            | Boundary::Adiabatic { cells } => {
                for &(i, j) in cells {
                    let borders = grid.cell(i, j).borders();
                    if borders.is_empty() {
                        continue;
                    }
                    let avg = fluid_average(borders, i, j, |i, j| fields.p(i, j));
                    fields.set_p(i, j, avg);
                }
            }
        }
    }

    /// Temperature conditions.
    pub fn apply_temperature(&self, grid: &Grid, fields: &mut Fields) {
        match self {
            Boundary::FixedWall { cells, wall_temps } => {
                for &(i, j) in cells {
                    let borders = grid.cell(i, j).borders();
                    if borders.is_empty() {
                        continue;
                    }
                    let mirror = fluid_average(borders, i, j, |i, j| fields.t(i, j));
                    let value = match wall_temps.get(&grid.cell(i, j).wall_id()) {
                        Some(&tw) => 2.0 * tw - mirror,
                        None => mirror,
                    };
                    fields.set_t(i, j, value);
                }
            }
            Boundary::Inlet { cells, tin, .. } => {
                for &(i, j) in cells {
                    let borders = grid.cell(i, j).borders();
                    if borders.is_empty() {
                        continue;
                    }
                    let mirror = fluid_average(borders, i, j, |i, j| fields.t(i, j));
                    fields.set_t(i, j, 2.0 * tin - mirror);
                }
            }
            Boundary::MovingWall { cells, .. }
            | Boundary::FreeSlip { cells }
            | Boundary::Outlet { cells }
            | Boundary::Adiabatic { cells } => {
                for &(i, j) in cells {
                    let borders = grid.cell(i, j).borders();
                    if borders.is_empty() {
                        continue;
                    }
                    let mirror = fluid_average(borders, i, j, |i, j| fields.t(i, j));
                    fields.set_t(i, j, mirror);
                }
            }
        }
    }
}

/// No-slip velocity condition with tangential wall speed `wall_vel`
/// (0 for resting walls). The reflected average across each wall face
/// equals `wall_vel`; normal faces are zeroed afterwards.
fn apply_noslip(cells: &[(usize, usize)], grid: &Grid, fields: &mut Fields, wall_vel: f64) {
    for &(i, j) in cells {
        let borders = grid.cell(i, j).borders();
        for &b in borders {
            match b {
                BorderPosition::Top => fields.set_u(i, j, 2.0 * wall_vel - fields.u(i, j + 1)),
                BorderPosition::Bottom => fields.set_u(i, j, 2.0 * wall_vel - fields.u(i, j - 1)),
                BorderPosition::Left => fields.set_v(i, j, 2.0 * wall_vel - fields.v(i - 1, j)),
                BorderPosition::Right => fields.set_v(i, j, 2.0 * wall_vel - fields.v(i + 1, j)),
            }
        }
        zero_normal_faces(borders, i, j, fields);
    }
}

fn zero_normal_faces(borders: &[BorderPosition], i: usize, j: usize, fields: &mut Fields) {
    for &b in borders {
        match b {
            BorderPosition::Top => fields.set_v(i, j, 0.0),
            BorderPosition::Bottom => fields.set_v(i, j - 1, 0.0),
            BorderPosition::Left => fields.set_u(i - 1, j, 0.0),
            BorderPosition::Right => fields.set_u(i, j, 0.0),
        }
    }
}

/// Average of a field over the cell's fluid neighbors (1 or 2 of them).
fn fluid_average<F>(borders: &[BorderPosition], i: usize, j: usize, value: F) -> f64
where
    F: Fn(usize, usize) -> f64,
{
    let mut sum = 0.0;
    for &b in borders {
        let (di, dj) = b.offset();
        sum += value((i as isize + di) as usize, (j as isize + dj) as usize);
    }
    sum / borders.len() as f64
}
