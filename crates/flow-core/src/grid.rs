// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Grid
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Local cell grid: classification of the rank's subdomain from the global
//! geometry map, plus the per-type cell lists the boundary operators and
//! solver sweeps iterate.
//!
//! Ghost cells toward a rank neighbor are tagged `Default` and appear in no
//! list; their values are owned by the halo exchange. Border detection
//! still reads the global map, so an obstacle sitting on a rank seam keeps
//! the wall faces toward fluid cells owned by the neighbor.

use ndarray::Array2;

use flow_types::domain::{Direction, Domain};
use flow_types::error::{FlowError, FlowResult};

use crate::cell::{BorderPosition, Cell, CellKind};
use crate::geometry;

#[derive(Debug)]
pub struct Grid {
    domain: Domain,
    cells: Array2<Cell>,
    fluid_cells: Vec<(usize, usize)>,
    fixed_wall_cells: Vec<(usize, usize)>,
    moving_wall_cells: Vec<(usize, usize)>,
    inlet_cells: Vec<(usize, usize)>,
    outlet_cells: Vec<(usize, usize)>,
    adiabatic_cells: Vec<(usize, usize)>,
    free_slip_cells: Vec<(usize, usize)>,
}

impl Grid {
    /// Classify this rank's slice of the global geometry map.
    ///
    /// The map covers the extended domain `(global_size_x + 2) x
    /// (global_size_y + 2)`, ghost ring included.
    pub fn from_geometry(domain: Domain, global: &Array2<i32>) -> FlowResult<Grid> {
        let expected = (domain.global_size_x + 2, domain.global_size_y + 2);
        if global.dim() != expected {
            return Err(FlowError::GeometryError(format!(
                "Geometry dimensions {:?} do not match domain {:?}",
                global.dim(),
                expected
            )));
        }

        let nx = domain.size_x + 2;
        let ny = domain.size_y + 2;
        let raw = Array2::from_shape_fn((nx, ny), |(i, j)| {
            global[[domain.imin + i, domain.jmin + j]]
        });

        let seam_ghost = |i: usize, j: usize| -> bool {
            (i == 0 && !domain.at_boundary(Direction::West))
                || (i == nx - 1 && !domain.at_boundary(Direction::East))
                || (j == 0 && !domain.at_boundary(Direction::South))
                || (j == ny - 1 && !domain.at_boundary(Direction::North))
        };
        let physical_ghost = |i: usize, j: usize| -> bool {
            (i == 0 || i == nx - 1 || j == 0 || j == ny - 1) && !seam_ghost(i, j)
        };

        let mut cells_vec = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                let cell = if seam_ghost(i, j) {
                    Cell::new(i, j, CellKind::Default, raw[[i, j]])
                } else {
                    let (kind, wall_id) = CellKind::from_geometry_id(raw[[i, j]])?;
                    if kind == CellKind::Fluid && physical_ghost(i, j) {
                        return Err(FlowError::GeometryError(format!(
                            "Ghost cell ({}, {}) classified as fluid",
                            domain.imin + i,
                            domain.jmin + j
                        )));
                    }
                    Cell::new(i, j, kind, wall_id)
                };
                cells_vec.push(cell);
            }
        }
        let mut cells = Array2::from_shape_vec((nx, ny), cells_vec)
            .map_err(|e| FlowError::GeometryError(format!("Cell matrix shape error: {e}")))?;

        // Border detection against the global map, so seam ghosts count as
        // the fluid cells they mirror.
        for i in 0..nx {
            for j in 0..ny {
                let kind = cells[[i, j]].kind();
                if kind == CellKind::Fluid || kind == CellKind::Default {
                    continue;
                }
                for pos in BorderPosition::ALL {
                    let (di, dj) = pos.offset();
                    let (ni, nj) = (i as isize + di, j as isize + dj);
                    if ni < 0 || nj < 0 || ni >= nx as isize || nj >= ny as isize {
                        continue;
                    }
                    if raw[[ni as usize, nj as usize]] == 0 {
                        cells[[i, j]].add_border(pos);
                    }
                }
                let n_borders = cells[[i, j]].borders().len();
                if n_borders > 2 {
                    return Err(FlowError::GeometryError(format!(
                        "Obstacle cell ({}, {}) touches fluid on {} sides; at most two are supported",
                        domain.imin + i,
                        domain.jmin + j,
                        n_borders
                    )));
                }
            }
        }

        let mut grid = Grid {
            domain,
            cells,
            fluid_cells: Vec::new(),
            fixed_wall_cells: Vec::new(),
            moving_wall_cells: Vec::new(),
            inlet_cells: Vec::new(),
            outlet_cells: Vec::new(),
            adiabatic_cells: Vec::new(),
            free_slip_cells: Vec::new(),
        };
        for j in 0..ny {
            for i in 0..nx {
                match grid.cells[[i, j]].kind() {
                    CellKind::Fluid => grid.fluid_cells.push((i, j)),
                    CellKind::FixedWall => grid.fixed_wall_cells.push((i, j)),
                    CellKind::MovingWall => grid.moving_wall_cells.push((i, j)),
                    CellKind::Inlet => grid.inlet_cells.push((i, j)),
                    CellKind::Outlet => grid.outlet_cells.push((i, j)),
                    CellKind::Adiabatic => grid.adiabatic_cells.push((i, j)),
                    CellKind::FreeSlip => grid.free_slip_cells.push((i, j)),
                    CellKind::Default => {}
                }
            }
        }
        Ok(grid)
    }

    /// Built-in lid-driven cavity grid for this subdomain.
    pub fn lid_driven_cavity(domain: Domain) -> FlowResult<Grid> {
        let map = geometry::lid_driven_cavity_map(domain.global_size_x, domain.global_size_y);
        Grid::from_geometry(domain, &map)
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn cell(&self, i: usize, j: usize) -> &Cell {
        &self.cells[[i, j]]
    }

    /// Interior cells owned by this rank, ghost layer excluded.
    pub fn size_x(&self) -> usize {
        self.domain.size_x
    }

    pub fn size_y(&self) -> usize {
        self.domain.size_y
    }

    pub fn fluid_cells(&self) -> &[(usize, usize)] {
        &self.fluid_cells
    }

    pub fn fixed_wall_cells(&self) -> &[(usize, usize)] {
        &self.fixed_wall_cells
    }

    pub fn moving_wall_cells(&self) -> &[(usize, usize)] {
        &self.moving_wall_cells
    }

    pub fn inlet_cells(&self) -> &[(usize, usize)] {
        &self.inlet_cells
    }

    pub fn outlet_cells(&self) -> &[(usize, usize)] {
        &self.outlet_cells
    }

    pub fn adiabatic_cells(&self) -> &[(usize, usize)] {
        &self.adiabatic_cells
    }

    pub fn free_slip_cells(&self) -> &[(usize, usize)] {
        &self.free_slip_cells
    }

    /// All classified non-fluid cells, in boundary apply order.
    pub fn boundary_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.moving_wall_cells
            .iter()
            .chain(&self.inlet_cells)
            .chain(&self.outlet_cells)
            .chain(&self.fixed_wall_cells)
            .chain(&self.free_slip_cells)
            .chain(&self.adiabatic_cells)
            .copied()
    }
}
