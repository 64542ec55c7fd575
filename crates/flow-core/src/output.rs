// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Snapshot Output
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-timestep field snapshots.
//!
//! The solver emits through the [`SnapshotSink`] seam; the shipped
//! implementation writes one legacy-ASCII VTK structured-grid file per
//! rank per emitted timestep, `<case>_<rank>_<timestep>.vtk` under
//! `<case>_Output/`. Pressure (and temperature) are cell-centered;
//! velocity is point-centered, averaged from the staggered faces.
//! Non-fluid cells are blanked to zero. IO failures are warnings, not
//! errors: a run does not die because a snapshot could not be written.

use std::fmt::Write as _;
use std::path::PathBuf;

use log::warn;

use flow_types::config::CaseConfig;
use flow_types::error::FlowResult;

use crate::cell::CellKind;
use crate::fields::Fields;
use crate::grid::Grid;

/// Consumer of per-timestep field snapshots.
pub trait SnapshotSink {
    fn emit(&mut self, rank: usize, timestep: usize, grid: &Grid, fields: &Fields);
}

/// Discards every snapshot.
pub struct NullSink;

impl SnapshotSink for NullSink {
    fn emit(&mut self, _rank: usize, _timestep: usize, _grid: &Grid, _fields: &Fields) {}
}

/// Legacy-ASCII VTK writer.
pub struct VtkWriter {
    case_name: String,
    output_dir: PathBuf,
    energy_eq: bool,
}

impl VtkWriter {
    /// Create the writer and its output directory. A directory that cannot
    /// be created is reported once; subsequent writes will fail and warn.
    pub fn create(config: &CaseConfig) -> Self {
        let output_dir = config.output_dir();
        if let Err(err) = std::fs::create_dir_all(&output_dir) {
            warn!(
                "Output directory {} could not be created: {err}; snapshots will be dropped",
                output_dir.display()
            );
        }
        VtkWriter {
            case_name: config.case_name.clone(),
            output_dir,
            energy_eq: config.energy_eq,
        }
    }

    fn write_file(&self, rank: usize, timestep: usize, grid: &Grid, fields: &Fields) -> FlowResult<()> {
        let path = self.output_dir.join(format!(
            "{}_{}_{}.vtk",
            self.case_name, rank, timestep
        ));
        let body = render_vtk(&self.case_name, grid, fields, self.energy_eq);
        std::fs::write(path, body)?;
        Ok(())
    }
}

impl SnapshotSink for VtkWriter {
    fn emit(&mut self, rank: usize, timestep: usize, grid: &Grid, fields: &Fields) {
        if let Err(err) = self.write_file(rank, timestep, grid, fields) {
            warn!("Snapshot write failed for rank {rank} at timestep {timestep}: {err}");
        }
    }
}

/// Render the structured-grid snapshot body.
fn render_vtk(case_name: &str, grid: &Grid, fields: &Fields, energy_eq: bool) -> String {
    let domain = grid.domain();
    let (size_x, size_y) = (domain.size_x, domain.size_y);
    let (dx, dy) = (domain.dx, domain.dy);
    let points_x = size_x + 1;
    let points_y = size_y + 1;

    let mut out = String::new();
    let _ = writeln!(out, "# vtk DataFile Version 3.0");
    let _ = writeln!(out, "{case_name} snapshot");
    let _ = writeln!(out, "ASCII");
    let _ = writeln!(out, "DATASET STRUCTURED_GRID");
    let _ = writeln!(out, "DIMENSIONS {points_x} {points_y} 1");
    let _ = writeln!(out, "POINTS {} double", points_x * points_y);

    // Grid nodes: the subdomain's interior cell corners in global
    // coordinates.
    for j in 0..points_y {
        let y = (domain.jmin + j + 1) as f64 * dy;
        for i in 0..points_x {
            let x = (domain.imin + i + 1) as f64 * dx;
            let _ = writeln!(out, "{x} {y} 0");
        }
    }

    let _ = writeln!(out, "CELL_DATA {}", size_x * size_y);
    let _ = writeln!(out, "SCALARS pressure double 1");
    let _ = writeln!(out, "LOOKUP_TABLE default");
    for j in 1..=size_y {
        for i in 1..=size_x {
            let value = if grid.cell(i, j).kind() == CellKind::Fluid {
                fields.p(i, j)
            } else {
                0.0
            };
            let _ = writeln!(out, "{value}");
        }
    }

    if energy_eq {
        let _ = writeln!(out, "SCALARS temperature double 1");
        let _ = writeln!(out, "LOOKUP_TABLE default");
        for j in 1..=size_y {
            for i in 1..=size_x {
                let value = if grid.cell(i, j).kind() == CellKind::Fluid {
                    fields.t(i, j)
                } else {
                    0.0
                };
                let _ = writeln!(out, "{value}");
            }
        }
    }

    let _ = writeln!(out, "POINT_DATA {}", points_x * points_y);
    let _ = writeln!(out, "VECTORS velocity double");
    for j in 0..points_y {
        for i in 0..points_x {
            let vx = 0.5 * (fields.u(i, j) + fields.u(i, j + 1));
            let vy = 0.5 * (fields.v(i, j) + fields.v(i + 1, j));
            let _ = writeln!(out, "{vx} {vy} 0");
        }
    }
    out
}
