// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Cell
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-cell classification data.
//!
//! Cells live in a contiguous matrix; adjacency is index arithmetic, never
//! pointers. A non-fluid cell records which of its sides face a fluid cell
//! in the fixed enumeration order top, bottom, left, right.

use flow_types::error::{FlowError, FlowResult};

/// Sides of a cell, in border enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderPosition {
    Top,
    Bottom,
    Left,
    Right,
}

impl BorderPosition {
    pub const ALL: [BorderPosition; 4] = [
        BorderPosition::Top,
        BorderPosition::Bottom,
        BorderPosition::Left,
        BorderPosition::Right,
    ];

    /// Index offset (di, dj) toward the neighbor on this side.
    pub fn offset(self) -> (isize, isize) {
        match self {
            BorderPosition::Top => (0, 1),
            BorderPosition::Bottom => (0, -1),
            BorderPosition::Left => (-1, 0),
            BorderPosition::Right => (1, 0),
        }
    }
}

/// Closed cell-type tag. `Default` marks exterior/ghost cells owned by a
/// rank neighbor (never the target of a physical boundary operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Fluid,
    Inlet,
    Outlet,
    FixedWall,
    MovingWall,
    FreeSlip,
    Adiabatic,
    Default,
}

impl CellKind {
    /// Decode the geometry-map id (0..=8).
    pub fn from_geometry_id(id: i32) -> FlowResult<(CellKind, i32)> {
        let kind = match id {
            0 => CellKind::Fluid,
            1 => CellKind::Inlet,
            2 => CellKind::Outlet,
            3..=5 => CellKind::FixedWall,
            6 => CellKind::MovingWall,
            7 => CellKind::FreeSlip,
            8 => CellKind::Adiabatic,
            other => {
                return Err(FlowError::GeometryError(format!(
                    "Unknown geometry id {other}"
                )))
            }
        };
        Ok((kind, id))
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    i: usize,
    j: usize,
    kind: CellKind,
    /// Geometry id the cell was built from; selects the wall temperature
    /// for fixed walls (3, 4, 5).
    wall_id: i32,
    borders: Vec<BorderPosition>,
}

impl Cell {
    pub fn new(i: usize, j: usize, kind: CellKind, wall_id: i32) -> Self {
        Cell {
            i,
            j,
            kind,
            wall_id,
            borders: Vec::new(),
        }
    }

    pub fn i(&self) -> usize {
        self.i
    }

    pub fn j(&self) -> usize {
        self.j
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn wall_id(&self) -> i32 {
        self.wall_id
    }

    /// Fluid-facing sides in top/bottom/left/right order.
    pub fn borders(&self) -> &[BorderPosition] {
        &self.borders
    }

    pub fn is_border(&self, pos: BorderPosition) -> bool {
        self.borders.contains(&pos)
    }

    pub(crate) fn add_border(&mut self, pos: BorderPosition) {
        self.borders.push(pos);
    }
}
