// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Domain Decomposition
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Deterministic domain partition metadata for the 2D rank tiling.
//!
//! Rank r owns tile `(r % iproc, r / iproc)`. Each tile carries a one-cell
//! ghost layer on every side; ghost cells toward a real neighbor are filled
//! by halo exchange, the others by physical boundary operators.

use serde::{Deserialize, Serialize};

use crate::config::CaseConfig;
use crate::error::{FlowError, FlowResult};

/// Cardinal directions in the fixed neighbor order east, north, west, south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    East = 0,
    North = 1,
    West = 2,
    South = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ];

    /// The direction a message sent this way arrives from.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::East => Direction::West,
            Direction::North => Direction::South,
            Direction::West => Direction::East,
            Direction::South => Direction::North,
        }
    }
}

/// Immutable per-rank subdomain descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub rank: usize,
    pub nranks: usize,

    /// Uniform cell sizes, identical on all ranks.
    pub dx: f64,
    pub dy: f64,

    /// Interior cells of the whole problem.
    pub global_size_x: usize,
    pub global_size_y: usize,

    /// Interior cells owned by this rank (ghost layer excluded).
    pub size_x: usize,
    pub size_y: usize,

    /// Global indices bounding the local subdomain including its ghost
    /// layer; `imax - imin == size_x + 2`.
    pub imin: usize,
    pub jmin: usize,
    pub imax: usize,
    pub jmax: usize,

    /// Neighbor ranks east, north, west, south; `None` at a physical edge.
    pub neighbors: [Option<usize>; 4],
}

impl Domain {
    pub fn neighbor(&self, dir: Direction) -> Option<usize> {
        self.neighbors[dir as usize]
    }

    /// Whether this rank touches the physical boundary in direction `dir`.
    pub fn at_boundary(&self, dir: Direction) -> bool {
        self.neighbor(dir).is_none()
    }

    /// Partition the global grid into an `iproc x jproc` rank tiling.
    ///
    /// Cells are distributed as evenly as possible; the remainder goes to
    /// the lower-indexed tiles, so every tile size is `base` or `base + 1`.
    pub fn decompose(config: &CaseConfig) -> FlowResult<Vec<Domain>> {
        let (imax, jmax) = (config.imax, config.jmax);
        let (iproc, jproc) = (config.iproc, config.jproc);
        if imax == 0 || jmax == 0 {
            return Err(FlowError::ConfigError(
                "Decomposition requires imax, jmax >= 1".to_string(),
            ));
        }
        if iproc == 0 || jproc == 0 {
            return Err(FlowError::ConfigError(
                "Decomposition requires iproc, jproc >= 1".to_string(),
            ));
        }
        if iproc > imax || jproc > jmax {
            return Err(FlowError::ConfigError(format!(
                "Cannot split {imax}x{jmax} cells across {iproc}x{jproc} ranks"
            )));
        }

        let splits_x = split_extents(imax, iproc);
        let splits_y = split_extents(jmax, jproc);
        let nranks = iproc * jproc;

        let mut out = Vec::with_capacity(nranks);
        for rank in 0..nranks {
            let ti = rank % iproc;
            let tj = rank / iproc;
            let (x_start, size_x) = splits_x[ti];
            let (y_start, size_y) = splits_y[tj];

            let east = (ti + 1 < iproc).then(|| rank + 1);
            let north = (tj + 1 < jproc).then(|| rank + iproc);
            let west = (ti > 0).then(|| rank - 1);
            let south = (tj > 0).then(|| rank - iproc);

            out.push(Domain {
                rank,
                nranks,
                dx: config.dx(),
                dy: config.dy(),
                global_size_x: imax,
                global_size_y: jmax,
                size_x,
                size_y,
                imin: x_start,
                jmin: y_start,
                imax: x_start + size_x + 2,
                jmax: y_start + size_y + 2,
                neighbors: [east, north, west, south],
            });
        }
        Ok(out)
    }
}

/// Split `n` cells across `parts` tiles: (start, extent) per tile.
fn split_extents(n: usize, parts: usize) -> Vec<(usize, usize)> {
    let base = n / parts;
    let rem = n % parts;
    let mut out = Vec::with_capacity(parts);
    let mut cursor = 0;
    for p in 0..parts {
        let extent = base + usize::from(p < rem);
        out.push((cursor, extent));
        cursor += extent;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(imax: usize, jmax: usize, iproc: usize, jproc: usize) -> CaseConfig {
        CaseConfig {
            imax,
            jmax,
            xlength: imax as f64,
            ylength: jmax as f64,
            iproc,
            jproc,
            ..CaseConfig::default()
        }
    }

    #[test]
    fn test_decompose_covers_domain() {
        let domains = Domain::decompose(&config(17, 9, 4, 2)).expect("decomposition must succeed");
        assert_eq!(domains.len(), 8);
        let covered_x: usize = domains.iter().take(4).map(|d| d.size_x).sum();
        assert_eq!(covered_x, 17);
        let covered_y: usize = (0..2).map(|tj| domains[tj * 4].size_y).sum();
        assert_eq!(covered_y, 9);
        for d in &domains {
            assert_eq!(d.imax - d.imin, d.size_x + 2);
            assert_eq!(d.jmax - d.jmin, d.size_y + 2);
        }
    }

    #[test]
    fn test_neighbors_at_edges() {
        let domains = Domain::decompose(&config(8, 8, 2, 2)).expect("decompose");
        // Rank 0: south-west tile.
        assert_eq!(domains[0].neighbor(Direction::East), Some(1));
        assert_eq!(domains[0].neighbor(Direction::North), Some(2));
        assert_eq!(domains[0].neighbor(Direction::West), None);
        assert_eq!(domains[0].neighbor(Direction::South), None);
        // Rank 3: north-east tile.
        assert_eq!(domains[3].neighbor(Direction::East), None);
        assert_eq!(domains[3].neighbor(Direction::North), None);
        assert_eq!(domains[3].neighbor(Direction::West), Some(2));
        assert_eq!(domains[3].neighbor(Direction::South), Some(1));
    }

    #[test]
    fn test_single_rank_has_no_neighbors() {
        let domains = Domain::decompose(&config(8, 8, 1, 1)).expect("decompose");
        assert_eq!(domains.len(), 1);
        assert!(Direction::ALL.iter().all(|&d| domains[0].at_boundary(d)));
        assert_eq!(domains[0].size_x, 8);
        assert_eq!(domains[0].size_y, 8);
    }

    #[test]
    fn test_oversplit_rejected() {
        let err = Domain::decompose(&config(3, 3, 4, 1)).expect_err("oversplit must error");
        match err {
            FlowError::ConfigError(msg) => assert!(msg.contains("Cannot split")),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_opposite_directions() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }
}
