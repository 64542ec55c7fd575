// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Halo Exchange
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Ghost-layer exchange and reduction primitives over the rank set.
//!
//! Pack/apply work on one block; [`exchange_blocks`] runs the 4-neighbor
//! exchange across all blocks of the in-process rank set and returns only
//! once every block is updated, so the caller may treat it as a barrier.
//! The same pack/apply primitives can be wired to rsmpi send/recv pairs in
//! a later phase. Corners are never exchanged; the solver stencils do not
//! read ghost corners. Directions without a neighbor are left untouched —
//! those ghost cells are owned by the physical boundary operators.

use ndarray::Array2;

use flow_types::domain::{Direction, Domain};
use flow_types::error::{FlowError, FlowResult};

/// Pack the outermost interior column/row facing `dir` into a contiguous
/// send buffer, corners excluded.
pub fn pack_border(field: &Array2<f64>, dir: Direction) -> Vec<f64> {
    let (nx, ny) = field.dim();
    match dir {
        Direction::East => (1..ny - 1).map(|j| field[[nx - 2, j]]).collect(),
        Direction::West => (1..ny - 1).map(|j| field[[1, j]]).collect(),
        Direction::North => (1..nx - 1).map(|i| field[[i, ny - 2]]).collect(),
        Direction::South => (1..nx - 1).map(|i| field[[i, 1]]).collect(),
    }
}

/// Write a received buffer into the ghost column/row on side `dir`.
pub fn apply_ghost(field: &mut Array2<f64>, dir: Direction, data: &[f64]) -> FlowResult<()> {
    let (nx, ny) = field.dim();
    let expected = match dir {
        Direction::East | Direction::West => ny - 2,
        Direction::North | Direction::South => nx - 2,
    };
    if data.len() != expected {
        return Err(FlowError::CommError(format!(
            "Halo buffer length mismatch on side {dir:?}: expected {expected}, got {}",
            data.len()
        )));
    }
    match dir {
        Direction::East => {
            for (j, &v) in (1..ny - 1).zip(data) {
                field[[nx - 1, j]] = v;
            }
        }
        Direction::West => {
            for (j, &v) in (1..ny - 1).zip(data) {
                field[[0, j]] = v;
            }
        }
        Direction::North => {
            for (i, &v) in (1..nx - 1).zip(data) {
                field[[i, ny - 1]] = v;
            }
        }
        Direction::South => {
            for (i, &v) in (1..nx - 1).zip(data) {
                field[[i, 0]] = v;
            }
        }
    }
    Ok(())
}

/// Exchange the one-cell ghost layer of one field across the whole rank
/// set: every send buffer is packed before any ghost cell is written, so
/// the result is independent of rank order.
pub fn exchange_blocks(blocks: &mut [Array2<f64>], domains: &[Domain]) -> FlowResult<()> {
    if blocks.len() != domains.len() {
        return Err(FlowError::CommError(format!(
            "blocks/domains mismatch: {} vs {}",
            blocks.len(),
            domains.len()
        )));
    }

    let mut inbox: Vec<[Option<Vec<f64>>; 4]> = (0..blocks.len())
        .map(|_| [None, None, None, None])
        .collect();
    for (block, domain) in blocks.iter().zip(domains) {
        for dir in Direction::ALL {
            if let Some(nb) = domain.neighbor(dir) {
                if nb >= blocks.len() {
                    return Err(FlowError::CommError(format!(
                        "Rank {} names neighbor {nb} outside the rank set",
                        domain.rank
                    )));
                }
                inbox[nb][dir.opposite() as usize] = Some(pack_border(block, dir));
            }
        }
    }

    for (idx, block) in blocks.iter_mut().enumerate() {
        for dir in Direction::ALL {
            if let Some(buf) = inbox[idx][dir as usize].take() {
                apply_ghost(block, dir, &buf)?;
            }
        }
    }
    Ok(())
}

/// Global minimum over the rank-local values.
pub fn reduce_min(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().fold(f64::INFINITY, f64::min)
}

/// Global sum over the rank-local values.
pub fn reduce_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    values.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_types::config::CaseConfig;

    fn domains(imax: usize, jmax: usize, iproc: usize, jproc: usize) -> Vec<Domain> {
        let config = CaseConfig {
            imax,
            jmax,
            xlength: imax as f64,
            ylength: jmax as f64,
            iproc,
            jproc,
            ..CaseConfig::default()
        };
        Domain::decompose(&config).expect("decompose")
    }

    fn block_for(domain: &Domain, fill: impl Fn(usize, usize) -> f64) -> Array2<f64> {
        Array2::from_shape_fn((domain.size_x + 2, domain.size_y + 2), |(i, j)| fill(i, j))
    }

    #[test]
    fn test_east_west_ghosts_match_neighbor_interior() {
        let doms = domains(8, 4, 2, 1);
        let mut blocks: Vec<Array2<f64>> = doms
            .iter()
            .map(|d| block_for(d, |i, j| (d.rank * 1000 + i * 10 + j) as f64))
            .collect();
        exchange_blocks(&mut blocks, &doms).expect("exchange");

        let nx0 = doms[0].size_x + 2;
        for j in 1..=doms[0].size_y {
            // Rank 0 east ghost mirrors rank 1's first interior column.
            assert_eq!(blocks[0][[nx0 - 1, j]], blocks[1][[1, j]]);
            // Rank 1 west ghost mirrors rank 0's last interior column.
            assert_eq!(blocks[1][[0, j]], blocks[0][[nx0 - 2, j]]);
        }
    }

    #[test]
    fn test_boundary_sides_left_untouched() {
        let doms = domains(8, 4, 2, 1);
        let mut blocks: Vec<Array2<f64>> = doms.iter().map(|d| block_for(d, |_, _| -7.0)).collect();
        exchange_blocks(&mut blocks, &doms).expect("exchange");

        // Rank 0 has no west neighbor: its west ghost column keeps the
        // sentinel value.
        let ny = doms[0].size_y + 2;
        for j in 0..ny {
            assert_eq!(blocks[0][[0, j]], -7.0);
        }
        // North/south ghost rows also keep it (jproc = 1).
        let nx = doms[0].size_x + 2;
        for i in 0..nx {
            assert_eq!(blocks[0][[i, 0]], -7.0);
            assert_eq!(blocks[0][[i, ny - 1]], -7.0);
        }
    }

    #[test]
    fn test_corners_are_not_exchanged() {
        let doms = domains(6, 6, 2, 2);
        let mut blocks: Vec<Array2<f64>> = doms.iter().map(|d| block_for(d, |_, _| 3.5)).collect();
        for (idx, b) in blocks.iter_mut().enumerate() {
            b.fill(idx as f64);
        }
        let corner_before = blocks[0][[doms[0].size_x + 1, doms[0].size_y + 1]];
        exchange_blocks(&mut blocks, &doms).expect("exchange");
        let corner_after = blocks[0][[doms[0].size_x + 1, doms[0].size_y + 1]];
        assert_eq!(corner_before, corner_after, "Ghost corners are not part of the exchange");
    }

    #[test]
    fn test_full_2x2_exchange() {
        let doms = domains(6, 6, 2, 2);
        let mut blocks: Vec<Array2<f64>> = doms
            .iter()
            .map(|d| block_for(d, |i, j| (d.rank * 100 + i * 10 + j) as f64))
            .collect();
        exchange_blocks(&mut blocks, &doms).expect("exchange");

        // Rank 0 <-> rank 2 across the horizontal seam.
        let ny0 = doms[0].size_y + 2;
        for i in 1..=doms[0].size_x {
            assert_eq!(blocks[0][[i, ny0 - 1]], blocks[2][[i, 1]]);
            assert_eq!(blocks[2][[i, 0]], blocks[0][[i, ny0 - 2]]);
        }
    }

    #[test]
    fn test_buffer_length_guard() {
        let mut field = Array2::zeros((8, 8));
        let err = apply_ghost(&mut field, Direction::East, &[1.0, 2.0]).expect_err("short buffer");
        match err {
            FlowError::CommError(msg) => assert!(msg.contains("length mismatch")),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reductions() {
        assert_eq!(reduce_min([3.0, -1.0, 2.0]), -1.0);
        assert_eq!(reduce_sum([3.0, -1.0, 2.0]), 4.0);
        assert_eq!(reduce_min(Vec::<f64>::new()), f64::INFINITY);
        assert_eq!(reduce_sum(Vec::<f64>::new()), 0.0);
    }
}
