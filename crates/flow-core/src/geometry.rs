// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Geometry Input
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Geometry sources: the ASCII PGM reader and the built-in lid-driven
//! cavity generator.
//!
//! A geometry map covers the whole extended domain, ghost ring included:
//! `(imax + 2) x (jmax + 2)` integer ids with the 0..=8 cell-type encoding.
//! The map is indexed `(i, j)` with j increasing upward; PGM rows are
//! stored top-to-bottom and are flipped on read.

use std::path::Path;

use ndarray::Array2;

use flow_types::error::{FlowError, FlowResult};

/// Geometry id of the moving lid.
const MOVING_WALL_ID: i32 = 6;
/// Geometry id of the cavity walls.
const FIXED_WALL_ID: i32 = 3;

/// Built-in lid-driven cavity: moving wall across the top ghost row,
/// fixed walls on the other three sides, fluid interior.
pub fn lid_driven_cavity_map(imax: usize, jmax: usize) -> Array2<i32> {
    let (nx, ny) = (imax + 2, jmax + 2);
    Array2::from_shape_fn((nx, ny), |(i, j)| {
        if j == ny - 1 {
            MOVING_WALL_ID
        } else if i == 0 || i == nx - 1 || j == 0 {
            FIXED_WALL_ID
        } else {
            0
        }
    })
}

/// Read an ASCII PGM (`P2`) geometry map.
pub fn read_pgm(path: &Path) -> FlowResult<Array2<i32>> {
    let text = std::fs::read_to_string(path)?;
    parse_pgm(&text)
}

/// Parse PGM text: magic, width, height, maxval, then `width * height`
/// values row-major from the top row down. `#` starts a comment.
pub fn parse_pgm(text: &str) -> FlowResult<Array2<i32>> {
    let mut tokens = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(|line| line.split_whitespace().map(str::to_owned))
        .collect::<Vec<_>>()
        .into_iter();

    let magic = tokens
        .next()
        .ok_or_else(|| FlowError::GeometryError("Empty geometry file".to_string()))?;
    if magic != "P2" {
        return Err(FlowError::GeometryError(format!(
            "Expected PGM magic 'P2', got '{magic}'"
        )));
    }

    let mut next_int = |what: &str| -> FlowResult<i32> {
        let tok = tokens
            .next()
            .ok_or_else(|| FlowError::GeometryError(format!("Missing {what}")))?;
        tok.parse::<i32>()
            .map_err(|_| FlowError::GeometryError(format!("Invalid {what}: '{tok}'")))
    };

    let width = next_int("width")?;
    let height = next_int("height")?;
    let _maxval = next_int("maxval")?;
    if width < 1 || height < 1 {
        return Err(FlowError::GeometryError(format!(
            "Invalid geometry dimensions {width}x{height}"
        )));
    }
    let (width, height) = (width as usize, height as usize);

    let mut map = Array2::zeros((width, height));
    for row in 0..height {
        for col in 0..width {
            let v = next_int("geometry value")?;
            // PGM stores the top row first; j counts upward.
            map[[col, height - 1 - row]] = v;
        }
    }
    if tokens.next().is_some() {
        return Err(FlowError::GeometryError(
            "Trailing data after geometry values".to_string(),
        ));
    }
    Ok(map)
}
