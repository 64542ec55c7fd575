// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Solver diverged at timestep {timestep}: {message}")]
    Diverged { timestep: usize, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Geometry error: {0}")]
    GeometryError(String),

    #[error("Grid index out of bounds: i={i}, j={j}")]
    GridOutOfBounds { i: usize, j: usize },

    #[error("Communication error: {0}")]
    CommError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FlowResult<T> = Result<T, FlowError>;
