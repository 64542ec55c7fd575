// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Flow Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Staggered-grid incompressible Navier-Stokes solver core.
//!
//! Chorin projection with SOR pressure solve, donor-cell transport,
//! optional Boussinesq energy coupling, and a 2D rank decomposition glued
//! together by one-cell halo exchange.

pub mod boundary;
pub mod cell;
pub mod comm;
pub mod fields;
pub mod geometry;
pub mod grid;
pub mod output;
pub mod solver;
