//! Numerical kernels for SCPN Flow Core.

pub mod discretization;
pub mod sor;
