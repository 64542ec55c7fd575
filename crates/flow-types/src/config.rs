// ─────────────────────────────────────────────────────────────────────
// SCPN Flow Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Case configuration: the read-only parameter record of a simulation run.
//!
//! Parsed from the whitespace-separated `key value` parameter file
//! (`#` starts a line comment). Unrecognized keys are ignored; missing
//! keys keep their zero/default value.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};

/// Parameter keys that must be present in every case file.
const REQUIRED_KEYS: [&str; 5] = ["imax", "jmax", "xlength", "ylength", "t_end"];

/// Tangential velocity of moving walls (the lid of the cavity case).
pub const MOVING_WALL_VELOCITY: f64 = 1.0;

/// Complete parameter record for one case.
///
/// Mirrors the parameter file one-to-one; everything is fixed after
/// construction and shared read-only by all ranks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseConfig {
    /// Case name, derived from the parameter file stem.
    pub case_name: String,
    /// Directory holding the parameter file; outputs land next to it.
    pub base_dir: PathBuf,
    /// Geometry file name, or "NONE" for the built-in lid-driven cavity.
    pub geo_file: String,

    pub xlength: f64,
    pub ylength: f64,
    pub imax: usize,
    pub jmax: usize,

    /// Kinematic viscosity.
    pub nu: f64,
    /// Thermal diffusivity.
    pub alpha: f64,
    /// Thermal expansion coefficient (Boussinesq).
    pub beta: f64,

    /// Initial/fixed timestep; used unchanged when `tau <= 0`.
    pub dt: f64,
    /// Safety factor for the adaptive timestep.
    pub tau: f64,
    /// SOR relaxation factor.
    pub omg: f64,
    /// Pressure residual tolerance.
    pub eps: f64,
    /// Donor-cell upwind blending factor.
    pub gamma: f64,
    /// Maximum pressure iterations per timestep.
    pub itermax: usize,

    pub t_end: f64,
    /// Simulated-time interval between snapshots (`dt_value`).
    pub output_freq: f64,

    /// Initial conditions for the interior.
    pub ui: f64,
    pub vi: f64,
    pub pi: f64,
    pub ti: f64,

    /// Body force (gravity) components.
    pub gx: f64,
    pub gy: f64,

    /// Inlet velocity components.
    pub uin: f64,
    pub vin: f64,

    /// Whether the energy equation is integrated.
    pub energy_eq: bool,
    pub num_walls: usize,
    /// Dirichlet wall temperatures keyed by wall id (3, 4, 5, …).
    pub wall_temps: BTreeMap<i32, f64>,

    /// Rank tiling of the domain.
    pub iproc: usize,
    pub jproc: usize,
}

impl Default for CaseConfig {
    fn default() -> Self {
        CaseConfig {
            case_name: "case".to_string(),
            base_dir: PathBuf::from("."),
            geo_file: "NONE".to_string(),
            xlength: 0.0,
            ylength: 0.0,
            imax: 0,
            jmax: 0,
            nu: 0.0,
            alpha: 0.0,
            beta: 0.0,
            dt: 0.0,
            tau: 0.0,
            omg: 0.0,
            eps: 0.0,
            gamma: 0.0,
            itermax: 0,
            t_end: 0.0,
            output_freq: 0.0,
            ui: 0.0,
            vi: 0.0,
            pi: 0.0,
            ti: 0.0,
            gx: 0.0,
            gy: 0.0,
            uin: 0.0,
            vin: 0.0,
            energy_eq: false,
            num_walls: 0,
            wall_temps: BTreeMap::new(),
            iproc: 1,
            jproc: 1,
        }
    }
}

impl CaseConfig {
    /// Load a parameter file and derive the case name and base directory
    /// from its path.
    pub fn from_dat_file(path: &Path) -> FlowResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut cfg = Self::parse_str(&text)?;
        cfg.case_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "case".to_string());
        cfg.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(cfg)
    }

    /// Parse parameter-file text. Required keys: imax, jmax, xlength,
    /// ylength, t_end.
    pub fn parse_str(text: &str) -> FlowResult<Self> {
        let mut cfg = CaseConfig::default();
        let mut seen: BTreeSet<String> = BTreeSet::new();

        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("");
            let mut tokens = line.split_whitespace();
            while let Some(key) = tokens.next() {
                let value = tokens.next().ok_or_else(|| {
                    FlowError::ConfigError(format!("Key '{key}' has no value"))
                })?;
                cfg.assign(key, value)?;
                seen.insert(key.to_string());
            }
        }

        for key in REQUIRED_KEYS {
            if !seen.contains(key) {
                return Err(FlowError::ConfigError(format!(
                    "Missing required parameter '{key}'"
                )));
            }
        }
        if cfg.imax == 0 || cfg.jmax == 0 {
            return Err(FlowError::ConfigError(
                "imax and jmax must be positive".to_string(),
            ));
        }
        if cfg.iproc == 0 || cfg.jproc == 0 {
            return Err(FlowError::ConfigError(
                "iproc and jproc must be positive".to_string(),
            ));
        }
        Ok(cfg)
    }

    fn assign(&mut self, key: &str, value: &str) -> FlowResult<()> {
        fn num<T: std::str::FromStr>(key: &str, value: &str) -> FlowResult<T> {
            value.parse::<T>().map_err(|_| {
                FlowError::ConfigError(format!("Invalid value '{value}' for key '{key}'"))
            })
        }

        match key {
            "geo_file" => self.geo_file = value.to_string(),
            "xlength" => self.xlength = num(key, value)?,
            "ylength" => self.ylength = num(key, value)?,
            "imax" => self.imax = num(key, value)?,
            "jmax" => self.jmax = num(key, value)?,
            "nu" => self.nu = num(key, value)?,
            "alpha" => self.alpha = num(key, value)?,
            "beta" => self.beta = num(key, value)?,
            "dt" => self.dt = num(key, value)?,
            "tau" => self.tau = num(key, value)?,
            "omg" => self.omg = num(key, value)?,
            "eps" => self.eps = num(key, value)?,
            "gamma" => self.gamma = num(key, value)?,
            "itermax" => self.itermax = num(key, value)?,
            "t_end" => self.t_end = num(key, value)?,
            "dt_value" => self.output_freq = num(key, value)?,
            "UI" => self.ui = num(key, value)?,
            "VI" => self.vi = num(key, value)?,
            "PI" => self.pi = num(key, value)?,
            "TI" => self.ti = num(key, value)?,
            "GX" => self.gx = num(key, value)?,
            "GY" => self.gy = num(key, value)?,
            "UIN" => self.uin = num(key, value)?,
            "VIN" => self.vin = num(key, value)?,
            "num_walls" => self.num_walls = num(key, value)?,
            "iproc" => self.iproc = num(key, value)?,
            "jproc" => self.jproc = num(key, value)?,
            "energy_eq" => {
                self.energy_eq = match value {
                    "on" => true,
                    "off" => false,
                    other => {
                        return Err(FlowError::ConfigError(format!(
                            "energy_eq must be 'on' or 'off', got '{other}'"
                        )))
                    }
                }
            }
            _ => {
                if let Some(id) = key.strip_prefix("wall_temp_") {
                    let id: i32 = num(key, id)?;
                    self.wall_temps.insert(id, num(key, value)?);
                }
                // Unknown keys are skipped together with their value.
            }
        }
        Ok(())
    }

    /// Uniform cell size in x.
    pub fn dx(&self) -> f64 {
        self.xlength / self.imax as f64
    }

    /// Uniform cell size in y.
    pub fn dy(&self) -> f64 {
        self.ylength / self.jmax as f64
    }

    /// Path of the geometry file, resolved next to the parameter file.
    pub fn geometry_path(&self) -> PathBuf {
        self.base_dir.join(&self.geo_file)
    }

    /// Output directory `<base>/<case>_Output`.
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(format!("{}_Output", self.case_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAVITY: &str = "\
# lid-driven cavity
xlength 1.0
ylength 1.0
imax 50
jmax 50
nu 0.01        # 1/Re
t_end 50.0
dt 0.05
omg 1.7
eps 0.00001
tau 0.5
gamma 0.5
dt_value 5.0
itermax 500
";

    #[test]
    fn test_parse_cavity_case() {
        let cfg = CaseConfig::parse_str(CAVITY).expect("cavity case must parse");
        assert_eq!(cfg.imax, 50);
        assert_eq!(cfg.jmax, 50);
        assert!((cfg.nu - 0.01).abs() < 1e-12);
        assert!((cfg.omg - 1.7).abs() < 1e-12);
        assert!((cfg.output_freq - 5.0).abs() < 1e-12);
        assert_eq!(cfg.geo_file, "NONE");
        assert_eq!(cfg.iproc, 1);
        assert_eq!(cfg.jproc, 1);
        assert!(!cfg.energy_eq);
        assert!((cfg.dx() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_missing_required_key_rejected() {
        let err = CaseConfig::parse_str("imax 10 jmax 10 xlength 1.0 ylength 1.0")
            .expect_err("t_end is required");
        match err {
            FlowError::ConfigError(msg) => assert!(msg.contains("t_end")),
            other => panic!("Unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_energy_and_wall_temps() {
        let text = format!("{CAVITY}\nenergy_eq on\nalpha 0.002\nbeta 0.1\nnum_walls 2\nwall_temp_3 1.0\nwall_temp_4 0.0\n");
        let cfg = CaseConfig::parse_str(&text).expect("energy case must parse");
        assert!(cfg.energy_eq);
        assert_eq!(cfg.wall_temps.len(), 2);
        assert!((cfg.wall_temps[&3] - 1.0).abs() < 1e-12);
        assert!((cfg.wall_temps[&4]).abs() < 1e-12);
    }

    #[test]
    fn test_bad_energy_flag_rejected() {
        let text = format!("{CAVITY}\nenergy_eq yes\n");
        assert!(CaseConfig::parse_str(&text).is_err());
    }

    #[test]
    fn test_unknown_keys_skipped() {
        let text = format!("{CAVITY}\nsome_future_key 42\n");
        let cfg = CaseConfig::parse_str(&text).expect("unknown keys are ignored");
        assert_eq!(cfg.imax, 50);
    }

    /// Build a path relative to the workspace root. CARGO_MANIFEST_DIR
    /// points to crates/flow-types/ at compile time, so go up 2 levels.
    fn workspace_path(relative: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(relative)
    }

    #[test]
    fn test_load_shipped_cases() {
        let cases = [
            "cases/lid_driven_cavity.dat",
            "cases/plane_shear_channel.dat",
            "cases/natural_convection.dat",
            "cases/step_flow.dat",
        ];
        for relative in cases {
            let path = workspace_path(relative);
            let cfg = CaseConfig::from_dat_file(&path)
                .unwrap_or_else(|e| panic!("Failed to load {relative}: {e}"));
            assert!(cfg.imax > 0);
            assert!(cfg.t_end > 0.0);
        }
    }

    #[test]
    fn test_case_name_and_paths_from_file() {
        let path = workspace_path("cases/natural_convection.dat");
        let cfg = CaseConfig::from_dat_file(&path).expect("case must load");
        assert_eq!(cfg.case_name, "natural_convection");
        assert!(cfg.energy_eq);
        assert_eq!(cfg.geo_file, "natural_convection.pgm");
        assert!(cfg.geometry_path().ends_with("cases/natural_convection.pgm"));
        assert!(cfg
            .output_dir()
            .ends_with("cases/natural_convection_Output"));
    }

    #[test]
    fn test_roundtrip_serialization() {
        let cfg = CaseConfig::parse_str(CAVITY).unwrap();
        let json = serde_json::to_string_pretty(&cfg).unwrap();
        let cfg2: CaseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.imax, cfg2.imax);
        assert_eq!(cfg.geo_file, cfg2.geo_file);
        assert!((cfg.omg - cfg2.omg).abs() < 1e-15);
    }
}
