//! Simulation driver.
//!
//! Owns the full rank set in one process and runs every phase of the
//! timestep across all ranks before the next phase begins, so halo
//! exchanges and reductions behave as barriers — the same ordering an
//! rsmpi-backed deployment would observe, which keeps decomposed runs
//! equivalent to serial ones.
//!
//! Per-timestep phase sequence: adaptive dt (reduced across ranks),
//! optional temperature update + halo(T), fluxes + halo(F/G), Poisson RHS,
//! pressure loop { boundary pressure, SOR sweep, halo(p), global residual },
//! velocity correction + halo(u/v), boundary apply, time advance, output.

use log::{info, warn};
use ndarray::Array2;

use flow_math::discretization::Discretization;
use flow_math::sor;
use flow_types::config::CaseConfig;
use flow_types::domain::Domain;
use flow_types::error::{FlowError, FlowResult};

use crate::boundary::{build_boundaries, Boundary};
use crate::comm;
use crate::fields::{FieldTag, Fields};
use crate::geometry;
use crate::grid::Grid;
use crate::output::SnapshotSink;

/// One rank's working state.
#[derive(Debug)]
pub struct RankState {
    pub grid: Grid,
    pub fields: Fields,
    pub boundaries: Vec<Boundary>,
}

/// Outcome of a single timestep.
#[derive(Debug, Clone, Copy)]
pub struct StepReport {
    pub dt: f64,
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Outcome of a full run.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub timesteps: usize,
    pub final_time: f64,
    pub snapshots: usize,
}

#[derive(Debug)]
pub struct Simulation {
    config: CaseConfig,
    disc: Discretization,
    domains: Vec<Domain>,
    ranks: Vec<RankState>,
    /// Global fluid-cell count, reduced once at setup.
    n_fluid: f64,
    t: f64,
    timestep: usize,
}

impl Simulation {
    /// Build the rank set from the configuration, resolving the geometry
    /// from the case's geo file or the built-in cavity generator.
    pub fn new(config: CaseConfig) -> FlowResult<Self> {
        let map = if config.geo_file == "NONE" {
            geometry::lid_driven_cavity_map(config.imax, config.jmax)
        } else {
            geometry::read_pgm(&config.geometry_path())?
        };
        Self::with_geometry(config, map)
    }

    /// Build the rank set against an explicit geometry map.
    pub fn with_geometry(config: CaseConfig, map: Array2<i32>) -> FlowResult<Self> {
        let domains = Domain::decompose(&config)?;
        let disc = Discretization::new(config.dx(), config.dy(), config.gamma);

        let mut ranks = Vec::with_capacity(domains.len());
        for domain in &domains {
            let grid = Grid::from_geometry(domain.clone(), &map)?;
            let fields = Fields::new(&config, grid.size_x(), grid.size_y());
            let boundaries = build_boundaries(&config, &grid);
            ranks.push(RankState {
                grid,
                fields,
                boundaries,
            });
        }

        let n_fluid = comm::reduce_sum(ranks.iter().map(|r| r.grid.fluid_cells().len() as f64));
        if n_fluid == 0.0 {
            return Err(FlowError::GeometryError(
                "Geometry contains no fluid cells".to_string(),
            ));
        }

        Ok(Simulation {
            config,
            disc,
            domains,
            ranks,
            n_fluid,
            t: 0.0,
            timestep: 0,
        })
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn timestep(&self) -> usize {
        self.timestep
    }

    pub fn ranks(&self) -> &[RankState] {
        &self.ranks
    }

    /// Exchange one field's ghost layer across the rank set.
    fn exchange(&mut self, tag: FieldTag) -> FlowResult<()> {
        let mut mats: Vec<Array2<f64>> = self
            .ranks
            .iter_mut()
            .map(|r| std::mem::replace(r.fields.matrix_mut(tag), Array2::zeros((0, 0))))
            .collect();
        let result = comm::exchange_blocks(&mut mats, &self.domains);
        for (rank, mat) in self.ranks.iter_mut().zip(mats) {
            *rank.fields.matrix_mut(tag) = mat;
        }
        result
    }

    /// Apply the velocity (and, with the energy equation, temperature)
    /// boundary operators on every rank.
    fn apply_boundaries(&mut self) {
        let energy = self.config.energy_eq;
        for rank in &mut self.ranks {
            for b in &rank.boundaries {
                b.apply(&rank.grid, &mut rank.fields);
                if energy {
                    b.apply_temperature(&rank.grid, &mut rank.fields);
                }
            }
        }
    }

    /// Advance the simulation by one timestep.
    pub fn step(&mut self) -> FlowResult<StepReport> {
        let disc = self.disc;

        let dt = comm::reduce_min(
            self.ranks
                .iter()
                .map(|r| r.fields.calculate_dt(&r.grid)),
        );
        if !dt.is_finite() || dt <= 0.0 {
            return Err(FlowError::Diverged {
                timestep: self.timestep,
                message: format!("Timestep collapsed to {dt}; the transport blew up"),
            });
        }
        for rank in &mut self.ranks {
            rank.fields.set_dt(dt);
        }

        if self.config.energy_eq {
            for rank in &mut self.ranks {
                rank.fields.calculate_temperature(&rank.grid, &disc);
            }
            self.exchange(FieldTag::T)?;
        }

        for rank in &mut self.ranks {
            rank.fields.calculate_fluxes(&rank.grid, &disc);
        }
        self.exchange(FieldTag::F)?;
        self.exchange(FieldTag::G)?;

        for rank in &mut self.ranks {
            rank.fields.calculate_rs(&rank.grid, &disc);
        }

        let omega = self.config.omg;
        let mut iter = 0;
        let mut residual = f64::MAX;
        let mut converged = true;
        while residual > self.config.eps {
            if iter >= self.config.itermax {
                warn!(
                    "Pressure solver did not converge at timestep {}: residual {residual:.3e} after {iter} iterations",
                    self.timestep
                );
                converged = false;
                break;
            }

            let locals: Vec<f64> = self
                .ranks
                .iter_mut()
                .map(|rank| {
                    for b in &rank.boundaries {
                        b.apply_pressure(&rank.grid, &mut rank.fields);
                    }
                    let (p, rs) = rank.fields.p_rs_mut();
                    sor::sor_sweep(p, rs, rank.grid.fluid_cells(), &disc, omega);
                    sor::sor_residual_sq(p, rs, rank.grid.fluid_cells(), &disc)
                })
                .collect();
            self.exchange(FieldTag::P)?;

            residual = (comm::reduce_sum(locals) / self.n_fluid).sqrt();
            iter += 1;
        }

        for rank in &mut self.ranks {
            rank.fields.calculate_velocities(&rank.grid, &disc);
        }
        self.exchange(FieldTag::U)?;
        self.exchange(FieldTag::V)?;

        self.apply_boundaries();

        self.t += dt;
        self.timestep += 1;

        Ok(StepReport {
            dt,
            residual,
            iterations: iter,
            converged,
        })
    }

    /// Run until `t_end`, emitting snapshots strictly periodically.
    pub fn run(&mut self, sink: &mut dyn SnapshotSink) -> FlowResult<RunReport> {
        self.apply_boundaries();
        self.emit(sink);
        let mut snapshots = 1;
        let mut next_output = self.config.output_freq;

        while self.t <= self.config.t_end {
            let report = self.step()?;
            info!(
                "Timestep {:>6} | dt {:.6} | t {:.4} | residual {:.3e} | pressure iterations {}",
                self.timestep, report.dt, self.t, report.residual, report.iterations
            );
            if self.config.output_freq > 0.0 && self.t >= next_output {
                self.emit(sink);
                snapshots += 1;
                next_output += self.config.output_freq;
            }
        }

        Ok(RunReport {
            timesteps: self.timestep,
            final_time: self.t,
            snapshots,
        })
    }

    fn emit(&self, sink: &mut dyn SnapshotSink) {
        for rank in &self.ranks {
            sink.emit(
                rank.grid.domain().rank,
                self.timestep,
                &rank.grid,
                &rank.fields,
            );
        }
    }
}
