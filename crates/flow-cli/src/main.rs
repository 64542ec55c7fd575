//! Command-line front end: load a case parameter file, run the solver,
//! write per-rank VTK snapshots next to the case file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info, LevelFilter};

use flow_core::output::VtkWriter;
use flow_core::solver::Simulation;
use flow_types::config::CaseConfig;
use flow_types::error::FlowResult;

#[derive(Parser)]
#[command(name = "flow-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Incompressible Navier-Stokes solver on a staggered grid", long_about = None)]
struct Cli {
    /// Case parameter file (.dat).
    input: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn run(cli: &Cli) -> FlowResult<()> {
    let config = CaseConfig::from_dat_file(&cli.input)?;
    info!(
        "Case '{}': {}x{} cells on {}x{} ranks",
        config.case_name, config.imax, config.jmax, config.iproc, config.jproc
    );

    let mut sink = VtkWriter::create(&config);
    let mut sim = Simulation::new(config)?;
    let report = sim.run(&mut sink)?;

    info!(
        "Finished after {} timesteps at t = {:.4} ({} snapshots)",
        report.timesteps, report.final_time, report.snapshots
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::new().filter_level(level).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
