//! Command-line driver: load a TOML configuration, run the simulation, and
//! write the final report.
//!
//! Usage: `oilsim [config.toml]` (defaults to `input.toml`).

use std::process::ExitCode;

use oilsim::io::{load_config, write_report};
use oilsim::mesh::{read_gmsh_mesh, Mesh};
use oilsim::simulation::OilTransport;

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "input.toml".to_string());
    let config = load_config(&config_path)?;

    let raw = read_gmsh_mesh(&config.mesh_name)?;
    let mesh = Mesh::from_raw(raw)?;

    let mut sim = OilTransport::new(mesh, config.simulation)?;
    let result = sim.run_with_callback(|snapshot| {
        let total: f64 = snapshot.amounts.iter().map(|&(_, u)| u).sum();
        log::info!(
            "step {} (t = {:.4}): total oil {:.6e}",
            snapshot.step,
            snapshot.time,
            total
        );
    })?;

    let report_path = format!("{}.txt", config.log_name);
    write_report(&report_path, &config.mesh_name, &config.simulation, &result)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
