//! TOML configuration file loading.
//!
//! The on-disk format mirrors the established input files:
//!
//! ```toml
//! [geometry]
//! meshName = "bay.msh"
//!
//! [settings]
//! nSteps = 500
//! tStart = 0.0
//! tEnd = 0.5
//! xStar = [0.35, 0.45]
//!
//! [IO]
//! logName = "logfile"
//! writeFrequency = 10
//! ```
//!
//! `tStart` (default 0.0), `spread`, and `logName` (default "logfile") are
//! optional; everything else is required and reported by name when missing.

use std::path::Path;

use glam::DVec2;
use serde::Deserialize;
use thiserror::Error;

use crate::simulation::{ConfigError, SimulationConfig};

const DEFAULT_LOG_NAME: &str = "logfile";

/// Error type for configuration file loading.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

#[derive(Debug, Default, Deserialize)]
struct GeometrySection {
    #[serde(rename = "meshName")]
    mesh_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    #[serde(rename = "nSteps")]
    n_steps: Option<usize>,
    #[serde(rename = "tStart")]
    t_start: Option<f64>,
    #[serde(rename = "tEnd")]
    t_end: Option<f64>,
    #[serde(rename = "xStar")]
    x_star: Option<[f64; 2]>,
    spread: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct IoSection {
    #[serde(rename = "logName")]
    log_name: Option<String>,
    #[serde(rename = "writeFrequency")]
    write_frequency: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    geometry: Option<GeometrySection>,
    settings: Option<SettingsSection>,
    #[serde(rename = "IO")]
    io: Option<IoSection>,
}

/// A fully resolved configuration file.
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    /// Path of the mesh file, relative to the working directory.
    pub mesh_name: String,
    /// Base name for output files.
    pub log_name: String,
    pub simulation: SimulationConfig,
}

fn required<T>(value: Option<T>, name: &'static str) -> Result<T, ConfigFileError> {
    value.ok_or(ConfigFileError::Invalid(ConfigError::MissingField(name)))
}

/// Load and validate a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<LoadedConfig, ConfigFileError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let file: ConfigFile = toml::from_str(&text)?;

    let geometry = file.geometry.unwrap_or_default();
    let settings = file.settings.unwrap_or_default();
    let io = file.io.unwrap_or_default();

    let mesh_name = required(geometry.mesh_name, "geometry.meshName")?;
    let n_steps = required(settings.n_steps, "settings.nSteps")?;
    let t_end = required(settings.t_end, "settings.tEnd")?;
    let [x, y] = required(settings.x_star, "settings.xStar")?;
    let write_frequency = required(io.write_frequency, "IO.writeFrequency")?;

    let mut simulation = SimulationConfig::new(
        DVec2::new(x, y),
        n_steps,
        settings.t_start.unwrap_or(0.0),
        t_end,
        write_frequency,
    );
    if let Some(spread) = settings.spread {
        simulation = simulation.with_spread(spread);
    }
    simulation.validate()?;

    log::info!(
        "configuration loaded: mesh = {}, {} steps on [{}, {}]",
        mesh_name,
        simulation.n_steps,
        simulation.t_start,
        simulation.t_end
    );

    Ok(LoadedConfig {
        mesh_name,
        log_name: io.log_name.unwrap_or_else(|| DEFAULT_LOG_NAME.to_string()),
        simulation,
    })
}
