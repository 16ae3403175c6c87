//! Simulation configuration and time-stepping driver.

mod config;
mod runner;

pub use config::{ConfigError, SimulationConfig, DEFAULT_CFL_LIMIT};
pub use runner::{
    FieldSnapshot, OilTransport, SimulationError, SimulationResult, SimulationState,
};
