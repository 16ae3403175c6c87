//! Simulation configuration.
//!
//! An explicit value struct constructed once and passed into the simulation;
//! nothing is read from ambient globals. Validation reports the offending
//! field by its configuration-file name.

use glam::DVec2;
use thiserror::Error;

use crate::field::DEFAULT_SPREAD;

/// Default CFL stability limit for `dt * |v|_max / h_min`.
pub const DEFAULT_CFL_LIMIT: f64 = 1.0;

/// Error type for invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("nSteps must be positive, got {0}")]
    InvalidStepCount(usize),

    #[error("tEnd ({t_end}) must be greater than tStart ({t_start})")]
    InvalidTimeRange { t_start: f64, t_end: f64 },

    #[error("writeFrequency must be positive, got {0}")]
    InvalidWriteFrequency(usize),

    #[error("spread must be positive, got {0}")]
    InvalidSpread(f64),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The explicit time step violates the CFL stability constraint.
    #[error(
        "unstable time step: dt * |v|_max / h_min = {cfl:.4} exceeds the limit {limit}; \
         increase nSteps or refine the configuration"
    )]
    UnstableTimeStep { cfl: f64, limit: f64 },
}

/// Parameters of a simulation run.
#[derive(Clone, Copy, Debug)]
pub struct SimulationConfig {
    /// Center of the initial oil release.
    pub x_star: DVec2,
    /// Gaussian spread of the initial release.
    pub spread: f64,
    /// Number of explicit time steps.
    pub n_steps: usize,
    /// Simulation start time.
    pub t_start: f64,
    /// Simulation end time (must exceed `t_start`).
    pub t_end: f64,
    /// Snapshot interval, in steps.
    pub write_frequency: usize,
    /// CFL stability limit checked at setup.
    pub cfl_limit: f64,
}

impl SimulationConfig {
    /// Create a configuration with default `spread` and CFL limit.
    pub fn new(x_star: DVec2, n_steps: usize, t_start: f64, t_end: f64, write_frequency: usize) -> Self {
        Self {
            x_star,
            spread: DEFAULT_SPREAD,
            n_steps,
            t_start,
            t_end,
            write_frequency,
            cfl_limit: DEFAULT_CFL_LIMIT,
        }
    }

    /// Override the Gaussian spread.
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// Override the CFL stability limit.
    pub fn with_cfl_limit(mut self, limit: f64) -> Self {
        self.cfl_limit = limit;
        self
    }

    /// Validate all fields that do not depend on the mesh.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_steps == 0 {
            return Err(ConfigError::InvalidStepCount(self.n_steps));
        }
        if self.t_end <= self.t_start {
            return Err(ConfigError::InvalidTimeRange {
                t_start: self.t_start,
                t_end: self.t_end,
            });
        }
        if self.write_frequency == 0 {
            return Err(ConfigError::InvalidWriteFrequency(self.write_frequency));
        }
        if self.spread <= 0.0 {
            return Err(ConfigError::InvalidSpread(self.spread));
        }
        Ok(())
    }

    /// The explicit time step `(t_end - t_start) / n_steps`.
    pub fn dt(&self) -> f64 {
        (self.t_end - self.t_start) / self.n_steps as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SimulationConfig {
        SimulationConfig::new(DVec2::new(0.35, 0.45), 100, 0.0, 0.5, 10)
    }

    #[test]
    fn test_valid_config() {
        assert!(valid().validate().is_ok());
        assert!((valid().dt() - 0.005).abs() < 1e-14);
    }

    #[test]
    fn test_defaults() {
        let config = valid();
        assert_eq!(config.spread, DEFAULT_SPREAD);
        assert_eq!(config.cfl_limit, DEFAULT_CFL_LIMIT);
    }

    #[test]
    fn test_zero_steps_rejected() {
        let mut config = valid();
        config.n_steps = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidStepCount(0))
        ));
    }

    #[test]
    fn test_inverted_time_range_rejected() {
        let mut config = valid();
        config.t_end = config.t_start;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_zero_write_frequency_rejected() {
        let mut config = valid();
        config.write_frequency = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWriteFrequency(0))
        ));
    }

    #[test]
    fn test_negative_spread_rejected() {
        let config = valid().with_spread(-0.01);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSpread(_))
        ));
    }
}
