//! Simulation loop implementation.
//!
//! Owns the mutable scalar field and drives the explicit time stepping.
//! The field lives in two buffers: `current` is read-only during a step,
//! `next` is write-only, and the two are swapped after every full pass.
//! This Jacobi-style double buffering is what makes results independent of
//! cell update order (and safe to parallelize): step n+1 never starts
//! until every cell has committed its value for step n.

use std::time::Instant;

use glam::DVec2;
use thiserror::Error;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::field::{gaussian_release, ShearFlow, VelocityField};
use crate::flux::{cell_update, FaceContribution};
use crate::mesh::{Mesh, MeshError};
use crate::simulation::config::{ConfigError, SimulationConfig};
use crate::types::CellId;

/// Lifecycle state of a simulation.
///
/// `Uninitialized -> Ready -> Running -> Completed`, with `Failed` as the
/// terminal state for construction or runtime errors. A failed or completed
/// simulation cannot be rerun.
///
/// Setup is atomic: [`OilTransport::with_velocity`] either returns a value
/// already in `Ready` or an error and no value at all, so `Uninitialized`
/// names the phase before a simulation exists and is never observed on a
/// constructed one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
    Uninitialized,
    Ready,
    Running,
    Completed,
    Failed,
}

/// Error type for simulation setup and execution.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Unexpected failure during a step; reports where it happened.
    #[error("simulation step {step} produced a non-finite oil amount in cell {cell}")]
    Runtime { step: usize, cell: CellId },

    /// `run` called in a state other than `Ready`.
    #[error("simulation cannot run from state {state:?}")]
    NotReady { state: SimulationState },
}

/// A periodic snapshot of the scalar field over the triangle cells.
#[derive(Clone, Debug)]
pub struct FieldSnapshot {
    /// Zero-based index of the step that just completed.
    pub step: usize,
    /// Simulation time after that step.
    pub time: f64,
    /// Oil amount per triangle cell, in arena order.
    pub amounts: Vec<(CellId, f64)>,
}

/// Result of a completed simulation run.
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Final oil amount per triangle cell.
    pub final_amounts: Vec<(CellId, f64)>,
    /// Number of steps taken.
    pub n_steps: usize,
    /// Time step used.
    pub dt: f64,
    /// Wall-clock time of the run, in seconds.
    pub wall_time: f64,
}

/// Oil transport simulation over a triangular mesh.
///
/// Construction performs the full setup (geometry/topology are already in
/// the [`Mesh`]; this adds velocities, the initial field, and stability
/// validation) and leaves the simulation `Ready`. Topology and geometry
/// are never mutated afterward; the scalar buffers are the only mutable
/// state.
#[derive(Debug)]
pub struct OilTransport {
    mesh: Mesh,
    config: SimulationConfig,
    /// Velocity at each cell midpoint, fixed for the whole run.
    velocities: Vec<DVec2>,
    /// Triangle cell ids, in arena order.
    triangles: Vec<CellId>,
    current: Vec<f64>,
    next: Vec<f64>,
    dt: f64,
    state: SimulationState,
}

impl OilTransport {
    /// Set up a simulation with the default shear flow velocity field.
    pub fn new(mesh: Mesh, config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::with_velocity(mesh, config, ShearFlow)
    }

    /// Set up a simulation with a custom velocity field.
    ///
    /// Validates the configuration, evaluates velocities at all cell
    /// midpoints, populates the initial Gaussian field, and checks the
    /// CFL-type stability constraint `dt * |v|_max / h_min <= cfl_limit`.
    /// The field is only sampled here; the per-midpoint velocities are
    /// fixed for the whole run.
    pub fn with_velocity(
        mesh: Mesh,
        config: SimulationConfig,
        velocity_field: impl VelocityField,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let dt = config.dt();

        let n_cells = mesh.n_cells();
        let mut velocities = Vec::with_capacity(n_cells);
        let mut current = Vec::with_capacity(n_cells);
        for cell in mesh.cells() {
            let midpoint = mesh.midpoint(cell.id);
            velocities.push(velocity_field.velocity(midpoint));
            current.push(gaussian_release(midpoint, config.x_star, config.spread));
        }
        let triangles: Vec<CellId> = mesh.triangle_ids().collect();

        // Stability check: explicit Euler is only conditionally stable.
        let v_max = triangles
            .iter()
            .map(|&id| velocities[id].length())
            .fold(0.0_f64, f64::max);
        let h_min = mesh.h_min();
        if h_min.is_finite() && v_max > 0.0 {
            let cfl = dt * v_max / h_min;
            if cfl > config.cfl_limit {
                return Err(ConfigError::UnstableTimeStep {
                    cfl,
                    limit: config.cfl_limit,
                }
                .into());
            }
        }

        log::info!(
            "simulation ready: {} cells ({} triangles), dt = {:.6e}",
            n_cells,
            triangles.len(),
            dt
        );

        let next = current.clone();
        Ok(Self {
            mesh,
            config,
            velocities,
            triangles,
            current,
            next,
            dt,
            state: SimulationState::Ready,
        })
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Current oil amount of a cell.
    pub fn oil_amount(&self, id: CellId) -> f64 {
        self.current[id]
    }

    /// Run all steps to completion.
    pub fn run(&mut self) -> Result<SimulationResult, SimulationError> {
        self.run_with_callback(|_| {})
    }

    /// Run all steps, emitting a snapshot every `write_frequency` steps.
    ///
    /// The callback receives snapshots after steps 0, w, 2w, ... where `w`
    /// is the configured write frequency. A runtime error aborts the loop,
    /// moves the simulation to `Failed`, and reports the step and cell.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<SimulationResult, SimulationError>
    where
        F: FnMut(&FieldSnapshot),
    {
        if self.state != SimulationState::Ready {
            return Err(SimulationError::NotReady { state: self.state });
        }
        self.state = SimulationState::Running;

        let start_wall = Instant::now();
        let n_steps = self.config.n_steps;
        log::info!(
            "running {} steps from t = {} to t = {}",
            n_steps,
            self.config.t_start,
            self.config.t_end
        );

        for step in 0..n_steps {
            if let Err(err) = self.advance_step(step) {
                self.state = SimulationState::Failed;
                log::error!("aborting run: {err}");
                return Err(err);
            }
            if step % self.config.write_frequency == 0 {
                let snapshot = self.snapshot(step);
                log::debug!("step {}/{} (t = {:.4})", step, n_steps, snapshot.time);
                callback(&snapshot);
            }
        }

        self.state = SimulationState::Completed;
        let wall_time = start_wall.elapsed().as_secs_f64();
        log::info!("run completed in {wall_time:.3}s");

        Ok(SimulationResult {
            final_amounts: self.collect_amounts(),
            n_steps,
            dt: self.dt,
            wall_time,
        })
    }

    /// One Jacobi step: fill `next` from `current` only, then swap.
    fn advance_step(&mut self, step: usize) -> Result<(), SimulationError> {
        let mesh = &self.mesh;
        let velocities = &self.velocities;
        let current = &self.current;
        let dt = self.dt;

        let update_one = |index: usize| -> f64 {
            let cell = &mesh.cells()[index];
            match cell.triangle() {
                Some(geom) => {
                    let contributions = mesh.flux_links(cell.id).iter().map(|link| {
                        FaceContribution {
                            u_neighbor: current[link.neighbor],
                            velocity_neighbor: velocities[link.neighbor],
                            scaled_normal: link.normal,
                        }
                    });
                    cell_update(current[index], velocities[index], geom.area, dt, contributions)
                }
                // Non-triangle cells carry no flux; their value rides along.
                None => current[index],
            }
        };

        #[cfg(feature = "parallel")]
        self.next
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, slot)| *slot = update_one(index));

        #[cfg(not(feature = "parallel"))]
        for (index, slot) in self.next.iter_mut().enumerate() {
            *slot = update_one(index);
        }

        if let Some(index) = self.next.iter().position(|u| !u.is_finite()) {
            return Err(SimulationError::Runtime {
                step,
                cell: CellId::new(index),
            });
        }

        // The barrier between steps: commit every value at once.
        std::mem::swap(&mut self.current, &mut self.next);
        Ok(())
    }

    fn snapshot(&self, step: usize) -> FieldSnapshot {
        FieldSnapshot {
            step,
            time: self.config.t_start + (step + 1) as f64 * self.dt,
            amounts: self.collect_amounts(),
        }
    }

    fn collect_amounts(&self) -> Vec<(CellId, f64)> {
        self.triangles
            .iter()
            .map(|&id| (id, self.current[id]))
            .collect()
    }
}
