//! Finite-volume oil transport simulation on unstructured triangular meshes.
//!
//! Models a passive oil spill advected by a prescribed velocity field over a
//! 2D triangular mesh, using a first-order upwind scheme with explicit Euler
//! time stepping and a no-flux boundary.
//!
//! # Architecture
//!
//! - [`mesh`] - Immutable mesh: cell arena, face adjacency, per-triangle
//!   geometry, and Gmsh file reading
//! - [`field`] - Initial Gaussian release and prescribed velocity fields
//! - [`flux`] - Upwind numerical flux and the per-cell update, as pure
//!   functions
//! - [`simulation`] - Configuration and the double-buffered time stepper
//! - [`io`] - TOML configuration files and the plain-text run report
//! - [`types`] - Typed arena indices for cells and points
//!
//! # Example
//!
//! ```no_run
//! use glam::DVec2;
//! use oilsim::mesh::{read_gmsh_mesh, Mesh};
//! use oilsim::simulation::{OilTransport, SimulationConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = read_gmsh_mesh("bay.msh")?;
//! let mesh = Mesh::from_raw(raw)?;
//! let config = SimulationConfig::new(DVec2::new(0.35, 0.45), 500, 0.0, 0.5, 10);
//! let mut sim = OilTransport::new(mesh, config)?;
//! let result = sim.run()?;
//! println!("finished {} steps", result.n_steps);
//! # Ok(())
//! # }
//! ```

pub mod field;
pub mod flux;
pub mod io;
pub mod mesh;
pub mod simulation;
pub mod types;

pub use mesh::Mesh;
pub use simulation::{OilTransport, SimulationConfig, SimulationResult};
