//! Numerical flux functions.
//!
//! First-order upwind flux and the explicit finite-volume cell update.
//! Everything here is a stateless pure function of its inputs, which is
//! what makes the per-cell update embarrassingly parallel.

mod upwind;

pub use upwind::{cell_update, upwind_flux, FaceContribution};
