//! Upwind numerical flux for scalar advection on unstructured meshes.
//!
//! At a face with outward-scaled normal **n** and face-averaged velocity
//! **v**, the upwind flux is:
//!
//! F = (v · n) u_self      if v · n > 0  (outflow: own concentration leaves)
//! F = (v · n) u_neighbor  otherwise     (inflow: neighbor's concentration enters)
//!
//! This is the standard first-order upwind/Godunov scheme for linear scalar
//! advection; it is monotone for any sign of v · n, unlike a central flux.

use glam::DVec2;

/// Compute the upwind numerical flux across one face.
///
/// # Arguments
/// * `u_self` - Scalar value in the cell that owns the normal
/// * `u_neighbor` - Scalar value in the cell across the face
/// * `scaled_normal` - Outward-scaled normal (points toward the neighbor)
/// * `velocity_avg` - Face velocity, the average of both cell velocities
pub fn upwind_flux(u_self: f64, u_neighbor: f64, scaled_normal: DVec2, velocity_avg: DVec2) -> f64 {
    let a_n = velocity_avg.dot(scaled_normal);
    if a_n > 0.0 {
        u_self * a_n
    } else {
        u_neighbor * a_n
    }
}

/// One neighbor's contribution to a cell update.
#[derive(Clone, Copy, Debug)]
pub struct FaceContribution {
    /// Neighbor's previous-step scalar value.
    pub u_neighbor: f64,
    /// Neighbor's velocity (at its midpoint).
    pub velocity_neighbor: DVec2,
    /// Outward-scaled normal toward the neighbor.
    pub scaled_normal: DVec2,
}

/// Explicit forward-Euler update of one cell's scalar value.
///
/// Accumulates the upwind flux over every shared face, using the average of
/// the two cell velocities at each face, and returns
/// `u_self - (dt / area) * total_flux`. Boundary faces have no entry in
/// `contributions` and therefore contribute nothing (no-flux boundary).
///
/// All inputs are previous-step values; the function reads no hidden state,
/// so cells can be updated in any order or in parallel.
pub fn cell_update(
    u_self: f64,
    velocity_self: DVec2,
    area: f64,
    dt: f64,
    contributions: impl IntoIterator<Item = FaceContribution>,
) -> f64 {
    let mut total_flux = 0.0;
    for c in contributions {
        let velocity_avg = 0.5 * (velocity_self + c.velocity_neighbor);
        total_flux += upwind_flux(u_self, c.u_neighbor, c.scaled_normal, velocity_avg);
    }
    u_self - dt / area * total_flux
}
