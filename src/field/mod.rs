//! Initial scalar field and prescribed velocity fields.
//!
//! The initial oil distribution is a Gaussian bump centered on the release
//! point `x_star`. The advecting velocity is an analytic, time-invariant
//! field evaluated at cell midpoints; it is injectable through the
//! [`VelocityField`] trait so tests and alternative scenarios can
//! substitute their own closed-form flow.

use glam::DVec2;

/// Default Gaussian spread for the initial release.
pub const DEFAULT_SPREAD: f64 = 0.01;

/// Initial oil concentration at a point.
///
/// `exp(-|p - x_star|^2 / spread)`: exactly 1.0 at the release point,
/// decaying smoothly to zero with distance.
pub fn gaussian_release(point: DVec2, x_star: DVec2, spread: f64) -> f64 {
    (-point.distance_squared(x_star) / spread).exp()
}

/// A prescribed, time-invariant velocity field.
pub trait VelocityField {
    /// Velocity at a point.
    fn velocity(&self, point: DVec2) -> DVec2;
}

/// The default rotational/shear flow: `v(p) = (p.y - 0.2 p.x, -p.x)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShearFlow;

impl VelocityField for ShearFlow {
    fn velocity(&self, point: DVec2) -> DVec2 {
        DVec2::new(point.y - 0.2 * point.x, -point.x)
    }
}

/// A constant velocity everywhere; mostly useful in tests.
#[derive(Clone, Copy, Debug)]
pub struct UniformFlow(pub DVec2);

impl VelocityField for UniformFlow {
    fn velocity(&self, _point: DVec2) -> DVec2 {
        self.0
    }
}
