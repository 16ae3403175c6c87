//! Strongly-typed index newtypes.
//!
//! These types prevent mixing up the two kinds of indices the crate works
//! with (cell ids vs. point ids). Both are zero-based indices into flat
//! arenas and are `#[repr(transparent)]` over `usize`.

mod indices;

pub use indices::{CellId, PointId};
