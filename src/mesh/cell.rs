//! Cell arena types.
//!
//! A cell is a kind tag plus an ordered list of point ids; triangle cells
//! additionally carry a geometry payload (area, midpoint, outward-scaled
//! face normals). There is no type hierarchy: filtering "only triangles"
//! is a tag check.

use glam::DVec2;

use crate::mesh::topology::FaceKey;
use crate::types::{CellId, PointId};

/// The kind of a mesh cell, determined by its point count.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Single point (1 point id).
    Vertex,
    /// Line segment (2 point ids).
    Edge,
    /// Triangle (3 point ids).
    Triangle,
}

impl CellKind {
    /// Number of points a cell of this kind carries.
    pub const fn n_points(self) -> usize {
        match self {
            CellKind::Vertex => 1,
            CellKind::Edge => 2,
            CellKind::Triangle => 3,
        }
    }
}

/// Geometry payload owned by triangle cells only.
///
/// Built once at mesh construction and immutable afterward.
#[derive(Clone, Debug, PartialEq)]
pub struct TriangleGeometry {
    /// Cell area, strictly positive.
    pub area: f64,
    /// Arithmetic mean of the three vertex coordinates.
    pub midpoint: DVec2,
    /// One (face, outward-scaled normal) pair per edge of the triangle.
    pub face_normals: Vec<(FaceKey, DVec2)>,
}

impl TriangleGeometry {
    /// The outward-scaled normal for one of this triangle's faces.
    pub fn normal_for(&self, face: FaceKey) -> Option<DVec2> {
        self.face_normals
            .iter()
            .find(|(f, _)| *f == face)
            .map(|(_, n)| *n)
    }
}

/// A single cell in the mesh arena.
#[derive(Clone, Debug)]
pub struct Cell {
    /// Arena index; stable for the lifetime of the mesh.
    pub id: CellId,
    pub kind: CellKind,
    /// Ordered point ids; length matches `kind.n_points()`.
    pub points: Vec<PointId>,
    /// Present iff `kind == CellKind::Triangle`.
    pub geometry: Option<TriangleGeometry>,
}

impl Cell {
    pub fn is_triangle(&self) -> bool {
        self.kind == CellKind::Triangle
    }

    /// Triangle geometry payload, if this is a triangle.
    pub fn triangle(&self) -> Option<&TriangleGeometry> {
        self.geometry.as_ref()
    }
}
