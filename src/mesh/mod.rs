//! Mesh representation.
//!
//! Provides the unstructured 2D mesh the solver runs on:
//! - Cell arena with a kind tag (vertex / line / triangle)
//! - Face-keyed adjacency with boundary and non-manifold detection
//! - Per-triangle geometry (area, midpoint, outward-scaled normals)
//! - Gmsh mesh file reading

mod cell;
mod geometry;
pub mod gmsh;
mod mesh2d;
mod topology;

pub use cell::{Cell, CellKind, TriangleGeometry};
pub use geometry::{cell_midpoint, face_normal, triangle_area};
pub use gmsh::{read_gmsh_mesh, GmshError};
pub use mesh2d::{FluxLink, Mesh, MeshError, MeshGeometryError, RawMesh};
pub use topology::{cell_faces, FaceKey, MeshTopologyError, NeighborLink, Topology};
