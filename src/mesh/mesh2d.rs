//! Unstructured 2D mesh of vertex, line, and triangle cells.
//!
//! The mesh is built once from raw vertex-indexed cells: topology (face and
//! neighbor adjacency) and geometry (area, midpoint, outward-scaled face
//! normals) are computed synchronously at construction and never mutated
//! afterward. All cross-references are arena indices, so the mesh can be
//! shared freely across worker threads.

use glam::DVec2;
use thiserror::Error;

use crate::mesh::cell::{Cell, CellKind, TriangleGeometry};
use crate::mesh::geometry::{cell_midpoint, face_normal, triangle_area};
use crate::mesh::topology::{cell_faces, FaceKey, MeshTopologyError, NeighborLink, Topology};
use crate::types::{CellId, PointId};

/// Error type for mesh geometry construction.
#[derive(Debug, Error)]
pub enum MeshGeometryError {
    /// A triangle with zero area (collinear or duplicate vertices).
    #[error("degenerate triangle {cell}: area {area:e} is not strictly positive")]
    DegenerateTriangle { cell: CellId, area: f64 },
}

/// Any fatal error during mesh construction.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error(transparent)]
    Topology(#[from] MeshTopologyError),
    #[error(transparent)]
    Geometry(#[from] MeshGeometryError),
}

/// Raw mesh input: point coordinates plus vertex-indexed cells.
///
/// This is what external mesh readers produce (see [`crate::mesh::gmsh`]);
/// only the first two coordinate components of the source file are kept.
#[derive(Clone, Debug, Default)]
pub struct RawMesh {
    pub points: Vec<DVec2>,
    pub cells: Vec<(CellKind, Vec<PointId>)>,
}

impl RawMesh {
    /// Append a cell, inferring its kind from the point count.
    ///
    /// # Panics
    /// Panics if `points` has a length other than 1, 2, or 3.
    pub fn push_cell(&mut self, points: Vec<PointId>) {
        let kind = match points.len() {
            1 => CellKind::Vertex,
            2 => CellKind::Edge,
            3 => CellKind::Triangle,
            n => panic!("unsupported cell with {n} points"),
        };
        self.cells.push((kind, points));
    }
}

/// A triangle-to-triangle flux connection across a shared face.
///
/// `normal` is the owning cell's outward-scaled normal for the shared face,
/// i.e. it points toward the neighbor.
#[derive(Clone, Copy, Debug)]
pub struct FluxLink {
    pub neighbor: CellId,
    pub face: FaceKey,
    pub normal: DVec2,
}

/// Immutable mesh: point arena, cell arena, and derived adjacency.
#[derive(Clone, Debug)]
pub struct Mesh {
    points: Vec<DVec2>,
    cells: Vec<Cell>,
    topology: Topology,
    /// Per-cell flux connections; empty for non-triangle cells.
    flux_links: Vec<Vec<FluxLink>>,
}

impl Mesh {
    /// Build a mesh from raw input.
    ///
    /// Fails fast on the first topology or geometry error; no partial mesh
    /// is ever returned.
    pub fn from_raw(raw: RawMesh) -> Result<Self, MeshError> {
        let topology = Topology::build(raw.points.len(), &raw.cells)?;

        let mut cells = Vec::with_capacity(raw.cells.len());
        for (index, (kind, points)) in raw.cells.iter().enumerate() {
            let id = CellId::new(index);
            let geometry = match kind {
                CellKind::Triangle => Some(Self::triangle_geometry(id, points, &raw.points)?),
                _ => None,
            };
            cells.push(Cell {
                id,
                kind: *kind,
                points: points.clone(),
                geometry,
            });
        }

        // Flux connections: triangle-to-triangle adjacency only, carrying
        // the owner's outward normal for the shared face.
        let mut flux_links: Vec<Vec<FluxLink>> = vec![Vec::new(); cells.len()];
        for cell in &cells {
            let geom = match &cell.geometry {
                Some(g) => g,
                None => continue,
            };
            for link in topology.neighbors(cell.id) {
                if !cells[link.cell].is_triangle() {
                    continue;
                }
                // The shared face is one of this triangle's own faces.
                let normal = geom
                    .normal_for(link.face)
                    .expect("neighbor link references a face of the owning triangle");
                flux_links[cell.id].push(FluxLink {
                    neighbor: link.cell,
                    face: link.face,
                    normal,
                });
            }
        }

        log::debug!(
            "mesh built: {} points, {} cells, {} faces ({} boundary)",
            raw.points.len(),
            cells.len(),
            topology.n_faces(),
            topology.n_boundary_faces()
        );

        Ok(Self {
            points: raw.points,
            cells,
            topology,
            flux_links,
        })
    }

    fn triangle_geometry(
        id: CellId,
        points: &[PointId],
        coords: &[DVec2],
    ) -> Result<TriangleGeometry, MeshGeometryError> {
        let p: Vec<DVec2> = points.iter().map(|&i| coords[i]).collect();
        let area = triangle_area(p[0], p[1], p[2]);
        if area <= 0.0 {
            return Err(MeshGeometryError::DegenerateTriangle { cell: id, area });
        }
        let midpoint = cell_midpoint(&p);
        let face_normals = cell_faces(CellKind::Triangle, points)
            .into_iter()
            .map(|face| {
                let (a, b) = match face {
                    FaceKey::Edge(a, b) => (a, b),
                    FaceKey::Vertex(_) => unreachable!("triangle faces are edges"),
                };
                (face, face_normal(coords[a], coords[b], midpoint))
            })
            .collect();
        Ok(TriangleGeometry {
            area,
            midpoint,
            face_normals,
        })
    }

    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    pub fn n_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn point(&self, id: PointId) -> DVec2 {
        self.points[id]
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Midpoint of any cell (vertex centroid of its points).
    pub fn midpoint(&self, id: CellId) -> DVec2 {
        match self.cells[id].triangle() {
            Some(geom) => geom.midpoint,
            None => {
                let p: Vec<DVec2> = self.cells[id].points.iter().map(|&i| self.points[i]).collect();
                cell_midpoint(&p)
            }
        }
    }

    /// Face/neighbor adjacency (all cell kinds).
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// All neighbor relations of a cell, regardless of kind.
    pub fn neighbors(&self, id: CellId) -> &[NeighborLink] {
        self.topology.neighbors(id)
    }

    /// Triangle-to-triangle flux connections of a cell.
    ///
    /// Empty for non-triangle cells and for isolated triangles; boundary
    /// faces never appear here, which is what makes them no-flux.
    pub fn flux_links(&self, id: CellId) -> &[FluxLink] {
        &self.flux_links[id]
    }

    /// Ids of all triangle cells, in arena order.
    pub fn triangle_ids(&self) -> impl Iterator<Item = CellId> + '_ {
        self.cells.iter().filter(|c| c.is_triangle()).map(|c| c.id)
    }

    pub fn n_triangles(&self) -> usize {
        self.cells.iter().filter(|c| c.is_triangle()).count()
    }

    /// Minimum edge length over all triangle cells (for CFL checks).
    ///
    /// Returns `f64::INFINITY` if the mesh has no triangles.
    pub fn h_min(&self) -> f64 {
        let mut h_min = f64::INFINITY;
        for cell in &self.cells {
            if !cell.is_triangle() {
                continue;
            }
            for i in 0..3 {
                let a = self.points[cell.points[i]];
                let b = self.points[cell.points[(i + 1) % 3]];
                h_min = h_min.min((b - a).length());
            }
        }
        h_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: usize) -> PointId {
        PointId::new(i)
    }

    fn c(i: usize) -> CellId {
        CellId::new(i)
    }

    /// Two unit right triangles tiling the unit square, shared face (1, 2).
    pub(crate) fn two_triangle_raw() -> RawMesh {
        let mut raw = RawMesh {
            points: vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(1.0, 0.0),
                DVec2::new(0.0, 1.0),
                DVec2::new(1.0, 1.0),
            ],
            cells: Vec::new(),
        };
        raw.push_cell(vec![p(0), p(1), p(2)]);
        raw.push_cell(vec![p(1), p(2), p(3)]);
        raw
    }

    #[test]
    fn test_two_triangle_mesh() {
        let mesh = Mesh::from_raw(two_triangle_raw()).unwrap();
        assert_eq!(mesh.n_cells(), 2);
        assert_eq!(mesh.n_triangles(), 2);

        let g0 = mesh.cell(c(0)).triangle().unwrap();
        let g1 = mesh.cell(c(1)).triangle().unwrap();
        assert!((g0.area - 0.5).abs() < 1e-14);
        assert!((g1.area - 0.5).abs() < 1e-14);
        assert!((g0.midpoint - DVec2::new(1.0 / 3.0, 1.0 / 3.0)).length() < 1e-14);
        assert!((g1.midpoint - DVec2::new(2.0 / 3.0, 2.0 / 3.0)).length() < 1e-14);
    }

    #[test]
    fn test_shared_face_normals_antiparallel() {
        let mesh = Mesh::from_raw(two_triangle_raw()).unwrap();
        let links0 = mesh.flux_links(c(0));
        let links1 = mesh.flux_links(c(1));
        assert_eq!(links0.len(), 1);
        assert_eq!(links1.len(), 1);
        assert_eq!(links0[0].neighbor, c(1));
        assert_eq!(links1[0].neighbor, c(0));
        // Same face, opposite outward directions
        assert_eq!(links0[0].face, links1[0].face);
        assert!((links0[0].normal + links1[0].normal).length() < 1e-14);
    }

    #[test]
    fn test_normal_closure_per_triangle() {
        let mesh = Mesh::from_raw(two_triangle_raw()).unwrap();
        for id in mesh.triangle_ids() {
            let geom = mesh.cell(id).triangle().unwrap();
            let sum: DVec2 = geom.face_normals.iter().map(|(_, n)| *n).sum();
            assert!(sum.length() < 1e-12, "normals of {id} do not close");
        }
    }

    #[test]
    fn test_degenerate_triangle_rejected() {
        let mut raw = RawMesh {
            points: vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(0.5, 0.5),
                DVec2::new(1.0, 1.0),
            ],
            cells: Vec::new(),
        };
        raw.push_cell(vec![p(0), p(1), p(2)]);
        let err = Mesh::from_raw(raw).unwrap_err();
        assert!(matches!(
            err,
            MeshError::Geometry(MeshGeometryError::DegenerateTriangle { .. })
        ));
    }

    #[test]
    fn test_h_min() {
        let mesh = Mesh::from_raw(two_triangle_raw()).unwrap();
        assert!((mesh.h_min() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_line_cell_does_not_produce_flux_links() {
        let mut raw = two_triangle_raw();
        // Line cell along triangle 0's boundary edge (0, 1)
        raw.push_cell(vec![p(0), p(1)]);
        let mesh = Mesh::from_raw(raw).unwrap();
        // Topology sees the line as a neighbor of triangle 0...
        assert_eq!(mesh.neighbors(c(0)).len(), 2);
        // ...but flux only flows between triangles.
        assert_eq!(mesh.flux_links(c(0)).len(), 1);
        assert_eq!(mesh.flux_links(c(2)).len(), 0);
    }

    #[test]
    fn test_rebuild_bit_identical_geometry() {
        let a = Mesh::from_raw(two_triangle_raw()).unwrap();
        let b = Mesh::from_raw(two_triangle_raw()).unwrap();
        for id in a.triangle_ids() {
            let ga = a.cell(id).triangle().unwrap();
            let gb = b.cell(id).triangle().unwrap();
            assert_eq!(ga.area.to_bits(), gb.area.to_bits());
            assert_eq!(ga.midpoint, gb.midpoint);
            assert_eq!(ga.face_normals, gb.face_normals);
        }
    }
}
