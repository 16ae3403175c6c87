//! Face/neighbor adjacency construction.
//!
//! Converts per-cell point lists into canonical faces, builds the
//! face-to-owning-cells map, and derives symmetric neighbor relations.
//! Canonical face keys are sorted point tuples, so the same geometric edge
//! maps to the same key regardless of vertex traversal order.
//!
//! Topology errors are fatal at construction time: a face owned by more
//! than two cells means the mesh is non-manifold, and no partial mesh is
//! returned.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::mesh::cell::CellKind;
use crate::types::{CellId, PointId};

/// Error type for mesh topology construction.
#[derive(Debug, Error)]
pub enum MeshTopologyError {
    /// A face is shared by more than two cells.
    #[error("non-manifold mesh: face {face} is owned by {owners} cells")]
    NonManifoldFace { face: FaceKey, owners: usize },

    /// A cell references a point id outside the point arena.
    #[error("cell {cell} references point {point}, but the mesh has {n_points} points")]
    PointOutOfRange {
        cell: CellId,
        point: PointId,
        n_points: usize,
    },

    /// A cell's point count does not match its kind.
    #[error("cell {cell} of kind {kind:?} has {n_points} points, expected {expected}")]
    WrongPointCount {
        cell: CellId,
        kind: CellKind,
        n_points: usize,
        expected: usize,
    },
}

/// Canonical, unordered face identity.
///
/// Vertex cells expose their single point as a 1-tuple face; edge and
/// triangle cells expose sorted point pairs. Used as a dictionary key:
/// two cells producing the same key are adjacent across that face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FaceKey {
    Vertex(PointId),
    Edge(PointId, PointId),
}

impl FaceKey {
    /// Face of a vertex cell.
    pub fn vertex(p: PointId) -> Self {
        FaceKey::Vertex(p)
    }

    /// Face between two points, canonicalized to (low, high).
    pub fn edge(a: PointId, b: PointId) -> Self {
        if a <= b {
            FaceKey::Edge(a, b)
        } else {
            FaceKey::Edge(b, a)
        }
    }
}

impl fmt::Display for FaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceKey::Vertex(p) => write!(f, "({p})"),
            FaceKey::Edge(a, b) => write!(f, "({a}, {b})"),
        }
    }
}

/// The canonical faces of a cell.
///
/// A triangle (a, b, c) yields the sorted pairs (a,b), (b,c), (a,c).
pub fn cell_faces(kind: CellKind, points: &[PointId]) -> Vec<FaceKey> {
    match kind {
        CellKind::Vertex => vec![FaceKey::vertex(points[0])],
        CellKind::Edge => vec![FaceKey::edge(points[0], points[1])],
        CellKind::Triangle => vec![
            FaceKey::edge(points[0], points[1]),
            FaceKey::edge(points[1], points[2]),
            FaceKey::edge(points[0], points[2]),
        ],
    }
}

/// A neighbor relation: the adjacent cell and the face shared with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborLink {
    pub cell: CellId,
    pub face: FaceKey,
}

/// Immutable adjacency information for a mesh.
///
/// Built once, never mutated; safe to share across worker threads.
#[derive(Clone, Debug)]
pub struct Topology {
    face_owners: HashMap<FaceKey, Vec<CellId>>,
    neighbors: Vec<Vec<NeighborLink>>,
}

impl Topology {
    /// Build adjacency from raw cells.
    ///
    /// Fails fast on the first topology error; the face-to-owners map is
    /// validated in full (every face must have at most two owners) before
    /// neighbor relations are derived.
    pub fn build(
        n_points: usize,
        cells: &[(CellKind, Vec<PointId>)],
    ) -> Result<Self, MeshTopologyError> {
        let mut face_owners: HashMap<FaceKey, Vec<CellId>> = HashMap::new();

        for (index, (kind, points)) in cells.iter().enumerate() {
            let id = CellId::new(index);
            if points.len() != kind.n_points() {
                return Err(MeshTopologyError::WrongPointCount {
                    cell: id,
                    kind: *kind,
                    n_points: points.len(),
                    expected: kind.n_points(),
                });
            }
            for &point in points {
                if point.get() >= n_points {
                    return Err(MeshTopologyError::PointOutOfRange {
                        cell: id,
                        point,
                        n_points,
                    });
                }
            }
            for face in cell_faces(*kind, points) {
                face_owners.entry(face).or_default().push(id);
            }
        }

        for (face, owners) in &face_owners {
            if owners.len() > 2 {
                return Err(MeshTopologyError::NonManifoldFace {
                    face: *face,
                    owners: owners.len(),
                });
            }
        }

        // Every two-owner face yields a symmetric neighbor edge.
        let mut neighbors: Vec<Vec<NeighborLink>> = vec![Vec::new(); cells.len()];
        for (face, owners) in &face_owners {
            if let [a, b] = owners[..] {
                neighbors[a].push(NeighborLink { cell: b, face: *face });
                neighbors[b].push(NeighborLink { cell: a, face: *face });
            }
        }
        // Deterministic ordering regardless of hash-map iteration order.
        for links in &mut neighbors {
            links.sort_by_key(|l| (l.cell, l.face));
        }

        Ok(Self {
            face_owners,
            neighbors,
        })
    }

    /// The cells owning a face (1 = boundary, 2 = interior).
    pub fn owners(&self, face: FaceKey) -> &[CellId] {
        self.face_owners.get(&face).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a face has exactly one owning cell.
    pub fn is_boundary_face(&self, face: FaceKey) -> bool {
        self.owners(face).len() == 1
    }

    /// All neighbor relations of a cell, across every face it shares.
    pub fn neighbors(&self, cell: CellId) -> &[NeighborLink] {
        &self.neighbors[cell]
    }

    /// Iterate over all faces with their owning cells.
    pub fn faces(&self) -> impl Iterator<Item = (FaceKey, &[CellId])> {
        self.face_owners.iter().map(|(f, o)| (*f, o.as_slice()))
    }

    /// Total number of distinct faces.
    pub fn n_faces(&self) -> usize {
        self.face_owners.len()
    }

    /// Number of single-owner faces.
    pub fn n_boundary_faces(&self) -> usize {
        self.face_owners.values().filter(|o| o.len() == 1).count()
    }
}
