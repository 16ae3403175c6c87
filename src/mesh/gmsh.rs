//! Gmsh mesh file reading.
//!
//! Supports Gmsh MSH format version 2.2 (ASCII), the most widely supported
//! format for Gmsh meshes. Produces a [`RawMesh`] of vertex, line, and
//! triangle cells; only the x/y node coordinates are kept.
//!
//! ## Supported Element Types
//! - 15 = Point (1-node)
//! - 1 = Line (2-node)
//! - 2 = Triangle (3-node)
//!
//! ## Example
//! ```no_run
//! use oilsim::mesh::gmsh::read_gmsh_mesh;
//!
//! let raw = read_gmsh_mesh("bay.msh").expect("failed to read mesh");
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::DVec2;
use thiserror::Error;

use super::cell::CellKind;
use super::mesh2d::RawMesh;
use crate::types::PointId;

/// Error type for Gmsh reading.
#[derive(Debug, Error)]
pub enum GmshError {
    /// File could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid file format.
    #[error("parse error: {0}")]
    Parse(String),

    /// Unsupported mesh format version.
    #[error("unsupported Gmsh version: {0}")]
    UnsupportedVersion(String),

    /// Missing required section.
    #[error("missing section: {0}")]
    MissingSection(String),
}

/// Gmsh element types this reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GmshElementType {
    Line = 1,
    Triangle = 2,
    Point = 15,
}

impl GmshElementType {
    fn from_raw(value: i32) -> Option<Self> {
        match value {
            1 => Some(GmshElementType::Line),
            2 => Some(GmshElementType::Triangle),
            15 => Some(GmshElementType::Point),
            _ => None,
        }
    }

    fn kind(self) -> CellKind {
        match self {
            GmshElementType::Point => CellKind::Vertex,
            GmshElementType::Line => CellKind::Edge,
            GmshElementType::Triangle => CellKind::Triangle,
        }
    }
}

/// Read a Gmsh MSH file (format 2.2).
pub fn read_gmsh_mesh(path: impl AsRef<Path>) -> Result<RawMesh, GmshError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    parse_gmsh(reader.lines())
}

/// Parse Gmsh MSH content from a line iterator.
fn parse_gmsh<I>(mut lines: I) -> Result<RawMesh, GmshError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let mut points: Vec<DVec2> = Vec::new();
    let mut cells: Vec<(CellKind, Vec<PointId>)> = Vec::new();
    let mut seen_nodes = false;
    let mut seen_elements = false;

    while let Some(line_result) = lines.next() {
        let line = line_result?;
        let line = line.trim();

        if line.starts_with("$MeshFormat") {
            parse_mesh_format(&mut lines)?;
        } else if line.starts_with("$Nodes") {
            points = parse_nodes(&mut lines)?;
            seen_nodes = true;
        } else if line.starts_with("$Elements") {
            cells = parse_elements(&mut lines)?;
            seen_elements = true;
        }
    }

    if !seen_nodes || points.is_empty() {
        return Err(GmshError::MissingSection("Nodes".to_string()));
    }
    if !seen_elements || cells.is_empty() {
        return Err(GmshError::MissingSection("Elements".to_string()));
    }

    Ok(RawMesh { points, cells })
}

/// Parse the $MeshFormat section.
fn parse_mesh_format<I>(lines: &mut I) -> Result<(), GmshError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    if let Some(line_result) = lines.next() {
        let line = line_result?;
        let parts: Vec<&str> = line.trim().split_whitespace().collect();
        if parts.is_empty() {
            return Err(GmshError::Parse("empty MeshFormat line".to_string()));
        }

        let version = parts[0];
        if !version.starts_with("2.") {
            return Err(GmshError::UnsupportedVersion(version.to_string()));
        }

        for line_result in lines.by_ref() {
            let line = line_result?;
            if line.trim().starts_with("$EndMeshFormat") {
                break;
            }
        }
    }
    Ok(())
}

/// Parse the $Nodes section.
fn parse_nodes<I>(lines: &mut I) -> Result<Vec<DVec2>, GmshError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let n_nodes = match lines.next() {
        Some(Ok(line)) => line
            .trim()
            .parse::<usize>()
            .map_err(|_| GmshError::Parse("invalid node count".to_string()))?,
        _ => return Err(GmshError::Parse("missing node count".to_string())),
    };

    let mut points = Vec::with_capacity(n_nodes);

    for _ in 0..n_nodes {
        let line = match lines.next() {
            Some(line_result) => line_result?,
            None => {
                return Err(GmshError::Parse(format!(
                    "file ended after {} of {n_nodes} declared nodes",
                    points.len()
                )))
            }
        };
        let parts: Vec<&str> = line.trim().split_whitespace().collect();
        if parts.len() < 4 {
            return Err(GmshError::Parse(format!("invalid node line: {line}")));
        }

        // Format: node_id x y z; only x and y are used
        let x: f64 = parts[1]
            .parse()
            .map_err(|_| GmshError::Parse(format!("invalid x coordinate: {}", parts[1])))?;
        let y: f64 = parts[2]
            .parse()
            .map_err(|_| GmshError::Parse(format!("invalid y coordinate: {}", parts[2])))?;

        points.push(DVec2::new(x, y));
    }

    for line_result in lines.by_ref() {
        let line = line_result?;
        if line.trim().starts_with("$EndNodes") {
            break;
        }
    }

    Ok(points)
}

/// Parse the $Elements section.
fn parse_elements<I>(lines: &mut I) -> Result<Vec<(CellKind, Vec<PointId>)>, GmshError>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let n_elements = match lines.next() {
        Some(Ok(line)) => line
            .trim()
            .parse::<usize>()
            .map_err(|_| GmshError::Parse("invalid element count".to_string()))?,
        _ => return Err(GmshError::Parse("missing element count".to_string())),
    };

    let mut cells = Vec::with_capacity(n_elements);

    for read in 0..n_elements {
        let line = match lines.next() {
            Some(line_result) => line_result?,
            None => {
                return Err(GmshError::Parse(format!(
                    "file ended after {read} of {n_elements} declared elements"
                )))
            }
        };
        let parts: Vec<&str> = line.trim().split_whitespace().collect();
        if parts.len() < 3 {
            return Err(GmshError::Parse(format!("invalid element line: {line}")));
        }

        // Format: elem_id elem_type n_tags tag1 ... tagN node1 node2 ...
        let elem_type: i32 = parts[1]
            .parse()
            .map_err(|_| GmshError::Parse(format!("invalid element type: {}", parts[1])))?;
        let n_tags: usize = parts[2]
            .parse()
            .map_err(|_| GmshError::Parse(format!("invalid tag count: {}", parts[2])))?;

        let elem_type = match GmshElementType::from_raw(elem_type) {
            Some(t) => t,
            // Unknown element types (quads, higher-order) are skipped
            None => continue,
        };

        let kind = elem_type.kind();
        let node_start = 3 + n_tags;
        if parts.len() < node_start + kind.n_points() {
            return Err(GmshError::Parse(format!(
                "{kind:?} element needs {} nodes: {line}",
                kind.n_points()
            )));
        }

        // Gmsh uses 1-based node indexing
        let nodes = parts[node_start..node_start + kind.n_points()]
            .iter()
            .map(|s| {
                s.parse::<usize>()
                    .map_err(|_| GmshError::Parse(format!("invalid node id: {s}")))
                    .and_then(|id| {
                        if id == 0 {
                            Err(GmshError::Parse("node id 0 in 1-based file".to_string()))
                        } else {
                            Ok(PointId::new(id - 1))
                        }
                    })
            })
            .collect::<Result<Vec<PointId>, GmshError>>()?;

        cells.push((kind, nodes));
    }

    for line_result in lines.by_ref() {
        let line = line_result?;
        if line.trim().starts_with("$EndElements") {
            break;
        }
    }

    Ok(cells)
}
