//! Per-cell geometry computations.
//!
//! Pure functions of point coordinates: triangle area (shoelace), cell
//! midpoint (vertex centroid), and outward-scaled face normals. The scaled
//! normal of a face has the length of the face itself, so summing
//! `flux_density * normal` over the faces of a cell approximates the line
//! integral of the flux around the cell boundary.

use glam::DVec2;

/// Compute the area of a triangle from its vertex coordinates.
///
/// Uses the shoelace formula with absolute value, so vertex winding does
/// not matter. A result of zero means the triangle is degenerate (collinear
/// or duplicate vertices) and is rejected at mesh construction.
pub fn triangle_area(p1: DVec2, p2: DVec2, p3: DVec2) -> f64 {
    0.5 * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y)).abs()
}

/// Compute the midpoint of a cell as the arithmetic mean of its vertices.
///
/// This is the vertex centroid, not an area-weighted centroid; for the
/// first-order scheme used here the distinction does not matter.
///
/// # Panics
/// Panics if `points` is empty. Cells always carry at least one point.
pub fn cell_midpoint(points: &[DVec2]) -> DVec2 {
    assert!(!points.is_empty(), "cell must have at least one point");
    points.iter().copied().sum::<DVec2>() / points.len() as f64
}

/// Compute the outward-scaled normal of a face, as seen from a cell.
///
/// The edge vector `d = p2 - p1` is rotated 90° counter-clockwise; the
/// rotated vector already has the edge's length, which is exactly the
/// scaling the flux integral needs. The normal is flipped if it points
/// toward the cell midpoint, so the result always points away from the
/// cell that owns it.
pub fn face_normal(p1: DVec2, p2: DVec2, cell_midpoint: DVec2) -> DVec2 {
    let d = p2 - p1;
    // perp() is (-d.y, d.x): unit normal direction scaled by edge length
    let n = d.perp();
    let face_midpoint = 0.5 * (p1 + p2);
    if n.dot(face_midpoint - cell_midpoint) < 0.0 {
        -n
    } else {
        n
    }
}
