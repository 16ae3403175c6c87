//! End-to-end transport tests on small hand-checkable meshes.

use glam::DVec2;
use oilsim::field::{gaussian_release, ShearFlow, VelocityField, DEFAULT_SPREAD};
use oilsim::mesh::{read_gmsh_mesh, Mesh, RawMesh};
use oilsim::simulation::{OilTransport, SimulationConfig, SimulationState};
use oilsim::types::{CellId, PointId};
use std::io::Write;
use tempfile::NamedTempFile;

fn p(i: usize) -> PointId {
    PointId::new(i)
}

fn c(i: usize) -> CellId {
    CellId::new(i)
}

/// Two unit right triangles tiling the unit square, shared face (1, 2).
fn two_triangle_raw() -> RawMesh {
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

fn x_star() -> DVec2 {
    DVec2::new(0.35, 0.45)
}

#[test]
fn test_one_step_hand_computed() {
    // Single explicit step on the two-triangle square, dt = 0.01.
    //
    // Midpoints: A = (1/3, 1/3), B = (2/3, 2/3). Shear flow gives
    // v_A = (4/15, -1/3), v_B = (8/15, -2/3), so the face-averaged
    // velocity is (0.4, -0.5). A's outward normal on the shared diagonal
    // is (1, 1), so v_avg . n = -0.1: oil flows from B into A.
    let mesh = Mesh::from_raw(two_triangle_raw()).unwrap();
    let mid_a = mesh.midpoint(c(0));
    let mid_b = mesh.midpoint(c(1));

    let ua0 = gaussian_release(mid_a, x_star(), DEFAULT_SPREAD);
    let ub0 = gaussian_release(mid_b, x_star(), DEFAULT_SPREAD);

    let v_avg = 0.5 * (ShearFlow.velocity(mid_a) + ShearFlow.velocity(mid_b));
    let a_n = v_avg.dot(DVec2::new(1.0, 1.0));
    assert!((a_n - (-0.1)).abs() < 1e-12);

    let dt = 0.01;
    let area = 0.5;
    // Inflow into A carries B's value; B loses the same amount.
    let expected_a = ua0 - dt / area * (ub0 * a_n);
    let expected_b = ub0 - dt / area * (ub0 * -a_n);

    let config = SimulationConfig::new(x_star(), 1, 0.0, dt, 1);
    let mut sim = OilTransport::new(mesh, config).unwrap();
    let result = sim.run().unwrap();

    assert_eq!(sim.state(), SimulationState::Completed);
    assert!((result.final_amounts[0].1 - expected_a).abs() < 1e-9);
    assert!((result.final_amounts[1].1 - expected_b).abs() < 1e-9);
}

#[test]
fn test_mass_conserved_over_many_steps() {
    // Closed domain (all boundary faces are no-flux): area-weighted total
    // oil must be conserved to rounding over the whole run.
    let mesh = Mesh::from_raw(two_triangle_raw()).unwrap();
    let areas: Vec<f64> = mesh
        .triangle_ids()
        .map(|id| mesh.cell(id).triangle().unwrap().area)
        .collect();

    let config = SimulationConfig::new(x_star(), 100, 0.0, 0.1, 10);
    let mut sim = OilTransport::new(mesh, config).unwrap();
    let mass_before: f64 = (0..2).map(|i| areas[i] * sim.oil_amount(c(i))).sum();

    let result = sim.run().unwrap();
    let mass_after: f64 = result
        .final_amounts
        .iter()
        .map(|&(id, u)| areas[id.get()] * u)
        .sum();
    assert!((mass_before - mass_after).abs() < 1e-12);
}

#[test]
fn test_field_stays_bounded() {
    // First-order upwind under the CFL limit is monotone: no step may
    // push a value outside the initial range [0, 1].
    let mesh = Mesh::from_raw(two_triangle_raw()).unwrap();
    let config = SimulationConfig::new(x_star(), 100, 0.0, 0.1, 1);
    let mut sim = OilTransport::new(mesh, config).unwrap();
    sim.run_with_callback(|snapshot| {
        for &(id, u) in &snapshot.amounts {
            assert!(u >= 0.0 && u <= 1.0, "cell {id} out of range at step {}", snapshot.step);
        }
    })
    .unwrap();
}

#[test]
fn test_snapshot_times_increase() {
    let mesh = Mesh::from_raw(two_triangle_raw()).unwrap();
    let config = SimulationConfig::new(x_star(), 50, 0.0, 0.05, 7);
    let mut sim = OilTransport::new(mesh, config).unwrap();
    let mut last_time = f64::NEG_INFINITY;
    let mut count = 0;
    sim.run_with_callback(|snapshot| {
        assert!(snapshot.time > last_time);
        last_time = snapshot.time;
        count += 1;
    })
    .unwrap();
    // steps 0, 7, 14, 21, 28, 35, 42, 49
    assert_eq!(count, 8);
}

#[test]
fn test_identical_setups_give_identical_runs() {
    let config = SimulationConfig::new(x_star(), 100, 0.0, 0.1, 10);
    let mut sim_a = OilTransport::new(Mesh::from_raw(two_triangle_raw()).unwrap(), config).unwrap();
    let mut sim_b = OilTransport::new(Mesh::from_raw(two_triangle_raw()).unwrap(), config).unwrap();

    let result_a = sim_a.run().unwrap();
    let result_b = sim_b.run().unwrap();
    for (a, b) in result_a.final_amounts.iter().zip(&result_b.final_amounts) {
        assert_eq!(a.0, b.0);
        assert_eq!(a.1.to_bits(), b.1.to_bits());
    }
}

#[test]
fn test_gmsh_file_end_to_end() {
    // A mesh file with boundary lines and corner points alongside the two
    // triangles: non-triangle cells must not disturb the transport.
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
4
1 0.0 0.0 0.0
2 1.0 0.0 0.0
3 0.0 1.0 0.0
4 1.0 1.0 0.0
$EndNodes
$Elements
8
1 15 2 0 1 1
2 15 2 0 2 2
3 1 2 0 1 1 2
4 1 2 0 2 2 4
5 1 2 0 3 4 3
6 1 2 0 4 3 1
7 2 2 0 0 1 2 3
8 2 2 0 0 2 3 4
$EndElements"#
    )
    .unwrap();

    let raw = read_gmsh_mesh(file.path()).unwrap();
    let mesh = Mesh::from_raw(raw).unwrap();
    assert_eq!(mesh.n_cells(), 8);
    assert_eq!(mesh.n_triangles(), 2);

    let areas: Vec<f64> = mesh
        .triangle_ids()
        .map(|id| mesh.cell(id).triangle().unwrap().area)
        .collect();
    let triangle_ids: Vec<CellId> = mesh.triangle_ids().collect();

    let config = SimulationConfig::new(x_star(), 100, 0.0, 0.1, 10);
    let mut sim = OilTransport::new(mesh, config).unwrap();
    let mass_before: f64 = triangle_ids
        .iter()
        .zip(&areas)
        .map(|(&id, &area)| area * sim.oil_amount(id))
        .sum();

    let result = sim.run().unwrap();
    assert_eq!(result.final_amounts.len(), 2);
    let mass_after: f64 = result
        .final_amounts
        .iter()
        .zip(&areas)
        .map(|(&(_, u), &area)| area * u)
        .sum();
    assert!((mass_before - mass_after).abs() < 1e-12);
}
