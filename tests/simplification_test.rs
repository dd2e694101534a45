//! End-to-end scenarios for the quadric simplification engine.

use approx::assert_relative_eq;
use std::collections::HashSet;
use std::io::Write;

use mesh_simplify::core::Point3;
use mesh_simplify::io::{MeshReader, MeshWriter};
use mesh_simplify::mesh::Mesh;

fn single_triangle() -> Mesh {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
    let v2 = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
    mesh.add_triangle(v0, v1, v2).unwrap();
    mesh
}

fn unit_tetrahedron() -> Mesh {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
    let v2 = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
    let v3 = mesh.add_vertex(Point3::new(0.0, 0.0, 1.0));
    mesh.add_triangle(v0, v1, v2).unwrap();
    mesh.add_triangle(v0, v1, v3).unwrap();
    mesh.add_triangle(v0, v2, v3).unwrap();
    mesh.add_triangle(v1, v2, v3).unwrap();
    mesh
}

// S1: single triangle, target=current is identity; target below current
// is allowed to collapse to no faces, but never panics.
#[test]
fn s1_single_triangle_target_equal_is_identity() {
    let mut mesh = single_triangle();
    let report = mesh.simplify(3);
    assert_eq!(report.contractions, 0);
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.face_count(), 1);
}

#[test]
fn s1_single_triangle_target_below_collapses_without_violating_invariants() {
    let mut mesh = single_triangle();
    mesh.simplify(2);
    assert!(mesh.vertex_count() <= 2);
    // Every remaining triangle (there should be none) still references
    // three distinct vertex indices.
    for tri in mesh.triangles() {
        assert_ne!(tri[0], tri[1]);
        assert_ne!(tri[1], tri[2]);
        assert_ne!(tri[0], tri[2]);
    }
}

// S2: unit tetrahedron, target=3 performs exactly one contraction and
// leaves exactly two faces (the two sharing the contracted edge collapse).
#[test]
fn s2_tetrahedron_one_contraction_leaves_two_faces() {
    let mut mesh = unit_tetrahedron();
    let report = mesh.simplify(3);
    assert_eq!(report.contractions, 1);
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.face_count(), 2);
    for tri in mesh.triangles() {
        let unique: HashSet<_> = tri.iter().collect();
        assert_eq!(unique.len(), 3);
    }
}

// S3: degenerate target=0 drains the heap without violating invariants,
// and the written file still parses back.
#[test]
fn s3_degenerate_target_zero_round_trips_through_writer() {
    let mut mesh = unit_tetrahedron();
    mesh.simplify(0);

    let mut buf = Vec::new();
    MeshWriter::new().write(&mesh, &mut buf).unwrap();
    let read_back = MeshReader::read(std::io::Cursor::new(buf)).unwrap();
    assert_eq!(read_back.vertex_count(), mesh.vertex_count());
    assert_eq!(read_back.face_count(), mesh.face_count());
}

// S4: target greater than current vertex count performs no contractions.
#[test]
fn s4_target_greater_than_current_is_noop() {
    let mut mesh = unit_tetrahedron();
    let report = mesh.simplify(100);
    assert_eq!(report.contractions, 0);
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.face_count(), 4);
}

// S5: planar quad (two coplanar triangles sharing a diagonal) forces a
// midpoint fallback for at least one edge, since the summed quadric of
// all-coplanar faces is rank-deficient; the engine must still terminate.
#[test]
fn s5_planar_quad_falls_back_to_midpoint_and_terminates() {
    let mut mesh = Mesh::new();
    let v0 = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    let v1 = mesh.add_vertex(Point3::new(1.0, 0.0, 0.0));
    let v2 = mesh.add_vertex(Point3::new(1.0, 1.0, 0.0));
    let v3 = mesh.add_vertex(Point3::new(0.0, 1.0, 0.0));
    mesh.add_triangle(v0, v1, v2).unwrap();
    mesh.add_triangle(v0, v2, v3).unwrap();

    let report = mesh.simplify(3);
    assert!(mesh.vertex_count() >= 2 && mesh.vertex_count() <= 3);
    assert!(report.final_face_count <= 1);
}

// S6: a triangle fan around a center vertex; contracting an outer edge
// must not leave two alive edges sharing the same endpoint pair.
#[test]
fn s6_triangle_fan_never_keeps_two_alive_edges_for_one_key() {
    let mut mesh = Mesh::new();
    let center = mesh.add_vertex(Point3::new(0.0, 0.0, 0.0));
    let outer: Vec<_> = (0..6)
        .map(|i| {
            let angle = std::f64::consts::TAU * (i as f64) / 6.0;
            mesh.add_vertex(Point3::new(angle.cos(), angle.sin(), 0.0))
        })
        .collect();
    for i in 0..5 {
        mesh.add_triangle(center, outer[i], outer[i + 1]).unwrap();
    }

    let before = mesh.vertex_count();
    mesh.simplify(before - 1);

    let triangles = mesh.triangles();
    let mut edge_keys = HashSet::new();
    for tri in &triangles {
        for &(a, b) in &[(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = if a <= b { (a, b) } else { (b, a) };
            edge_keys.insert(key);
        }
    }
    // A sanity check that the surviving faces reference a sane, duplicate-free
    // edge set -- the graph-level invariant is covered directly in
    // mesh::simplify's unit tests against the live edge table.
    assert!(!edge_keys.is_empty());
}

// S9 (invariant 9): round-tripping a written mesh through the reader
// yields the same vertex positions and triangle triples.
#[test]
fn round_trip_preserves_positions_and_triangles() {
    let mesh = unit_tetrahedron();
    let mut buf = Vec::new();
    MeshWriter::new().write(&mesh, &mut buf).unwrap();
    let read_back = MeshReader::read(std::io::Cursor::new(buf)).unwrap();

    assert_eq!(read_back.triangles(), mesh.triangles());
    for (a, b) in read_back.vertex_positions().iter().zip(mesh.vertex_positions()) {
        assert_relative_eq!(a, &b, epsilon = 1e-6);
    }
}

// S7: a thin driver round-trip -- write a mesh to a temp file, run the
// single-file simplify mode at ratio 1.0 (no reduction), and verify the
// output parses back to the same vertex/face counts as the input.
#[test]
fn s7_driver_round_trip_at_ratio_one_preserves_counts() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("tetra.mesh");
    {
        let mut file = std::fs::File::create(&input_path).unwrap();
        writeln!(file, "v 0 0 0").unwrap();
        writeln!(file, "v 1 0 0").unwrap();
        writeln!(file, "v 0 1 0").unwrap();
        writeln!(file, "v 0 0 1").unwrap();
        writeln!(file, "f 1 2 3").unwrap();
        writeln!(file, "f 1 2 4").unwrap();
        writeln!(file, "f 1 3 4").unwrap();
        writeln!(file, "f 2 3 4").unwrap();
    }

    let output_dir = dir.path().join("out");
    let summary = mesh_simplify::driver::run_simplify(&input_path, &output_dir, None, Some(1.0))
        .expect("single-file driver run should succeed");

    assert_eq!(summary.original_vertex_count, 4);
    assert_eq!(summary.original_face_count, 4);
    assert_eq!(summary.final_vertex_count, 4);
    assert_eq!(summary.final_face_count, 4);

    let read_back = MeshReader::read_file(&summary.output).unwrap();
    assert_eq!(read_back.vertex_count(), 4);
    assert_eq!(read_back.face_count(), 4);
}
