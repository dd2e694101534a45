//! Quadric error machinery: per-face plane quadrics, per-vertex accumulated
//! quadrics, and the per-edge optimal contraction point and cost.
//!
//! Rewritten from the teacher's hand-rolled `[[f64; 4]; 4]` `Quadric` onto
//! `nalgebra::Matrix4`/`Vector4` so the 4x4 solve in `solve4` can use
//! `nalgebra::linalg::LU` instead of a bespoke Gaussian elimination.

use nalgebra::linalg::LU;

use crate::core::precision::EPSILON_FINE;
use crate::core::{Matrix4, Point3, Vector3, Vector4};

/// Builds the rank-1 plane quadric `pi * pi^T` for a face with unit normal
/// `normal` and centroid `centroid`. Degenerate (near-zero) normals yield
/// the zero quadric: such faces contribute nothing to vertex quadrics
/// rather than polluting them with an ill-conditioned plane.
pub fn plane_quadric(normal: Vector3, centroid: Point3) -> Matrix4 {
    if normal.norm() < EPSILON_FINE {
        return Matrix4::zeros();
    }
    let d = -normal.dot(&centroid.coords);
    let pi = Vector4::new(normal.x, normal.y, normal.z, d);
    pi * pi.transpose()
}

/// Solves `m * x = b` via pivoted LU decomposition. Returns `None` when a
/// pivot degenerates below nalgebra's epsilon-relative threshold, signaling
/// that `m` is not invertible to useful precision.
pub fn solve4(m: Matrix4, b: Vector4) -> Option<Vector4> {
    LU::new(m).solve(&b)
}

/// The optimal contraction point and its quadric-error cost for the merge
/// of two vertex quadrics `q1 + q2`.
pub fn optimal_contraction(q: Matrix4, p1: Point3, p2: Point3) -> (Point3, f64) {
    let mut q_prime = q;
    q_prime.set_row(3, &Vector4::new(0.0, 0.0, 0.0, 1.0).transpose());
    let rhs = Vector4::new(0.0, 0.0, 0.0, 1.0);

    if let Some(x) = solve4(q_prime, rhs) {
        let position = Point3::new(x.x, x.y, x.z);
        let cost = (x.transpose() * q * x)[(0, 0)];
        return (position, cost);
    }

    let midpoint = nalgebra::center(&p1, &p2);
    let h = Vector4::new(midpoint.x, midpoint.y, midpoint.z, 1.0);
    let cost = (h.transpose() * q * h)[(0, 0)];
    (midpoint, cost)
}
