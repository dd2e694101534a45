//! Geometric primitives module
//!
//! Provides the one point type the mesh graph needs: a 3D position,
//! distinct from `Vector3` for mesh semantics.

use nalgebra::Point3 as NPoint3;

/// 3D point (distinct from Vector3 for mesh semantics)
pub type Point3 = NPoint3<f64>;
