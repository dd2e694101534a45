//! Core module - foundational math and precision handling
//!
//! Provides the mathematical foundation for the mesh engine: vector/matrix
//! operations, geometric primitives, and precision/tolerance handling.

pub mod math;
pub mod precision;
pub mod primitives;

// Re-export commonly used types
pub use math::{Matrix4, Vector3, Vector4};
pub use precision::{ApproxEq, EPSILON, EPSILON_FINE};
pub use primitives::Point3;
