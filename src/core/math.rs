//! Mathematics module - vectors and matrices
//!
//! Thin aliases over nalgebra's vector/matrix types, plus the
//! approximate-equality glue the rest of the engine relies on.

use nalgebra::{Matrix4 as NalMatrix4, Vector3 as NalVector3, Vector4 as NalVector4};

use super::precision::{ApproxEq, EPSILON};

// ============================================================================
// Vector Types
// ============================================================================

/// 3D vector (using nalgebra)
pub type Vector3 = NalVector3<f64>;

/// 4D vector (using nalgebra)
pub type Vector4 = NalVector4<f64>;

/// 4x4 matrix (using nalgebra)
pub type Matrix4 = NalMatrix4<f64>;

// ============================================================================
// ApproxEq implementations for nalgebra types
// ============================================================================

impl ApproxEq for Vector3 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        self.approx_eq_eps(other, EPSILON)
    }

    #[inline]
    fn approx_eq_eps(&self, other: &Self, epsilon: f64) -> bool {
        (self - other).norm() < epsilon
    }

    #[inline]
    fn approx_zero(&self) -> bool {
        self.approx_zero_eps(EPSILON)
    }

    #[inline]
    fn approx_zero_eps(&self, epsilon: f64) -> bool {
        self.norm() < epsilon
    }
}

impl ApproxEq for Vector4 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        self.approx_eq_eps(other, EPSILON)
    }

    #[inline]
    fn approx_eq_eps(&self, other: &Self, epsilon: f64) -> bool {
        (self - other).norm() < epsilon
    }

    #[inline]
    fn approx_zero(&self) -> bool {
        self.approx_zero_eps(EPSILON)
    }

    #[inline]
    fn approx_zero_eps(&self, epsilon: f64) -> bool {
        self.norm() < epsilon
    }
}
