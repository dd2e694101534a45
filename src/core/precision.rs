//! Precision handling for mesh geometry operations
//!
//! Epsilon constants and a trait for floating-point comparison with
//! configurable tolerance, used throughout the quadric engine to guard
//! against degenerate (zero-area, zero-normal) geometry.

/// Fine precision - used to detect degenerate normals (1e-12)
pub const EPSILON_FINE: f64 = 1e-12;

/// Default epsilon value
pub const EPSILON: f64 = 1e-9;

/// Trait for approximate equality comparison with tolerance
pub trait ApproxEq {
    /// Check if two values are approximately equal using default epsilon
    fn approx_eq(&self, other: &Self) -> bool;

    /// Check if two values are approximately equal using custom epsilon
    fn approx_eq_eps(&self, other: &Self, epsilon: f64) -> bool;

    /// Check if value is approximately zero using default epsilon
    fn approx_zero(&self) -> bool;

    /// Check if value is approximately zero using custom epsilon
    fn approx_zero_eps(&self, epsilon: f64) -> bool;
}

impl ApproxEq for f64 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < EPSILON
    }

    #[inline]
    fn approx_eq_eps(&self, other: &Self, epsilon: f64) -> bool {
        (self - other).abs() < epsilon
    }

    #[inline]
    fn approx_zero(&self) -> bool {
        self.abs() < EPSILON
    }

    #[inline]
    fn approx_zero_eps(&self, epsilon: f64) -> bool {
        self.abs() < epsilon
    }
}

impl ApproxEq for f32 {
    #[inline]
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < EPSILON as f32
    }

    #[inline]
    fn approx_eq_eps(&self, other: &Self, epsilon: f64) -> bool {
        (self - other).abs() < epsilon as f32
    }

    #[inline]
    fn approx_zero(&self) -> bool {
        self.abs() < EPSILON as f32
    }

    #[inline]
    fn approx_zero_eps(&self, epsilon: f64) -> bool {
        self.abs() < epsilon as f32
    }
}
