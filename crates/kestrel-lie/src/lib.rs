#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kestrel Lie Groups
//!
//! Double precision implementations of the rotation group SO(3) and the rigid body
//! transformation group SE(3). Both groups expose the exponential and logarithmic maps,
//! the adjoint representation and the left/right Jacobians (and their inverses) needed
//! to linearize residuals on the manifold.
//!
//! Tangent vectors of SE(3) are ordered `[ρ; φ]`: translational part first, rotational
//! part last.
//!
//! ## Example
//!
//! ```rust
//! use kestrel_lie::{SE3, SO3};
//! use glam::DVec3;
//!
//! let rotation = SO3::exp(DVec3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2));
//! let pose = SE3::new(rotation, DVec3::new(1.0, 0.0, 0.0));
//!
//! let p = pose * DVec3::new(1.0, 0.0, 0.0);
//! assert!((p - DVec3::new(1.0, 1.0, 0.0)).length() < 1e-12);
//! ```

/// Special Euclidean group SE(3) for 3D rigid transformations.
pub mod se3;

/// Special Orthogonal group SO(3) for 3D rotations.
pub mod so3;

pub use se3::{Matrix6, Vector6, SE3};
pub use so3::SO3;

/// Below this rotation angle (radians) the closed-form expressions switch to their
/// Taylor expansions.
pub const SMALL_ANGLE_EPSILON: f64 = 1.0e-8;

// Jacobian coefficients lose precision to cancellation well before the exp/log maps do,
// so they fall back to (second order) Taylor series much earlier.
pub(crate) const JACOBIAN_TAYLOR_EPSILON: f64 = 1.0e-3;

/// Convert a glam column-major 3x3 matrix into its nalgebra counterpart.
#[inline]
pub fn to_na_mat3(m: &glam::DMat3) -> nalgebra::Matrix3<f64> {
    nalgebra::Matrix3::from_column_slice(&m.to_cols_array())
}

/// Convert a glam 3-vector into its nalgebra counterpart.
#[inline]
pub fn to_na_vec3(v: glam::DVec3) -> nalgebra::Vector3<f64> {
    nalgebra::Vector3::new(v.x, v.y, v.z)
}

/// Convert a nalgebra 3-vector into a glam vector.
#[inline]
pub fn from_na_vec3(v: &nalgebra::Vector3<f64>) -> glam::DVec3 {
    glam::DVec3::new(v.x, v.y, v.z)
}
