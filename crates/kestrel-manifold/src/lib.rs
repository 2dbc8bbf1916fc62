#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kestrel Manifolds
//!
//! Optimization variables such as rotations and rigid body poses do not live in a vector
//! space. The [`Manifold`] trait describes how a parameter type maps to and from its flat
//! tangent space so that least squares machinery can be written once and reused for any
//! parameter type:
//!
//! - [`Manifold::local`] expresses `other` relative to `origin` as a tangent vector
//!   (`other - origin` for flat types, `log(origin⁻¹ * other)` for groups).
//! - [`Manifold::retract`] moves `origin` along a tangent vector
//!   (`origin + delta` for flat types, `origin * exp(delta)` for groups).
//!
//! Every operation has a plain entry point and a `*_with_jacobians` twin returning a
//! [`Differential`], so callers that do not need derivatives never pay for them.
//!
//! Implementations are provided for `f32`, `f64`, fixed-size nalgebra vectors and
//! matrices, [`kestrel_lie::SO3`] and [`kestrel_lie::SE3`].
//!
//! ```rust
//! use kestrel_manifold::Manifold;
//! use kestrel_lie::SE3;
//! use nalgebra::Vector6;
//!
//! let origin = SE3::IDENTITY;
//! let v = Vector6::new(0.1, 0.2, 0.3, 0.0, 0.1, 0.0);
//! let moved = SE3::retract(&origin, &v);
//! let back = SE3::local(&origin, &moved);
//! assert!((back - v).norm() < 1e-12);
//! ```

mod lie;
mod matrix;
mod scalar;

/// A value together with its Jacobians with respect to both arguments of the operation
/// that produced it.
///
/// For [`Manifold::local`] the arguments are `(origin, other)`, for
/// [`Manifold::retract`] they are `(origin, delta)`. Jacobians are taken with respect to
/// tangent space perturbations of the arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Differential<T, J> {
    /// Result of the operation.
    pub value: T,
    /// Jacobian with respect to the first argument.
    pub d_origin: J,
    /// Jacobian with respect to the second argument.
    pub d_arg: J,
}

/// A smooth manifold with a flat tangent space of fixed dimension.
///
/// One implementation exists per concrete type; all dispatch is static.
pub trait Manifold: Sized {
    /// Dimension of the tangent space.
    const DIM: usize;

    /// Tangent space vector.
    type Tangent;

    /// Square `DIM x DIM` Jacobian.
    type Jacobian;

    /// The identity element (zero for flat types).
    fn identity() -> Self;

    /// Tangent vector representing `other` relative to `origin`.
    fn local(origin: &Self, other: &Self) -> Self::Tangent;

    /// [`Manifold::local`] together with its Jacobians.
    fn local_with_jacobians(
        origin: &Self,
        other: &Self,
    ) -> Differential<Self::Tangent, Self::Jacobian>;

    /// Move `origin` along the tangent vector `delta`.
    fn retract(origin: &Self, delta: &Self::Tangent) -> Self;

    /// [`Manifold::retract`] together with its Jacobians.
    fn retract_with_jacobians(
        origin: &Self,
        delta: &Self::Tangent,
    ) -> Differential<Self, Self::Jacobian>;

    /// Approximate equality within `tol`.
    ///
    /// Scalars, vectors and matrices compare element-wise with `|a - b| <= tol`; a NaN
    /// element equals a NaN in the same slot and never equals a number. Groups compare
    /// the norm of [`Manifold::local`] against `tol`.
    fn equals(a: &Self, b: &Self, tol: f64) -> bool;

    /// Tangent vector of `m` relative to the identity.
    fn logmap(m: &Self) -> Self::Tangent {
        Self::local(&Self::identity(), m)
    }

    /// [`Manifold::logmap`] and its Jacobian.
    fn logmap_with_jacobian(m: &Self) -> (Self::Tangent, Self::Jacobian) {
        let d = Self::local_with_jacobians(&Self::identity(), m);
        (d.value, d.d_arg)
    }

    /// Retract the identity along `v`.
    fn expmap(v: &Self::Tangent) -> Self {
        Self::retract(&Self::identity(), v)
    }

    /// [`Manifold::expmap`] and its Jacobian.
    fn expmap_with_jacobian(v: &Self::Tangent) -> (Self, Self::Jacobian) {
        let d = Self::retract_with_jacobians(&Self::identity(), v);
        (d.value, d.d_arg)
    }
}

/// Default tolerance used by callers of [`Manifold::equals`].
pub const DEFAULT_TOLERANCE: f64 = 1e-8;
