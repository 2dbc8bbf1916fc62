//! Group-valued manifolds.
//!
//! For a Lie group `G` with `local(x, y) = log(x⁻¹ y) = ξ` and `retract(x, v) = x exp(v)`,
//! the Jacobians with respect to right perturbations are
//!
//! ```text
//! d local / d x  = -Jl⁻¹(ξ)        d local / d y   = Jr⁻¹(ξ)
//! d retract / d x = Ad(exp(v))⁻¹   d retract / d v = Jr(v)
//! ```

use kestrel_lie::{from_na_vec3, to_na_mat3, to_na_vec3, SE3, SO3};
use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

use crate::{Differential, Manifold};

impl Manifold for SO3 {
    const DIM: usize = 3;
    type Tangent = Vector3<f64>;
    type Jacobian = Matrix3<f64>;

    fn identity() -> Self {
        SO3::IDENTITY
    }

    fn local(origin: &Self, other: &Self) -> Self::Tangent {
        to_na_vec3(origin.rminus(other))
    }

    fn local_with_jacobians(
        origin: &Self,
        other: &Self,
    ) -> Differential<Self::Tangent, Self::Jacobian> {
        let xi = origin.rminus(other);
        Differential {
            value: to_na_vec3(xi),
            d_origin: -to_na_mat3(&SO3::left_jacobian_inv(xi)),
            d_arg: to_na_mat3(&SO3::right_jacobian_inv(xi)),
        }
    }

    fn retract(origin: &Self, delta: &Self::Tangent) -> Self {
        origin.rplus(from_na_vec3(delta))
    }

    fn retract_with_jacobians(
        origin: &Self,
        delta: &Self::Tangent,
    ) -> Differential<Self, Self::Jacobian> {
        let v = from_na_vec3(delta);
        let step = SO3::exp(v);
        Differential {
            value: *origin * step,
            d_origin: to_na_mat3(&step.inverse().adjoint()),
            d_arg: to_na_mat3(&SO3::right_jacobian(v)),
        }
    }

    fn equals(a: &Self, b: &Self, tol: f64) -> bool {
        Self::local(a, b).norm() < tol
    }
}

impl Manifold for SE3 {
    const DIM: usize = 6;
    type Tangent = Vector6<f64>;
    type Jacobian = Matrix6<f64>;

    fn identity() -> Self {
        SE3::IDENTITY
    }

    fn local(origin: &Self, other: &Self) -> Self::Tangent {
        origin.rminus(other)
    }

    fn local_with_jacobians(
        origin: &Self,
        other: &Self,
    ) -> Differential<Self::Tangent, Self::Jacobian> {
        let xi = origin.rminus(other);
        Differential {
            value: xi,
            d_origin: -SE3::left_jacobian_inv(&xi),
            d_arg: SE3::right_jacobian_inv(&xi),
        }
    }

    fn retract(origin: &Self, delta: &Self::Tangent) -> Self {
        origin.rplus(delta)
    }

    fn retract_with_jacobians(
        origin: &Self,
        delta: &Self::Tangent,
    ) -> Differential<Self, Self::Jacobian> {
        let step = SE3::exp(delta);
        Differential {
            value: *origin * step,
            d_origin: step.inverse().adjoint(),
            d_arg: SE3::right_jacobian(delta),
        }
    }

    fn equals(a: &Self, b: &Self, tol: f64) -> bool {
        Self::local(a, b).norm() < tol
    }
}
