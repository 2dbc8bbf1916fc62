//! Flat manifolds: fixed-size vectors and matrices.
//!
//! Matrices are flattened column-major into their tangent vector, so `DIM = rows * cols`.
//! All Jacobians are (plus or minus) the identity.

use nalgebra::{SMatrix, SVector};

use crate::{Differential, Manifold};

// Element-wise `|a - b| <= tol`. NaN equals NaN, NaN never equals a number.
pub(crate) fn flat_equals(a: &[f64], b: &[f64], tol: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| {
        if x.is_nan() ^ y.is_nan() {
            return false;
        }
        // NaN in both slots compares equal
        x.is_nan() || (x - y).abs() <= tol
    })
}

impl<const D: usize> Manifold for SVector<f64, D> {
    const DIM: usize = D;
    type Tangent = SVector<f64, D>;
    type Jacobian = SMatrix<f64, D, D>;

    fn identity() -> Self {
        Self::zeros()
    }

    fn local(origin: &Self, other: &Self) -> Self::Tangent {
        other - origin
    }

    fn local_with_jacobians(
        origin: &Self,
        other: &Self,
    ) -> Differential<Self::Tangent, Self::Jacobian> {
        Differential {
            value: Self::local(origin, other),
            d_origin: -SMatrix::<f64, D, D>::identity(),
            d_arg: SMatrix::<f64, D, D>::identity(),
        }
    }

    fn retract(origin: &Self, delta: &Self::Tangent) -> Self {
        origin + delta
    }

    fn retract_with_jacobians(
        origin: &Self,
        delta: &Self::Tangent,
    ) -> Differential<Self, Self::Jacobian> {
        Differential {
            value: Self::retract(origin, delta),
            d_origin: SMatrix::<f64, D, D>::identity(),
            d_arg: SMatrix::<f64, D, D>::identity(),
        }
    }

    fn equals(a: &Self, b: &Self, tol: f64) -> bool {
        flat_equals(a.as_slice(), b.as_slice(), tol)
    }
}

macro_rules! impl_matrix_manifold {
    ($rows:literal, $cols:literal, $dim:literal) => {
        impl Manifold for SMatrix<f64, $rows, $cols> {
            const DIM: usize = $dim;
            type Tangent = SVector<f64, $dim>;
            type Jacobian = SMatrix<f64, $dim, $dim>;

            fn identity() -> Self {
                Self::zeros()
            }

            fn local(origin: &Self, other: &Self) -> Self::Tangent {
                SVector::<f64, $dim>::from_column_slice((other - origin).as_slice())
            }

            fn local_with_jacobians(
                origin: &Self,
                other: &Self,
            ) -> Differential<Self::Tangent, Self::Jacobian> {
                Differential {
                    value: Self::local(origin, other),
                    d_origin: -SMatrix::<f64, $dim, $dim>::identity(),
                    d_arg: SMatrix::<f64, $dim, $dim>::identity(),
                }
            }

            fn retract(origin: &Self, delta: &Self::Tangent) -> Self {
                origin + Self::from_column_slice(delta.as_slice())
            }

            fn retract_with_jacobians(
                origin: &Self,
                delta: &Self::Tangent,
            ) -> Differential<Self, Self::Jacobian> {
                Differential {
                    value: Self::retract(origin, delta),
                    d_origin: SMatrix::<f64, $dim, $dim>::identity(),
                    d_arg: SMatrix::<f64, $dim, $dim>::identity(),
                }
            }

            fn equals(a: &Self, b: &Self, tol: f64) -> bool {
                flat_equals(a.as_slice(), b.as_slice(), tol)
            }
        }
    };
}

impl_matrix_manifold!(2, 2, 4);
impl_matrix_manifold!(3, 3, 9);
impl_matrix_manifold!(4, 4, 16);
impl_matrix_manifold!(2, 3, 6);
impl_matrix_manifold!(3, 4, 12);
