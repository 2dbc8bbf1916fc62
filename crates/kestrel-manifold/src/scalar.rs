use nalgebra::{Matrix1, Vector1};

use crate::matrix::flat_equals;
use crate::{Differential, Manifold};

macro_rules! impl_scalar_manifold {
    ($scalar:ty) => {
        impl Manifold for $scalar {
            const DIM: usize = 1;
            type Tangent = Vector1<f64>;
            type Jacobian = Matrix1<f64>;

            fn identity() -> Self {
                0.0
            }

            fn local(origin: &Self, other: &Self) -> Self::Tangent {
                Vector1::new((*other - *origin) as f64)
            }

            fn local_with_jacobians(
                origin: &Self,
                other: &Self,
            ) -> Differential<Self::Tangent, Self::Jacobian> {
                Differential {
                    value: Self::local(origin, other),
                    d_origin: Matrix1::new(-1.0),
                    d_arg: Matrix1::new(1.0),
                }
            }

            fn retract(origin: &Self, delta: &Self::Tangent) -> Self {
                *origin + delta[0] as $scalar
            }

            fn retract_with_jacobians(
                origin: &Self,
                delta: &Self::Tangent,
            ) -> Differential<Self, Self::Jacobian> {
                Differential {
                    value: Self::retract(origin, delta),
                    d_origin: Matrix1::new(1.0),
                    d_arg: Matrix1::new(1.0),
                }
            }

            fn equals(a: &Self, b: &Self, tol: f64) -> bool {
                flat_equals(&[*a as f64], &[*b as f64], tol)
            }
        }
    };
}

impl_scalar_manifold!(f64);
impl_scalar_manifold!(f32);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scalar_local_retract() {
        let origin = 2.5f64;
        let other = -1.0f64;
        let v = f64::local(&origin, &other);
        assert_relative_eq!(v[0], -3.5);
        assert!(f64::equals(&f64::retract(&origin, &v), &other, 1e-12));
    }

    #[test]
    fn test_scalar_jacobians() {
        let d = f64::local_with_jacobians(&1.0, &4.0);
        assert_eq!(d.value[0], 3.0);
        assert_eq!(d.d_origin[0], -1.0);
        assert_eq!(d.d_arg[0], 1.0);

        let d = f32::retract_with_jacobians(&1.0, &Vector1::new(0.5));
        assert_eq!(d.value, 1.5);
        assert_eq!(d.d_origin[0], 1.0);
        assert_eq!(d.d_arg[0], 1.0);
    }

    #[test]
    fn test_scalar_log_exp() {
        assert_eq!(f64::identity(), 0.0);
        assert_eq!(f64::logmap(&3.0)[0], 3.0);
        assert_eq!(f64::expmap(&Vector1::new(-2.0)), -2.0);
        let (_, j) = f32::expmap_with_jacobian(&Vector1::new(1.0));
        assert_eq!(j[0], 1.0);
        assert_eq!(f64::DIM, 1);
    }

    #[test]
    fn test_scalar_equals() {
        assert!(f64::equals(&1.0, &(1.0 + 1e-10), 1e-8));
        assert!(!f64::equals(&1.0, &1.1, 1e-8));
        assert!(!f64::equals(&f64::NAN, &1.0, 1e-8));
        assert!(!f64::equals(&1.0, &f64::NAN, 1e-8));
    }

    #[test]
    fn test_scalar_nan_matches_vector_rule() {
        assert!(f64::equals(&f64::NAN, &f64::NAN, 1e-8));
        assert!(f32::equals(&f32::NAN, &f32::NAN, 1e-8));
        let nan = nalgebra::Vector1::new(f64::NAN);
        assert_eq!(
            f64::equals(&f64::NAN, &f64::NAN, 1e-8),
            nalgebra::Vector1::equals(&nan, &nan, 1e-8)
        );
    }
}
