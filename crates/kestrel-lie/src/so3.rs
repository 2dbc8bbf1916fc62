//! # SO(3): rotations in 3D
//!
//! Rotations are stored as unit quaternions. `q` and `-q` describe the same rotation;
//! [`SO3::log`] always returns the shortest-arc tangent vector by flipping the
//! quaternion into the `w >= 0` hemisphere first.
//!
//! The Lie algebra so(3) is identified with R³ through [`SO3::hat`] and [`SO3::vee`]:
//! the direction of a tangent vector is the rotation axis, its norm the angle.

use glam::{DMat3, DQuat, DVec3};
use rand::Rng;

use crate::{JACOBIAN_TAYLOR_EPSILON, SMALL_ANGLE_EPSILON};

/// A 3D rotation, stored as a unit quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SO3 {
    /// Unit quaternion.
    pub q: DQuat,
}

impl Default for SO3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SO3 {
    /// The identity rotation.
    pub const IDENTITY: Self = Self { q: DQuat::IDENTITY };

    /// Create a rotation from a quaternion.
    ///
    /// NOTE: the quaternion must be normalized.
    #[inline]
    pub fn new(q: DQuat) -> Self {
        Self { q }
    }

    /// Create a rotation from the `[x, y, z, w]` quaternion coefficients.
    pub fn from_array(arr: [f64; 4]) -> Self {
        Self {
            q: DQuat::from_array(arr).normalize(),
        }
    }

    /// Return the `[x, y, z, w]` quaternion coefficients.
    pub fn to_array(&self) -> [f64; 4] {
        self.q.to_array()
    }

    /// Create a rotation from a rotation matrix.
    pub fn from_matrix(mat: &DMat3) -> Self {
        Self {
            q: DQuat::from_mat3(mat).normalize(),
        }
    }

    /// Sample a rotation uniformly from SO(3) using the thread local generator.
    pub fn from_random() -> Self {
        Self::from_rng(&mut rand::rng())
    }

    /// Sample a rotation uniformly from SO(3) (Shoemake's method).
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let r1: f64 = rng.random();
        let r2: f64 = rng.random();
        let r3: f64 = rng.random();

        let one_minus_r1_sqrt = (1.0 - r1).sqrt();
        let r1_sqrt = r1.sqrt();
        let two_pi = 2.0 * std::f64::consts::PI;

        let w = one_minus_r1_sqrt * (two_pi * r2).cos();
        let x = one_minus_r1_sqrt * (two_pi * r2).sin();
        let y = r1_sqrt * (two_pi * r3).cos();
        let z = r1_sqrt * (two_pi * r3).sin();

        Self {
            q: DQuat::from_xyzw(x, y, z, w).normalize(),
        }
    }

    /// Right plus: `self * exp(tau)`.
    #[inline]
    pub fn rplus(&self, tau: DVec3) -> Self {
        *self * SO3::exp(tau)
    }

    /// Right minus: `log(self⁻¹ * other)`.
    #[inline]
    pub fn rminus(&self, other: &Self) -> DVec3 {
        (self.inverse() * *other).log()
    }

    /// The 3x3 rotation matrix.
    pub fn matrix(&self) -> DMat3 {
        DMat3::from_quat(self.q)
    }

    /// Adjoint representation. For SO(3) this is the rotation matrix itself.
    pub fn adjoint(&self) -> DMat3 {
        self.matrix()
    }

    /// Group inverse.
    pub fn inverse(&self) -> Self {
        Self {
            q: self.q.conjugate(),
        }
    }

    /// Lie algebra -> Lie group.
    pub fn exp(v: DVec3) -> Self {
        let theta_sq = v.dot(v);
        let theta = theta_sq.sqrt();

        let (w, b) = if theta < SMALL_ANGLE_EPSILON {
            // taylor expansion of cos(x/2) and sin(x/2)/x around 0
            (1.0 - theta_sq / 8.0, 0.5 - theta_sq / 48.0)
        } else {
            let half = 0.5 * theta;
            (half.cos(), half.sin() / theta)
        };

        let xyz = v * b;
        Self {
            q: DQuat::from_xyzw(xyz.x, xyz.y, xyz.z, w),
        }
    }

    /// Lie group -> Lie algebra.
    pub fn log(&self) -> DVec3 {
        let mut w = self.q.w;
        let mut vec = DVec3::new(self.q.x, self.q.y, self.q.z);

        if w < 0.0 {
            w = -w;
            vec = -vec;
        }

        let theta = vec.length();
        if theta > SMALL_ANGLE_EPSILON {
            vec * (2.0 * theta.atan2(w) / theta)
        } else {
            vec * (2.0 / w)
        }
    }

    /// Vector space -> Lie algebra (skew-symmetric matrix).
    pub fn hat(v: DVec3) -> DMat3 {
        let (a, b, c) = (v.x, v.y, v.z);
        DMat3::from_cols_array(&[0.0, c, -b, -c, 0.0, a, b, -a, 0.0])
    }

    /// Lie algebra -> vector space.
    pub fn vee(omega: DMat3) -> DVec3 {
        DVec3::new(omega.y_axis.z, omega.z_axis.x, omega.x_axis.y)
    }

    /// Left Jacobian `Jl(v)`: `exp(v + δ) ≈ exp(Jl(v) δ) * exp(v)`.
    pub fn left_jacobian(v: DVec3) -> DMat3 {
        let skew = Self::hat(v);
        let skew_sq = skew * skew;
        let theta_sq = v.dot(v);
        let theta = theta_sq.sqrt();

        let (a, b) = if theta < JACOBIAN_TAYLOR_EPSILON {
            (0.5 - theta_sq / 24.0, 1.0 / 6.0 - theta_sq / 120.0)
        } else {
            (
                (1.0 - theta.cos()) / theta_sq,
                (theta - theta.sin()) / (theta_sq * theta),
            )
        };

        DMat3::IDENTITY + skew * a + skew_sq * b
    }

    /// Right Jacobian `Jr(v) = Jl(-v)`: `exp(v + δ) ≈ exp(v) * exp(Jr(v) δ)`.
    pub fn right_jacobian(v: DVec3) -> DMat3 {
        Self::left_jacobian(-v)
    }

    /// Inverse of the left Jacobian: `log(exp(δ) * exp(v)) ≈ v + Jl⁻¹(v) δ`.
    pub fn left_jacobian_inv(v: DVec3) -> DMat3 {
        let skew = Self::hat(v);
        let skew_sq = skew * skew;
        let theta_sq = v.dot(v);
        let theta = theta_sq.sqrt();

        let coeff = if theta < JACOBIAN_TAYLOR_EPSILON {
            1.0 / 12.0 + theta_sq / 720.0
        } else {
            1.0 / theta_sq - (1.0 + theta.cos()) / (2.0 * theta * theta.sin())
        };

        DMat3::IDENTITY - skew * 0.5 + skew_sq * coeff
    }

    /// Inverse of the right Jacobian: `log(exp(v) * exp(δ)) ≈ v + Jr⁻¹(v) δ`.
    pub fn right_jacobian_inv(v: DVec3) -> DMat3 {
        Self::left_jacobian_inv(-v)
    }
}

impl std::ops::Mul<SO3> for SO3 {
    type Output = SO3;

    fn mul(self, rhs: Self) -> Self::Output {
        Self { q: self.q * rhs.q }
    }
}

impl std::ops::MulAssign<SO3> for SO3 {
    #[inline]
    fn mul_assign(&mut self, rhs: SO3) {
        *self = *self * rhs;
    }
}

impl std::ops::Mul<DVec3> for SO3 {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> Self::Output {
        self.q * rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-10;

    fn assert_mat3_eq(a: &DMat3, b: &DMat3, epsilon: f64) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for i in 0..9 {
            assert_relative_eq!(a[i], b[i], epsilon = epsilon);
        }
    }

    #[test]
    fn test_identity() {
        let s = SO3::IDENTITY;
        assert_eq!(s.q, DQuat::from_xyzw(0.0, 0.0, 0.0, 1.0));
        assert_relative_eq!(s.log().length(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_from_matrix() {
        let mat = DMat3::from_cols_array(&[1.0, 0.0, 0.0, 0.0, 0.6, 0.8, 0.0, -0.8, 0.6]);
        let s = SO3::from_matrix(&mat);
        assert_mat3_eq(&s.matrix(), &mat, 1e-12);
    }

    #[test]
    fn test_exp_log() {
        let test_vectors = [
            DVec3::new(0.1, 0.2, 0.3),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, -2.5, 0.0),
            DVec3::new(1e-12, 0.0, -1e-12),
            DVec3::new(-0.5, 0.3, -0.2),
        ];

        for v in test_vectors.iter() {
            let log = SO3::exp(*v).log();
            assert_relative_eq!(log.x, v.x, epsilon = EPSILON);
            assert_relative_eq!(log.y, v.y, epsilon = EPSILON);
            assert_relative_eq!(log.z, v.z, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_log_shortest_arc() {
        let s = SO3::exp(DVec3::new(0.3, -0.1, 0.2));
        let flipped = SO3::new(-s.q);
        let (a, b) = (s.log(), flipped.log());
        assert_relative_eq!(a.x, b.x, epsilon = EPSILON);
        assert_relative_eq!(a.y, b.y, epsilon = EPSILON);
        assert_relative_eq!(a.z, b.z, epsilon = EPSILON);
    }

    #[test]
    fn test_hat_vee() {
        let v = DVec3::new(1.0, 2.0, 3.0);
        let hat_v = SO3::hat(v);
        assert_eq!(hat_v.x_axis.y, 3.0);
        assert_eq!(hat_v.x_axis.z, -2.0);
        assert_eq!(hat_v.y_axis.x, -3.0);
        assert_eq!(hat_v.y_axis.z, 1.0);
        assert_eq!(hat_v.z_axis.x, 2.0);
        assert_eq!(hat_v.z_axis.y, -1.0);
        assert_eq!(SO3::vee(hat_v), v);

        // hat(v) * w = v x w
        let w = DVec3::new(-0.4, 0.7, 0.1);
        let cross = hat_v * w;
        assert_relative_eq!((cross - v.cross(w)).length(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_rplus_rminus_roundtrip() {
        let x = SO3::from_random();
        let tau = DVec3::new(0.4, -0.2, 0.7);
        let y = x.rplus(tau);
        let diff = x.rminus(&y);
        assert_relative_eq!(diff.x, tau.x, epsilon = 1e-9);
        assert_relative_eq!(diff.y, tau.y, epsilon = 1e-9);
        assert_relative_eq!(diff.z, tau.z, epsilon = 1e-9);
    }

    #[test]
    fn test_mul_vec() {
        let s = SO3::exp(DVec3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2));
        let p = s * DVec3::X;
        assert_relative_eq!((p - DVec3::Y).length(), 0.0, epsilon = EPSILON);
        let m = s.matrix() * DVec3::X;
        assert_relative_eq!((p - m).length(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_inverse() {
        let s = SO3::exp(DVec3::new(0.5, -0.2, 0.1));
        let identity = s.matrix() * s.inverse().matrix();
        assert_mat3_eq(&identity, &DMat3::IDENTITY, 1e-12);
    }

    #[test]
    fn test_jacobian_inverses() {
        for v in [
            DVec3::new(0.1, 0.2, 0.3),
            DVec3::new(1e-10, 0.0, 0.0),
            DVec3::new(-1.2, 0.4, 0.9),
        ] {
            let jl = SO3::left_jacobian(v) * SO3::left_jacobian_inv(v);
            let jr = SO3::right_jacobian(v) * SO3::right_jacobian_inv(v);
            assert_mat3_eq(&jl, &DMat3::IDENTITY, 1e-9);
            assert_mat3_eq(&jr, &DMat3::IDENTITY, 1e-9);
        }
    }

    #[test]
    fn test_right_jacobian_first_order() {
        // exp(v + d) ≈ exp(v) * exp(Jr(v) d)
        let v = DVec3::new(0.3, -0.6, 0.2);
        let d = DVec3::new(1e-6, -2e-6, 1.5e-6);
        let lhs = SO3::exp(v + d);
        let rhs = SO3::exp(v) * SO3::exp(SO3::right_jacobian(v) * d);
        assert_relative_eq!(lhs.rminus(&rhs).length(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_adjoint() {
        let x = SO3::exp(DVec3::new(0.1, 0.2, 0.3));
        let y = SO3::exp(DVec3::new(-0.2, 0.1, 0.4));
        assert_mat3_eq(&(x * y).adjoint(), &(x.adjoint() * y.adjoint()), 1e-12);
    }
}
