//! # SE(3): rigid body transformations in 3D
//!
//! A pose is a rotation [`SO3`] plus a translation. Composition follows the usual
//! convention `(R1, t1) * (R2, t2) = (R1 R2, t1 + R1 t2)`, so `T_W_B = T_W_A * T_A_B`.
//!
//! Tangent vectors are `[ρ; φ]` with `ρ` the translational and `φ` the rotational
//! component. The exponential map is the true SE(3) exponential, i.e. the translation
//! is `Jl(φ) ρ` rather than `ρ`.

use glam::{DMat3, DMat4, DQuat, DVec3};
use rand::Rng;

use crate::{from_na_vec3, so3::SO3, to_na_mat3, to_na_vec3, JACOBIAN_TAYLOR_EPSILON};

/// 6-vector used for SE(3) tangents.
pub type Vector6 = nalgebra::Vector6<f64>;

/// 6x6 matrix used for SE(3) adjoints and Jacobians.
pub type Matrix6 = nalgebra::Matrix6<f64>;

/// A rigid body transformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SE3 {
    /// Rotation part.
    pub r: SO3,
    /// Translation part.
    pub t: DVec3,
}

impl Default for SE3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SE3 {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        r: SO3::IDENTITY,
        t: DVec3::ZERO,
    };

    /// Create a pose from its rotation and translation.
    pub fn new(rotation: SO3, translation: DVec3) -> Self {
        Self {
            r: rotation,
            t: translation,
        }
    }

    /// Create a pose from a (normalized) quaternion and a translation.
    pub fn from_qt(q: DQuat, t: DVec3) -> Self {
        Self::new(SO3::new(q), t)
    }

    /// Create a pose from a homogeneous 4x4 matrix.
    pub fn from_matrix(mat: &DMat4) -> Self {
        let rot = DMat3::from_mat4(*mat);
        Self::new(SO3::from_matrix(&rot), mat.w_axis.truncate())
    }

    /// Sample a pose with uniform rotation and translation in `[-1, 1]³`.
    pub fn from_random() -> Self {
        Self::from_rng(&mut rand::rng())
    }

    /// Sample a pose with uniform rotation and translation in `[-1, 1]³`.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let r = SO3::from_rng(rng);
        let t = DVec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        Self::new(r, t)
    }

    /// Rotation part.
    #[inline]
    pub fn rotation(&self) -> SO3 {
        self.r
    }

    /// Translation part.
    #[inline]
    pub fn translation(&self) -> DVec3 {
        self.t
    }

    /// Right plus: `self * exp(tau)`.
    #[inline]
    pub fn rplus(&self, tau: &Vector6) -> Self {
        *self * SE3::exp(tau)
    }

    /// Right minus: `log(self⁻¹ * other)`.
    #[inline]
    pub fn rminus(&self, other: &Self) -> Vector6 {
        (self.inverse() * *other).log()
    }

    /// Homogeneous 4x4 matrix.
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.r.q, self.t)
    }

    /// Group inverse.
    pub fn inverse(&self) -> Self {
        let r_inv = self.r.inverse();
        Self {
            r: r_inv,
            t: r_inv * (-self.t),
        }
    }

    /// Adjoint `Ad = [[R, t^ R], [0, R]]` for the `[ρ; φ]` tangent ordering.
    pub fn adjoint(&self) -> Matrix6 {
        let rot = self.r.matrix();
        let mut adj = Matrix6::zeros();
        adj.fixed_view_mut::<3, 3>(0, 0).copy_from(&to_na_mat3(&rot));
        adj.fixed_view_mut::<3, 3>(3, 3).copy_from(&to_na_mat3(&rot));
        adj.fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&to_na_mat3(&(SO3::hat(self.t) * rot)));
        adj
    }

    /// Lie algebra -> Lie group.
    pub fn exp(v: &Vector6) -> Self {
        let (rho, phi) = split(v);
        let r = SO3::exp(phi);
        let t = SO3::left_jacobian(phi) * rho;
        Self { r, t }
    }

    /// Lie group -> Lie algebra.
    pub fn log(&self) -> Vector6 {
        let phi = self.r.log();
        let rho = SO3::left_jacobian_inv(phi) * self.t;
        join(rho, phi)
    }

    /// Left Jacobian `Jl(v)`: `exp(v + δ) ≈ exp(Jl(v) δ) * exp(v)`.
    pub fn left_jacobian(v: &Vector6) -> Matrix6 {
        let (rho, phi) = split(v);
        let jl = to_na_mat3(&SO3::left_jacobian(phi));
        let q = to_na_mat3(&q_block(rho, phi));

        let mut jac = Matrix6::zeros();
        jac.fixed_view_mut::<3, 3>(0, 0).copy_from(&jl);
        jac.fixed_view_mut::<3, 3>(3, 3).copy_from(&jl);
        jac.fixed_view_mut::<3, 3>(0, 3).copy_from(&q);
        jac
    }

    /// Right Jacobian `Jr(v) = Jl(-v)`: `exp(v + δ) ≈ exp(v) * exp(Jr(v) δ)`.
    pub fn right_jacobian(v: &Vector6) -> Matrix6 {
        Self::left_jacobian(&(-v))
    }

    /// Inverse of the left Jacobian, assembled blockwise.
    pub fn left_jacobian_inv(v: &Vector6) -> Matrix6 {
        let (rho, phi) = split(v);
        let jl_inv = to_na_mat3(&SO3::left_jacobian_inv(phi));
        let q = to_na_mat3(&q_block(rho, phi));

        let mut jac = Matrix6::zeros();
        jac.fixed_view_mut::<3, 3>(0, 0).copy_from(&jl_inv);
        jac.fixed_view_mut::<3, 3>(3, 3).copy_from(&jl_inv);
        jac.fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&(-jl_inv * q * jl_inv));
        jac
    }

    /// Inverse of the right Jacobian.
    pub fn right_jacobian_inv(v: &Vector6) -> Matrix6 {
        Self::left_jacobian_inv(&(-v))
    }
}

/// Split a `[ρ; φ]` tangent into its translational and rotational parts.
#[inline]
pub fn split(v: &Vector6) -> (DVec3, DVec3) {
    (
        from_na_vec3(&v.fixed_rows::<3>(0).into_owned()),
        from_na_vec3(&v.fixed_rows::<3>(3).into_owned()),
    )
}

/// Join translational and rotational parts into a `[ρ; φ]` tangent.
#[inline]
pub fn join(rho: DVec3, phi: DVec3) -> Vector6 {
    let mut v = Vector6::zeros();
    v.fixed_rows_mut::<3>(0).copy_from(&to_na_vec3(rho));
    v.fixed_rows_mut::<3>(3).copy_from(&to_na_vec3(phi));
    v
}

/// The `Q(ρ, φ)` block coupling translation and rotation in the SE(3) left Jacobian.
fn q_block(rho: DVec3, phi: DVec3) -> DMat3 {
    let rx = SO3::hat(rho);
    let px = SO3::hat(phi);
    let theta_sq = phi.dot(phi);

    let (b, c, d) = if theta_sq.sqrt() < JACOBIAN_TAYLOR_EPSILON {
        (
            1.0 / 6.0 - theta_sq / 120.0,
            -1.0 / 24.0 + theta_sq / 720.0,
            -1.0 / 120.0 + theta_sq / 5040.0,
        )
    } else {
        let theta = theta_sq.sqrt();
        let theta_3 = theta_sq * theta;
        let theta_4 = theta_sq * theta_sq;
        let theta_5 = theta_4 * theta;
        let (sin_t, cos_t) = theta.sin_cos();
        (
            (theta - sin_t) / theta_3,
            (1.0 - theta_sq / 2.0 - cos_t) / theta_4,
            (theta - sin_t - theta_3 / 6.0) / theta_5,
        )
    };

    let px_rx = px * rx;
    let rx_px = rx * px;
    let px_rx_px = px_rx * px;
    let px_px = px * px;

    rx * 0.5 + (px_rx + rx_px + px_rx_px) * b
        - (px * px_rx + rx_px * px - px_rx_px * 3.0) * c
        - (px_rx_px * px + px_px * rx * px) * (0.5 * (c - 3.0 * d))
}

impl std::ops::Mul<SE3> for SE3 {
    type Output = SE3;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            r: self.r * rhs.r,
            t: self.t + self.r * rhs.t,
        }
    }
}

impl std::ops::MulAssign<SE3> for SE3 {
    #[inline]
    fn mul_assign(&mut self, rhs: SE3) {
        *self = *self * rhs;
    }
}

impl std::ops::Mul<DVec3> for SE3 {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> Self::Output {
        self.r * rhs + self.t
    }
}
