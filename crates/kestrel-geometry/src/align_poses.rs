//! Estimates the rigid transform `T_A_B` relating two trajectories `T_W_A[i]` and
//! `T_W_B[i]` sampled at the same instants, such that `T_W_A[i] * T_A_B ≈ T_W_B[i]`.
//!
//! [`PoseAligner`] only linearizes the problem. A Gauss-Newton driver owned by the caller
//! zeroes `H` and `g`, calls [`PoseAligner::evaluate_error_accumulate`], solves
//! `H dx = g` and applies [`PoseAligner::update`]:
//!
//! ```rust
//! use kestrel_geometry::PoseAligner;
//! use kestrel_lie::{Matrix6, Vector6, SE3};
//!
//! let t_a_b = SE3::exp(&Vector6::new(0.1, -0.2, 0.3, 0.05, 0.1, -0.1));
//! let t_w_a: Vec<SE3> = (0..10)
//!     .map(|i| SE3::exp(&Vector6::new(i as f64, 0.0, 0.0, 0.0, 0.0, 0.1 * i as f64)))
//!     .collect();
//! let t_w_b: Vec<SE3> = t_w_a.iter().map(|a| *a * t_a_b).collect();
//!
//! let aligner = PoseAligner::new(&t_w_a, &t_w_b, 0.1, 0.1)?;
//! let mut estimate = SE3::IDENTITY;
//! for _ in 0..10 {
//!     let mut h = Matrix6::zeros();
//!     let mut g = Vector6::zeros();
//!     aligner.evaluate_error_accumulate(&estimate, &mut h, &mut g);
//!     let Some(dx) = h.lu().solve(&g) else { break };
//!     estimate = aligner.update(&estimate, &dx);
//! }
//! assert!(estimate.rminus(&t_a_b).norm() < 1e-6);
//! # Ok::<(), kestrel_geometry::GeometryError>(())
//! ```

use std::marker::PhantomData;

use glam::DVec3;
use kestrel_lie::{from_na_vec3, se3, to_na_mat3, Matrix6, Vector6, SE3, SO3};
use kestrel_manifold::Manifold;
use rayon::prelude::*;

use crate::robust_cost::{HuberWeightFunction, WeightFunction};
use crate::GeometryError;

/// Noise model and robust scale of a [`PoseAligner`].
#[derive(Debug, Clone, PartialEq)]
pub struct AlignerConfig {
    /// Standard deviation of the position measurements.
    pub sigma_pos: f64,
    /// Standard deviation of the rotation measurements, in radians.
    pub sigma_rot: f64,
    /// Scale dividing the whitened residual norm before weighting.
    ///
    /// A scale of `0.0`, as returned by a scale estimator for a single residual, skips
    /// the normalization and gives every correspondence full weight `1.0`.
    pub robust_scale: f64,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            sigma_pos: 1.0,
            sigma_rot: 1.0,
            robust_scale: 1.0,
        }
    }
}

impl AlignerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the position standard deviation.
    pub fn with_sigma_pos(mut self, sigma_pos: f64) -> Self {
        self.sigma_pos = sigma_pos;
        self
    }

    /// Set the rotation standard deviation.
    pub fn with_sigma_rot(mut self, sigma_rot: f64) -> Self {
        self.sigma_rot = sigma_rot;
        self
    }

    /// Set the robust scale.
    pub fn with_robust_scale(mut self, robust_scale: f64) -> Self {
        self.robust_scale = robust_scale;
        self
    }

    /// Check that both sigmas are finite and strictly positive, and the robust scale is
    /// finite and non-negative.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for (name, value) in [("sigma_pos", self.sigma_pos), ("sigma_rot", self.sigma_rot)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeometryError::InvalidParameter { name, value });
            }
        }
        if !self.robust_scale.is_finite() || self.robust_scale < 0.0 {
            return Err(GeometryError::InvalidParameter {
                name: "robust_scale",
                value: self.robust_scale,
            });
        }
        Ok(())
    }
}

/// Whitened residual, weight and Jacobian of one correspondence.
struct Linearization {
    residual: Vector6,
    weight: f64,
    jacobian: Matrix6,
}

/// Robust least squares alignment of two pose trajectories.
///
/// The residual of correspondence `i` stacks position and rotation errors,
///
/// ```text
/// r_i = [ T_W_A[i] * t_A_B - t_W_B[i] ; log(R_W_B[i]ᵀ R_W_A[i] R_A_B) ]
/// ```
///
/// whitened by `1 / sigma_pos` and `1 / sigma_rot` and weighted by
/// `W::weight(|r_i| / robust_scale)`, or `1.0` when `robust_scale` is zero. Jacobians are taken with respect to the right
/// perturbation `T_A_B * exp(δ)`, `δ = [ρ; φ]`.
#[derive(Debug, Clone)]
pub struct PoseAligner<'a, W: WeightFunction = HuberWeightFunction> {
    t_w_a: &'a [SE3],
    t_w_b: &'a [SE3],
    config: AlignerConfig,
    weight_function: PhantomData<fn() -> W>,
}

impl<'a> PoseAligner<'a, HuberWeightFunction> {
    /// Create a Huber-weighted aligner with unit robust scale.
    ///
    /// # Errors
    ///
    /// Fails if the trajectories differ in length or a sigma is not finite and positive.
    pub fn new(
        t_w_a: &'a [SE3],
        t_w_b: &'a [SE3],
        sigma_pos: f64,
        sigma_rot: f64,
    ) -> Result<Self, GeometryError> {
        Self::with_config(
            t_w_a,
            t_w_b,
            AlignerConfig::new()
                .with_sigma_pos(sigma_pos)
                .with_sigma_rot(sigma_rot),
        )
    }
}

impl<'a, W: WeightFunction> PoseAligner<'a, W> {
    /// Create an aligner from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Fails if the trajectories differ in length or the configuration is invalid.
    pub fn with_config(
        t_w_a: &'a [SE3],
        t_w_b: &'a [SE3],
        config: AlignerConfig,
    ) -> Result<Self, GeometryError> {
        if t_w_a.len() != t_w_b.len() {
            return Err(GeometryError::SequenceLengthMismatch {
                a: t_w_a.len(),
                b: t_w_b.len(),
            });
        }
        config.validate()?;
        if t_w_a.is_empty() {
            log::warn!("PoseAligner created without correspondences");
        }
        Ok(Self {
            t_w_a,
            t_w_b,
            config,
            weight_function: PhantomData,
        })
    }

    /// Number of correspondences.
    pub fn len(&self) -> usize {
        self.t_w_a.len()
    }

    /// Whether the aligner has no correspondences.
    pub fn is_empty(&self) -> bool {
        self.t_w_a.is_empty()
    }

    /// The configuration the aligner was built with.
    pub fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Cost `0.5 Σ w_i |r_i|²` of the candidate transform.
    pub fn evaluate_error(&self, t_a_b: &SE3) -> f64 {
        (0..self.len())
            .map(|i| {
                let r = self.residual(i, t_a_b);
                0.5 * self.weight(&r) * r.norm_squared()
            })
            .sum()
    }

    /// Cost of the candidate transform, adding `Σ w_i JᵢᵀJᵢ` to `h` and subtracting
    /// `Σ w_i Jᵢᵀ rᵢ` from `g`.
    ///
    /// The accumulators are never reset, so partial sums over several calls add up.
    pub fn evaluate_error_accumulate(
        &self,
        t_a_b: &SE3,
        h: &mut Matrix6,
        g: &mut Vector6,
    ) -> f64 {
        let mut chi2 = 0.0;
        for i in 0..self.len() {
            let lin = self.linearize(i, t_a_b);
            let jtw = lin.jacobian.transpose() * lin.weight;
            *h += jtw * lin.jacobian;
            *g -= jtw * lin.residual;
            chi2 += 0.5 * lin.weight * lin.residual.norm_squared();
        }
        log::debug!(
            "PoseAligner: {} correspondences, chi2 {chi2:.6e}",
            self.len()
        );
        chi2
    }

    /// Same as [`PoseAligner::evaluate_error_accumulate`], linearizing the
    /// correspondences on the rayon thread pool.
    ///
    /// Each worker sums into private accumulators that are combined once at the end, so
    /// the result matches the serial one up to rounding.
    pub fn evaluate_error_parallel(
        &self,
        t_a_b: &SE3,
        h: &mut Matrix6,
        g: &mut Vector6,
    ) -> f64 {
        let zero = || (Matrix6::zeros(), Vector6::zeros(), 0.0);
        let (h_sum, g_sum, chi2) = (0..self.len())
            .into_par_iter()
            .fold(zero, |(mut h, mut g, chi2), i| {
                let lin = self.linearize(i, t_a_b);
                let jtw = lin.jacobian.transpose() * lin.weight;
                h += jtw * lin.jacobian;
                g -= jtw * lin.residual;
                (h, g, chi2 + 0.5 * lin.weight * lin.residual.norm_squared())
            })
            .reduce(zero, |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2));
        *h += h_sum;
        *g += g_sum;
        log::debug!(
            "PoseAligner: {} correspondences, chi2 {chi2:.6e} (parallel)",
            self.len()
        );
        chi2
    }

    /// Whitened residual of every correspondence.
    pub fn residuals(&self, t_a_b: &SE3) -> Vec<Vector6> {
        (0..self.len()).map(|i| self.residual(i, t_a_b)).collect()
    }

    /// Robust weight of every correspondence.
    pub fn weights(&self, t_a_b: &SE3) -> Vec<f64> {
        if self.config.robust_scale == 0.0 {
            return vec![1.0; self.len()];
        }
        let normalized: Vec<f64> = self
            .residuals(t_a_b)
            .iter()
            .map(|r| r.norm() / self.config.robust_scale)
            .collect();
        W::weight_vectorized(&normalized)
    }

    /// Apply a Gauss-Newton step: `T_A_B * exp(dx)`.
    pub fn update(&self, t_a_b: &SE3, dx: &Vector6) -> SE3 {
        SE3::retract(t_a_b, dx)
    }

    fn weight(&self, residual: &Vector6) -> f64 {
        if self.config.robust_scale == 0.0 {
            return 1.0;
        }
        W::weight(residual.norm() / self.config.robust_scale)
    }

    // Rotation error expressed as `local(R_W_Aᵀ R_W_B, R_A_B)`, so the manifold Jacobian
    // with respect to `R_A_B` is the rotation block of the residual Jacobian.
    fn rotation_origin(&self, i: usize) -> SO3 {
        self.t_w_a[i].r.inverse() * self.t_w_b[i].r
    }

    fn residual(&self, i: usize, t_a_b: &SE3) -> Vector6 {
        let pos = self.t_w_a[i] * t_a_b.t - self.t_w_b[i].t;
        let rot = SO3::local(&self.rotation_origin(i), &t_a_b.r);
        self.whiten(pos, from_na_vec3(&rot))
    }

    fn linearize(&self, i: usize, t_a_b: &SE3) -> Linearization {
        let pos = self.t_w_a[i] * t_a_b.t - self.t_w_b[i].t;
        let rot = SO3::local_with_jacobians(&self.rotation_origin(i), &t_a_b.r);
        let residual = self.whiten(pos, from_na_vec3(&rot.value));

        let mut jacobian = Matrix6::zeros();
        let d_pos = to_na_mat3(&(self.t_w_a[i].r * t_a_b.r).matrix());
        jacobian
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(d_pos / self.config.sigma_pos));
        jacobian
            .fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&(rot.d_arg / self.config.sigma_rot));

        Linearization {
            weight: self.weight(&residual),
            residual,
            jacobian,
        }
    }

    fn whiten(&self, pos: DVec3, rot: DVec3) -> Vector6 {
        se3::join(pos / self.config.sigma_pos, rot / self.config.sigma_rot)
    }
}
