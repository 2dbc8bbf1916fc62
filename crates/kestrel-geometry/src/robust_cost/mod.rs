//! Iteratively reweighted least squares turns a robust cost into a sequence of weighted
//! least squares problems. A [`ScaleEstimator`] measures the spread of the current
//! residuals, and a [`WeightFunction`] maps each residual, normalized by that scale, to a
//! weight in `[0, 1]`.
//!
//! ```rust
//! use kestrel_geometry::robust_cost::{
//!     HuberWeightFunction, MadScaleEstimator, ScaleEstimator, WeightFunction,
//! };
//!
//! let residuals = [0.1, -0.2, 0.05, 0.15, 8.0];
//! let scale = MadScaleEstimator::compute(&residuals).unwrap();
//! // a zero scale means full confidence: skip the normalization
//! let normalized: Vec<f64> = residuals
//!     .iter()
//!     .map(|r| if scale > 0.0 { r / scale } else { 0.0 })
//!     .collect();
//! let weights = HuberWeightFunction::weight_vectorized(&normalized);
//! assert!(weights[4] < 0.1);
//! assert_eq!(weights[2], 1.0);
//! ```

mod scale;
mod weight;

pub use scale::{
    MadScaleEstimator, NormalDistributionScaleEstimator, ScaleEstimator, UnitScaleEstimator,
};
pub use weight::{HuberWeightFunction, TukeyWeightFunction, UnitWeightFunction, WeightFunction};
