#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Kestrel Geometry
//!
//! - [`robust_cost`]: scale estimators and weight functions for iteratively reweighted
//!   least squares.
//! - [`align_poses`]: Gauss-Newton building blocks that estimate the rigid transform
//!   relating two synchronized trajectories.
//! - [`combinatorics`]: index bookkeeping for matching identified measurements.

/// Least squares alignment of two pose trajectories.
pub mod align_poses;

/// Matching of identifier sequences and inlier/outlier bookkeeping.
pub mod combinatorics;

/// Robust scale estimation and weighting of residuals.
pub mod robust_cost;

mod error;

pub use align_poses::{AlignerConfig, PoseAligner};
pub use error::GeometryError;
