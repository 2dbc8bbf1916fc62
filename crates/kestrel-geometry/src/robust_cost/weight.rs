/// Maps a residual normalized by its scale to an IRLS weight.
pub trait WeightFunction {
    /// Weight of a single normalized residual.
    fn weight(r: f64) -> f64;

    /// One weight per normalized residual.
    fn weight_vectorized(residuals: &[f64]) -> Vec<f64> {
        residuals.iter().map(|&r| Self::weight(r)).collect()
    }
}

/// Plain least squares: every residual has weight `1.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitWeightFunction;

impl WeightFunction for UnitWeightFunction {
    fn weight(_r: f64) -> f64 {
        1.0
    }
}

/// Huber weights: quadratic cost inside `[-k, k]`, linear outside.
///
/// Large residuals contribute a gradient of bounded magnitude `k` instead of one
/// growing linearly with the residual.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuberWeightFunction;

impl HuberWeightFunction {
    /// Threshold giving 95% efficiency on Gaussian residuals.
    pub const K: f64 = 1.345;
}

impl WeightFunction for HuberWeightFunction {
    fn weight(r: f64) -> f64 {
        let abs = r.abs();
        if abs <= Self::K {
            1.0
        } else {
            Self::K / abs
        }
    }
}

/// Tukey biweight: residuals beyond `k` are rejected with weight `0.0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TukeyWeightFunction;

impl TukeyWeightFunction {
    /// Threshold giving 95% efficiency on Gaussian residuals.
    pub const K: f64 = 4.6851;
}

impl WeightFunction for TukeyWeightFunction {
    fn weight(r: f64) -> f64 {
        let abs = r.abs();
        if abs > Self::K {
            return 0.0;
        }
        let u = abs / Self::K;
        (1.0 - u * u).powi(2)
    }
}
