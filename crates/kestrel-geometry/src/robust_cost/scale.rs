use crate::GeometryError;

/// Estimates the noise scale of a set of residuals.
pub trait ScaleEstimator {
    /// Compute the scale of `residuals`.
    ///
    /// Fails with [`GeometryError::DegenerateScale`] on empty input. A single residual
    /// carries no spread and yields `0.0`.
    fn compute(residuals: &[f64]) -> Result<f64, GeometryError>;
}

/// Always returns `1.0`, leaving residuals unnormalized.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitScaleEstimator;

impl ScaleEstimator for UnitScaleEstimator {
    fn compute(residuals: &[f64]) -> Result<f64, GeometryError> {
        if residuals.is_empty() {
            return Err(GeometryError::DegenerateScale);
        }
        Ok(1.0)
    }
}

/// Sample standard deviation, assuming Gaussian residuals. Not robust to outliers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalDistributionScaleEstimator;

impl ScaleEstimator for NormalDistributionScaleEstimator {
    fn compute(residuals: &[f64]) -> Result<f64, GeometryError> {
        let n = residuals.len();
        if n == 0 {
            return Err(GeometryError::DegenerateScale);
        }
        if n == 1 {
            return Ok(0.0);
        }
        let mean = residuals.iter().sum::<f64>() / n as f64;
        let sum_sq = residuals.iter().map(|r| (r - mean).powi(2)).sum::<f64>();
        Ok((sum_sq / (n - 1) as f64).sqrt())
    }
}

/// Median absolute deviation, scaled to be consistent with the standard deviation of a
/// Gaussian.
#[derive(Debug, Clone, Copy, Default)]
pub struct MadScaleEstimator;

impl MadScaleEstimator {
    /// `1 / Φ⁻¹(3/4)`.
    pub const GAUSSIAN_CONSISTENCY: f64 = 1.4826;
}

impl ScaleEstimator for MadScaleEstimator {
    fn compute(residuals: &[f64]) -> Result<f64, GeometryError> {
        if residuals.is_empty() {
            return Err(GeometryError::DegenerateScale);
        }
        if residuals.len() == 1 {
            return Ok(0.0);
        }
        let mut values = residuals.to_vec();
        let center = median(&mut values);
        for v in values.iter_mut() {
            *v = (*v - center).abs();
        }
        let mad = median(&mut values);
        log::debug!(
            "MAD scale over {} residuals: median {center}, mad {mad}",
            residuals.len()
        );
        Ok(Self::GAUSSIAN_CONSISTENCY * mad)
    }
}

// Median of a nonempty slice, reordering it. Even lengths average the two middle values.
fn median(values: &mut [f64]) -> f64 {
    let n = values.len();
    let mid = n / 2;
    let (lower, upper_mid, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper_mid = *upper_mid;
    if n % 2 == 1 {
        return upper_mid;
    }
    let lower_mid = lower.iter().copied().max_by(f64::total_cmp).unwrap_or(upper_mid);
    0.5 * (lower_mid + upper_mid)
}
