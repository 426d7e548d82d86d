//! Median / inter-quartile range scaling
//!
//! Follows scikit-learn's `RobustScaler` with default settings: the center
//! is the median, the scale is the 25th-75th percentile range, percentiles
//! use linear interpolation over the observed (non-NaN) values and a range
//! below `10 * f64::EPSILON` is treated as zero and replaced by 1.0. Missing
//! values pass through untouched.

use crate::domain::{DomainError, FeatureTable};

const LOWER_QUANTILE: f64 = 0.25;
const UPPER_QUANTILE: f64 = 0.75;
const ZERO_RANGE: f64 = 10.0 * f64::EPSILON;

/// Unfitted scaler. The only thing it can do is fit, which consumes it.
#[derive(Debug, Default, Clone, Copy)]
pub struct RobustScaler;

impl RobustScaler {
    pub fn new() -> Self {
        Self
    }

    /// Compute per-feature center and scale over the whole table
    pub fn fit(self, table: &FeatureTable) -> Result<FittedRobustScaler, DomainError> {
        let mut centers = Vec::with_capacity(table.feature_names().len());
        let mut scales = Vec::with_capacity(table.feature_names().len());

        for (index, name) in table.feature_names().iter().enumerate() {
            let mut observed: Vec<f64> = table.column(index).filter(|v| !v.is_nan()).collect();

            if observed.is_empty() {
                return Err(DomainError::configuration(format!(
                    "feature '{}' has no observed values",
                    name
                )));
            }

            observed.sort_by(f64::total_cmp);

            let range = percentile(&observed, UPPER_QUANTILE) - percentile(&observed, LOWER_QUANTILE);

            centers.push(percentile(&observed, 0.5));
            scales.push(if range < ZERO_RANGE { 1.0 } else { range });
        }

        Ok(FittedRobustScaler { centers, scales })
    }
}

/// Linear-interpolated percentile of sorted, non-empty values
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Scaler state after fitting; immutable for the rest of the process
#[derive(Debug, Clone, PartialEq)]
pub struct FittedRobustScaler {
    centers: Vec<f64>,
    scales: Vec<f64>,
}

impl FittedRobustScaler {
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    pub fn feature_count(&self) -> usize {
        self.centers.len()
    }

    pub fn transform(&self, raw: &[f64]) -> Vec<f64> {
        debug_assert_eq!(raw.len(), self.centers.len());

        raw.iter()
            .zip(self.centers.iter().zip(&self.scales))
            .map(|(value, (center, scale))| (value - center) / scale)
            .collect()
    }
}
