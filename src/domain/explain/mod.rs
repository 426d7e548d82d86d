//! Explanation domain - SHAP attributions, local and global

mod explanation;
mod sampling;

pub use explanation::Explanation;
pub use sampling::{sample_positions, DEFAULT_SAMPLE_SEED};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// How strictly attributions must add up to the model output
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Additivity {
    /// Drift between `sum(phi) + baseline` and the raw output is only logged
    Relaxed,
    /// Drift above `tolerance` is an internal error
    Enforce { tolerance: f64 },
}

impl Additivity {
    /// Compare one row's attributions against the model's raw output
    pub fn check(&self, attributions: &[f64], baseline: f64, raw_output: f64) -> Result<(), DomainError> {
        let reconstructed = baseline + attributions.iter().sum::<f64>();
        let drift = (reconstructed - raw_output).abs();

        match self {
            Self::Enforce { tolerance } if drift > *tolerance || drift.is_nan() => {
                Err(DomainError::internal(format!(
                    "additivity check failed: attributions reconstruct {} but the model output is {}",
                    reconstructed, raw_output
                )))
            }
            Self::Relaxed if drift > 1e-6 => {
                tracing::debug!(drift, "Attribution additivity drift tolerated");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

/// Fitted attribution model over scaled feature rows.
///
/// Attributions and the baseline live in the classifier's raw (log-odds)
/// space.
#[cfg_attr(test, automock)]
pub trait Explainer: Send + Sync + std::fmt::Debug {
    /// Reference output absent any feature information
    fn expected_value(&self) -> f64;

    /// One attribution per feature for each row, rows in input order
    fn shap_values(
        &self,
        rows: &[Vec<f64>],
        additivity: Additivity,
    ) -> Result<Vec<Vec<f64>>, DomainError>;
}
