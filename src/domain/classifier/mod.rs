//! Classifier domain - the opaque model and the threshold decision

mod prediction;

pub use prediction::{decide, Decision, Prediction};

#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Trained binary classifier over scaled feature rows.
///
/// The positive class is default / non-repayment.
#[cfg_attr(test, automock)]
pub trait Classifier: Send + Sync + std::fmt::Debug {
    /// Number of features each row must carry
    fn feature_count(&self) -> usize;

    /// Model output before the link function (log-odds)
    fn raw_output(&self, row: &[f64]) -> Result<f64, DomainError>;

    /// Probability of the positive class, in [0, 1]
    fn predict_proba(&self, row: &[f64]) -> Result<f64, DomainError>;
}

/// Logistic link shared by the bundled classifiers
pub fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}
