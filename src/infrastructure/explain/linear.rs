//! SHAP explainer for the logistic model, interventional on a background mean

use std::sync::Arc;

use crate::domain::{Additivity, Classifier, DomainError, Explainer};
use crate::infrastructure::model::LogisticRegression;

/// phi_i = w_i * (x_i - mean_i); baseline = w . mean + b
#[derive(Debug)]
pub struct LinearExplainer {
    model: Arc<LogisticRegression>,
    feature_means: Vec<f64>,
    expected_value: f64,
}

impl LinearExplainer {
    pub fn new(model: Arc<LogisticRegression>, feature_means: Vec<f64>) -> Result<Self, DomainError> {
        if feature_means.len() != model.coefficients.len() {
            return Err(DomainError::configuration(format!(
                "linear explainer has {} feature means but the model has {} coefficients",
                feature_means.len(),
                model.coefficients.len()
            )));
        }

        let expected_value = model.raw_output(&feature_means).map_err(|e| {
            DomainError::configuration(format!("cannot compute the baseline: {}", e))
        })?;

        if !expected_value.is_finite() {
            return Err(DomainError::configuration("linear explainer baseline is not finite"));
        }

        Ok(Self {
            model,
            feature_means,
            expected_value,
        })
    }

    pub fn feature_means(&self) -> &[f64] {
        &self.feature_means
    }
}

impl Explainer for LinearExplainer {
    fn expected_value(&self) -> f64 {
        self.expected_value
    }

    fn shap_values(
        &self,
        rows: &[Vec<f64>],
        additivity: Additivity,
    ) -> Result<Vec<Vec<f64>>, DomainError> {
        rows.iter()
            .map(|row| {
                let raw = self.model.raw_output(row)?;
                let phi: Vec<f64> = self
                    .model
                    .coefficients
                    .iter()
                    .zip(row.iter().zip(&self.feature_means))
                    .map(|(w, (x, mean))| w * (x - mean))
                    .collect();

                additivity.check(&phi, self.expected_value, raw)?;
                Ok(phi)
            })
            .collect()
    }
}
