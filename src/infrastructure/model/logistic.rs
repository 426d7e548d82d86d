//! Logistic regression classifier

use serde::{Deserialize, Serialize};

use crate::domain::{sigmoid, Classifier, DomainError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
}

impl LogisticRegression {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
            feature_names: None,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.coefficients.is_empty() {
            return Err(DomainError::configuration(
                "logistic regression has no coefficients",
            ));
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(DomainError::configuration(
                "logistic regression parameters must be finite",
            ));
        }

        Ok(())
    }

    fn check_width(&self, row: &[f64]) -> Result<(), DomainError> {
        if row.len() != self.coefficients.len() {
            return Err(DomainError::internal(format!(
                "expected {} features, got {}",
                self.coefficients.len(),
                row.len()
            )));
        }
        Ok(())
    }
}

impl Classifier for LogisticRegression {
    fn feature_count(&self) -> usize {
        self.coefficients.len()
    }

    fn raw_output(&self, row: &[f64]) -> Result<f64, DomainError> {
        self.check_width(row)?;

        Ok(self
            .coefficients
            .iter()
            .zip(row)
            .fold(self.intercept, |acc, (w, x)| acc + w * x))
    }

    fn predict_proba(&self, row: &[f64]) -> Result<f64, DomainError> {
        let margin = self.raw_output(row)?;

        if margin.is_nan() {
            return Err(DomainError::internal(
                "input contains missing values the logistic model cannot handle",
            ));
        }

        Ok(sigmoid(margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_output_and_probability() {
        let model = LogisticRegression::new(vec![2.0, -1.0], 0.5);

        assert_eq!(model.raw_output(&[1.0, 3.0]).unwrap(), -0.5);
        assert_eq!(model.predict_proba(&[0.25, 1.0]).unwrap(), 0.5);
    }

    #[test]
    fn test_wrong_width_is_internal_error() {
        let model = LogisticRegression::new(vec![1.0], 0.0);
        assert!(matches!(
            model.predict_proba(&[1.0, 2.0]),
            Err(DomainError::Internal { .. })
        ));
    }

    #[test]
    fn test_missing_value_is_internal_error() {
        let model = LogisticRegression::new(vec![1.0], 0.0);
        assert!(model.predict_proba(&[f64::NAN]).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(LogisticRegression::new(vec![], 0.0).validate().is_err());
        assert!(LogisticRegression::new(vec![f64::INFINITY], 0.0).validate().is_err());
        assert!(LogisticRegression::new(vec![1.0], 0.0).validate().is_ok());
    }
}
