//! Classifier artifacts and their loading

pub mod gbdt;
mod logistic;

pub use gbdt::{GradientBoostedTrees, Tree, TreeNode};
pub use logistic::LogisticRegression;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::{Classifier, DomainError};

/// Model file contents, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticRegression),
    GradientBoosting(GradientBoostedTrees),
}

/// A validated classifier, keeping its concrete family for the explainer
#[derive(Debug, Clone)]
pub enum LoadedModel {
    Logistic(Arc<LogisticRegression>),
    Trees(Arc<GradientBoostedTrees>),
}

impl LoadedModel {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, DomainError> {
        match artifact {
            ModelArtifact::LogisticRegression(model) => {
                model.validate()?;
                Ok(Self::Logistic(Arc::new(model)))
            }
            ModelArtifact::GradientBoosting(model) => {
                model.validate()?;
                Ok(Self::Trees(Arc::new(model)))
            }
        }
    }

    pub fn classifier(&self) -> Arc<dyn Classifier> {
        match self {
            Self::Logistic(model) => model.clone(),
            Self::Trees(model) => model.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logistic(_) => "logistic_regression",
            Self::Trees(_) => "gradient_boosting",
        }
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        match self {
            Self::Logistic(model) => model.feature_names.as_deref(),
            Self::Trees(model) => model.feature_names.as_deref(),
        }
    }

    /// Check the model agrees with the dataset's feature columns
    pub fn check_features(&self, dataset_features: &[String]) -> Result<(), DomainError> {
        let expected = self.classifier().feature_count();

        if expected != dataset_features.len() {
            return Err(DomainError::configuration(format!(
                "model expects {} features but the dataset has {}",
                expected,
                dataset_features.len()
            )));
        }

        if let Some(names) = self.feature_names() {
            if names.len() != dataset_features.len() {
                return Err(DomainError::configuration(format!(
                    "model names {} features but the dataset has {}",
                    names.len(),
                    dataset_features.len()
                )));
            }

            if let Some((model_name, data_name)) = names
                .iter()
                .zip(dataset_features)
                .find(|(model_name, data_name)| model_name != data_name)
            {
                return Err(DomainError::configuration(format!(
                    "model feature '{}' does not match dataset column '{}'",
                    model_name, data_name
                )));
            }
        }

        Ok(())
    }
}

/// Read and validate a model artifact from a JSON file
pub fn load_model(path: &Path) -> Result<LoadedModel, DomainError> {
    let file = File::open(path).map_err(|e| {
        DomainError::configuration(format!("cannot open model '{}': {}", path.display(), e))
    })?;

    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        DomainError::configuration(format!("cannot parse model '{}': {}", path.display(), e))
    })?;

    let model = LoadedModel::from_artifact(artifact)?;
    info!(kind = model.kind(), path = %path.display(), "Model loaded");

    Ok(model)
}
