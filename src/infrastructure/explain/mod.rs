//! Attribution models and their loading

mod linear;
mod tree;

pub use linear::LinearExplainer;
pub use tree::{tree_shap, TreeExplainer};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::{DomainError, Explainer};
use crate::infrastructure::model::LoadedModel;

/// Explainer file contents, tagged by `kind`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplainerArtifact {
    Linear {
        /// Background mean per scaled feature; the dataset mean when absent
        #[serde(default)]
        feature_means: Option<Vec<f64>>,
    },
    Tree,
}

impl ExplainerArtifact {
    /// Bind the explainer to the loaded model
    pub fn build(
        self,
        model: &LoadedModel,
        dataset_means: impl FnOnce() -> Vec<f64>,
    ) -> Result<Arc<dyn Explainer>, DomainError> {
        match (self, model) {
            (Self::Linear { feature_means }, LoadedModel::Logistic(model)) => {
                let means = feature_means.unwrap_or_else(dataset_means);
                Ok(Arc::new(LinearExplainer::new(model.clone(), means)?))
            }
            (Self::Tree, LoadedModel::Trees(model)) => Ok(Arc::new(TreeExplainer::new(model.clone()))),
            (artifact, model) => Err(DomainError::configuration(format!(
                "{} explainer cannot explain a {} model",
                artifact.kind(),
                model.kind()
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::Tree => "tree",
        }
    }
}

/// Read an explainer artifact from a JSON file
pub fn load_explainer_artifact(path: &Path) -> Result<ExplainerArtifact, DomainError> {
    let file = File::open(path).map_err(|e| {
        DomainError::configuration(format!("cannot open explainer '{}': {}", path.display(), e))
    })?;

    let artifact: ExplainerArtifact = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        DomainError::configuration(format!("cannot parse explainer '{}': {}", path.display(), e))
    })?;

    info!(kind = artifact.kind(), path = %path.display(), "Explainer artifact loaded");
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::model::gbdt::tests::sample_ensemble;
    use crate::infrastructure::model::LogisticRegression;

    fn logistic() -> LoadedModel {
        LoadedModel::Logistic(Arc::new(LogisticRegression::new(vec![1.0, 2.0], 0.5)))
    }

    #[test]
    fn test_linear_uses_dataset_means_when_absent() {
        let artifact: ExplainerArtifact = serde_json::from_str(r#"{"kind": "linear"}"#).unwrap();
        let explainer = artifact.build(&logistic(), || vec![1.0, 1.0]).unwrap();

        assert_eq!(explainer.expected_value(), 3.5);
    }

    #[test]
    fn test_linear_prefers_artifact_means() {
        let artifact: ExplainerArtifact =
            serde_json::from_str(r#"{"kind": "linear", "feature_means": [0.0, 0.0]}"#).unwrap();
        let explainer = artifact
            .build(&logistic(), || panic!("dataset means not needed"))
            .unwrap();

        assert_eq!(explainer.expected_value(), 0.5);
    }

    #[test]
    fn test_tree_explainer_for_tree_model() {
        let artifact: ExplainerArtifact = serde_json::from_str(r#"{"kind": "tree"}"#).unwrap();
        let model = LoadedModel::Trees(Arc::new(sample_ensemble()));

        assert!(artifact.build(&model, Vec::new).is_ok());
    }

    #[test]
    fn test_mismatched_kinds_rejected() {
        let result = ExplainerArtifact::Tree.build(&logistic(), Vec::new);
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
