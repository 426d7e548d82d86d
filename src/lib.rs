//! Credit Scoring API
//!
//! Serves loan decisions and SHAP explanations for a fixed population of
//! customers:
//! - Customer lookup over a robust-scaled feature table
//! - Threshold decisions from a logistic regression or gradient boosted trees
//! - Local and global (seeded sample) feature attributions

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use api::state::AppState;
use domain::CustomerStore;
use infrastructure::{
    dataset::load_csv,
    explain::load_explainer_artifact,
    model::load_model,
    observability::record_dataset,
    services::ScoringService,
};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let config = config.clone();
    let service = tokio::task::spawn_blocking(move || build_scoring_service(&config))
        .await
        .context("artifact loading task failed")??;

    Ok(AppState::new(service))
}

/// Load the dataset, fit the scaler and bind the model and explainer.
///
/// Every artifact is validated here; a service that is returned can answer
/// any request without further configuration errors.
pub fn build_scoring_service(config: &AppConfig) -> anyhow::Result<ScoringService> {
    let artifacts = &config.artifacts;

    let table = load_csv(&artifacts.dataset_path, &artifacts.columns())
        .context("failed to load customer dataset")?;
    let store = Arc::new(CustomerStore::build(table).context("failed to fit feature scaler")?);

    let model = load_model(&artifacts.model_path).context("failed to load classifier")?;
    model
        .check_features(store.feature_names())
        .context("classifier does not match the dataset")?;

    let explainer = load_explainer_artifact(&artifacts.explainer_path)
        .context("failed to load explainer")?
        .build(&model, || store.scaled_means())
        .context("explainer does not match the classifier")?;

    record_dataset(store.len(), store.feature_names().len());
    info!(
        customers = store.len(),
        features = store.feature_names().len(),
        model = model.kind(),
        expected_value = explainer.expected_value(),
        "Scoring state ready"
    );

    Ok(ScoringService::new(
        store,
        model.classifier(),
        explainer,
        config.explanation.sample_seed,
    ))
}
