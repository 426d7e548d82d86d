use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::DEFAULT_SAMPLE_SEED;
use crate::infrastructure::dataset::DatasetColumns;
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub explanation: ExplanationConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where the customer table, classifier and explainer are read from
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub explainer_path: PathBuf,
    pub id_column: String,
    pub target_column: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplanationConfig {
    /// Seed for the global explanation sample
    #[serde(default = "default_sample_seed")]
    pub sample_seed: u64,
}

fn default_sample_seed() -> u64 {
    DEFAULT_SAMPLE_SEED
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        let columns = DatasetColumns::default();

        Self {
            dataset_path: PathBuf::from("data/customers.csv"),
            model_path: PathBuf::from("data/model.json"),
            explainer_path: PathBuf::from("data/explainer.json"),
            id_column: columns.id_column,
            target_column: columns.target_column,
        }
    }
}

impl ArtifactsConfig {
    pub fn columns(&self) -> DatasetColumns {
        DatasetColumns {
            id_column: self.id_column.clone(),
            target_column: self.target_column.clone(),
        }
    }
}

impl Default for ExplanationConfig {
    fn default() -> Self {
        Self {
            sample_seed: DEFAULT_SAMPLE_SEED,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
