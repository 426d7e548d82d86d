//! Configuration loading

mod app_config;

pub use app_config::{
    AppConfig, ArtifactsConfig, ExplanationConfig, LogFormat, LoggingConfig, ServerConfig,
};
