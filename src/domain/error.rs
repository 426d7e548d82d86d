use thiserror::Error;

/// Core domain errors
///
/// The first four variants are the request-time taxonomy. `Configuration`
/// only ever happens while the artifacts are loaded at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("The `{parameter}` parameter is missing from the request.")]
    MissingParameter { parameter: String },

    #[error("The `{parameter}` parameter is invalid: {message}.")]
    InvalidParameter { parameter: String, message: String },

    #[error("Something went wrong: {message}.")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn customer_not_found() -> Self {
        Self::not_found("The customer was not found.")
    }

    pub fn missing_parameter(parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            parameter: parameter.into(),
        }
    }

    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Fold any failure into `Internal`, keeping the original message.
    ///
    /// Used around classifier and explainer calls: nothing raised there is
    /// the caller's fault, so it must never surface as a 400 or 404.
    pub fn into_internal(self) -> Self {
        match self {
            Self::Internal { .. } => self,
            Self::NotFound { message } | Self::Configuration { message } => {
                Self::Internal { message }
            }
            other => Self::internal(other.to_string()),
        }
    }

    /// Name of the offending query parameter, if any
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::MissingParameter { parameter } | Self::InvalidParameter { parameter, .. } => {
                Some(parameter)
            }
            _ => None,
        }
    }
}
