//! Error envelope returned by every endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// `{"erreur": "...", ...extra}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub erreur: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Error envelope with the default 400 status
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            response: ApiErrorResponse {
                erreur: message.into(),
                extra: Map::new(),
            },
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Attach a structured field next to `erreur`
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.response.extra.insert(key.into(), value.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::NOT_FOUND)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();

        let api_error = match &err {
            DomainError::NotFound { .. } => Self::not_found(message),
            DomainError::MissingParameter { .. } | DomainError::InvalidParameter { .. } => {
                Self::bad_request(message)
            }
            DomainError::Internal { .. } | DomainError::Configuration { .. } => {
                tracing::error!(error = %err, "Request failed");
                Self::internal(message)
            }
        };

        match err.parameter() {
            Some(parameter) => api_error.with_extra("parameter", parameter),
            None => api_error,
        }
    }
}
