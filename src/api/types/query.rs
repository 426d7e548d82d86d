//! Query string extractor that reports decoding failures in the error envelope

use axum::{
    extract::{FromRequestParts, Query as AxumQuery},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::domain::{DomainError, QueryParams};

/// Wrapper around `axum::extract::Query`.
///
/// An undecodable query string is an InvalidParameter error rather than
/// axum's plain-text rejection.
#[derive(Debug, Clone, Default)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Query<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(value)) => Ok(Query(value)),
            Err(rejection) => Err(DomainError::invalid_parameter(
                "query",
                rejection.body_text(),
            )
            .into()),
        }
    }
}

/// Query parameters by name. A repeated key keeps its first value.
#[derive(Debug, Clone, Default)]
pub struct Params(pub QueryParams);

impl<S> FromRequestParts<S> for Params
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state).await?;

        Ok(Params(first_values(pairs)))
    }
}

fn first_values(pairs: Vec<(String, String)>) -> QueryParams {
    let mut params = QueryParams::new();

    for (name, value) in pairs {
        params.entry(name).or_insert(value);
    }

    params
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::http::{Request, StatusCode};

    use super::*;

    async fn extract<T: DeserializeOwned>(uri: &str) -> Result<Query<T>, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        Query::<T>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_map() {
        let query = extract::<HashMap<String, String>>("/predict/100?threshold=0.5")
            .await
            .unwrap();

        assert_eq!(query.get("threshold").map(String::as_str), Some("0.5"));
    }

    #[tokio::test]
    async fn test_missing_query_is_empty_map() {
        let query = extract::<HashMap<String, String>>("/customer/-1").await.unwrap();

        assert!(query.is_empty());
    }

    #[tokio::test]
    async fn test_params_keep_first_repeated_value() {
        let (mut parts, _) = Request::builder()
            .uri("/predict/100?threshold=0.9&threshold=0.1&view=raw")
            .body(())
            .unwrap()
            .into_parts();

        let Params(params) = Params::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(params.get("threshold").map(String::as_str), Some("0.9"));
        assert_eq!(params.get("view").map(String::as_str), Some("raw"));
    }

    #[tokio::test]
    async fn test_rejection_is_invalid_parameter() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Typed {
            threshold: f64,
        }

        let err = extract::<Typed>("/predict/100?threshold=abc").await.unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.response.extra.get("parameter").and_then(|v| v.as_str()),
            Some("query")
        );
    }
}
