//! SHAP explanation endpoint

use axum::{extract::State, Json};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Params, Path};
use crate::domain::{DomainError, Explanation};

/// GET /interp/{id}, with `?n_customers=` when `id` is -1
pub async fn interp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Params(params): Params,
) -> Result<Json<ApiResponse<Explanation>>, ApiError> {
    debug!(id = %id, "Explaining");

    let service = state.scoring_service.clone();

    // Tree explanations over a large sample are CPU bound
    let explanation = tokio::task::spawn_blocking(move || service.explain(&id, &params))
        .await
        .map_err(|e| DomainError::internal(e.to_string()))??;

    let message = if explanation.is_local() {
        "Local interpretability data retrieved."
    } else {
        "Global interpretability data retrieved."
    };

    Ok(Json(ApiResponse::new(message, explanation)))
}
