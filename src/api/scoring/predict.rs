//! Loan decision endpoint

use axum::{extract::State, Json};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Params, Path};
use crate::domain::Prediction;

/// GET /predict/{id}?threshold=
pub async fn predict(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Params(params): Params,
) -> Result<Json<ApiResponse<Prediction>>, ApiError> {
    debug!(id = %id, "Predicting");

    let prediction = state.scoring_service.predict(&id, &params)?;

    Ok(Json(ApiResponse::new(
        "Prediction completed successfully.",
        prediction,
    )))
}
