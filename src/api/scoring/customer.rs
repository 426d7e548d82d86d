//! Customer lookup endpoint

use axum::{extract::State, Json};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Params, Path};
use crate::infrastructure::services::CustomerData;

/// GET /customer/{id}
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Params(params): Params,
) -> Result<Json<ApiResponse<CustomerData>>, ApiError> {
    debug!(id = %id, "Getting customer");

    let data = state.scoring_service.customer(&id, &params)?;

    let message = match data {
        CustomerData::Ids(_) => "Customer identifiers retrieved.",
        CustomerData::Features(_) => "Customer data retrieved.",
    };

    Ok(Json(ApiResponse::new(message, data)))
}
