//! Scoring endpoints: customer lookup, prediction and explanation

pub mod customer;
pub mod interp;
pub mod predict;

use axum::{routing::get, Router};

use super::state::AppState;

pub fn create_scoring_router() -> Router<AppState> {
    Router::new()
        .route("/customer/{id}", get(customer::get_customer))
        .route("/predict/{id}", get(predict::predict))
        .route("/interp/{id}", get(interp::interp))
}
