//! Application state shared by every handler

use std::sync::Arc;

use crate::infrastructure::services::ScoringService;

/// Loaded once at startup and never mutated afterwards
#[derive(Clone)]
pub struct AppState {
    pub scoring_service: Arc<ScoringService>,
}

impl AppState {
    pub fn new(scoring_service: ScoringService) -> Self {
        Self {
            scoring_service: Arc::new(scoring_service),
        }
    }
}
