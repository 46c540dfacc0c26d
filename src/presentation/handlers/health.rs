use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ModelState;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model_loading: bool,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    fn from_state(state: ModelState) -> Self {
        Self {
            status: "healthy".to_string(),
            model_loaded: state.is_loaded(),
            model_loading: state.is_loading(),
            timestamp: Utc::now(),
        }
    }
}

/// Liveness: always 200, reports the model load state.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let model_state = state.roast_service.model_state().await;
    (StatusCode::OK, Json(HealthResponse::from_state(model_state)))
}

/// Readiness: 503 until the speech model is loaded.
pub async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    let model_state = state.roast_service.model_state().await;
    let status = if model_state.is_loaded() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthResponse::from_state(model_state)))
}
