use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::RoastError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub success: bool,
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            success: false,
        }),
    )
        .into_response()
}

impl RoastError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RoastError::InvalidInput(_) | RoastError::TranscriptionEmpty => {
                StatusCode::BAD_REQUEST
            }
            RoastError::ModelNotReady => StatusCode::SERVICE_UNAVAILABLE,
            RoastError::TranscriptionFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RoastError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(error = %self, "Roast request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Roast request rejected");
        }
        error_response(status, self.to_string())
    }
}
