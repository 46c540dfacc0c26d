use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::{RoastError, RoastReply};
use crate::domain::{AudioClip, Category};
use crate::infrastructure::observability::log_preview;
use crate::presentation::state::AppState;

pub const AUDIO_FIELD: &str = "audio";

#[derive(Deserialize)]
pub struct RoastTextRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct RoastResponse {
    pub transcript: String,
    pub roast: String,
    pub category: Category,
    pub success: bool,
}

impl From<RoastReply> for RoastResponse {
    fn from(reply: RoastReply) -> Self {
        Self {
            transcript: reply.transcript,
            roast: reply.roast,
            category: reply.category,
            success: true,
        }
    }
}

#[tracing::instrument(skip(state, payload))]
pub async fn roast_text_handler(
    State(state): State<AppState>,
    payload: Result<Json<RoastTextRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Invalid roast text request");
            return RoastError::InvalidInput(
                "request body must be JSON with a string 'text' field".to_string(),
            )
            .into_response();
        }
    };

    tracing::debug!(text = %log_preview(&request.text), "Processing text roast");

    match state.roast_service.roast_text(&request.text) {
        Ok(reply) => {
            tracing::info!(category = %reply.category, "Text roast served");
            (StatusCode::OK, Json(RoastResponse::from(reply))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn roast_audio_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Invalid roast audio request");
            return RoastError::InvalidInput(
                "request body must be multipart/form-data with an 'audio' file".to_string(),
            )
            .into_response();
        }
    };
    let max_bytes = state.settings.transcription.max_upload_bytes();

    let clip = match read_audio_field(multipart, max_bytes).await {
        Ok(clip) => clip,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(bytes = clip.len(), mime = clip.mime(), "Audio upload received");

    match state.roast_service.roast_audio(&clip).await {
        Ok(reply) => {
            tracing::info!(
                category = %reply.category,
                transcript = %log_preview(&reply.transcript),
                "Audio roast served"
            );
            (StatusCode::OK, Json(RoastResponse::from(reply))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn read_audio_field(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<AudioClip, RoastError> {
    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| RoastError::InvalidInput(format!("failed to read upload: {}", e)))?
            .ok_or_else(|| RoastError::InvalidInput("no audio file provided".to_string()))?;

        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| RoastError::InvalidInput(format!("failed to read audio file: {}", e)))?;

        return Ok(AudioClip::new(data.to_vec(), &mime, max_bytes)?);
    }
}
