use std::sync::Arc;

use crate::application::services::roast_classifier::classify;
use crate::application::services::transcription_adapter::{AdapterError, TranscriptionAdapter};
use crate::domain::{AudioClip, Category, InputError, ModelState, Topic};

#[derive(Debug, thiserror::Error)]
pub enum RoastError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("speech recognition model is still loading, try again shortly")]
    ModelNotReady,
    #[error("no speech detected, try clearer audio")]
    TranscriptionEmpty,
    #[error("{0}")]
    TranscriptionFailure(String),
}

impl From<InputError> for RoastError {
    fn from(e: InputError) -> Self {
        RoastError::InvalidInput(e.to_string())
    }
}

impl From<AdapterError> for RoastError {
    fn from(e: AdapterError) -> Self {
        match e {
            AdapterError::ModelNotReady => RoastError::ModelNotReady,
            AdapterError::NoSpeechDetected => RoastError::TranscriptionEmpty,
            AdapterError::Transcription(inner) => RoastError::TranscriptionFailure(inner.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoastReply {
    pub transcript: String,
    pub roast: String,
    pub category: Category,
}

/// Request pipeline: optional transcription, then classification.
pub struct RoastService {
    transcription: Arc<TranscriptionAdapter>,
}

impl RoastService {
    pub fn new(transcription: Arc<TranscriptionAdapter>) -> Self {
        Self { transcription }
    }

    pub async fn model_state(&self) -> ModelState {
        self.transcription.state().await
    }

    pub fn roast_text(&self, text: &str) -> Result<RoastReply, RoastError> {
        let topic = Topic::parse(text)?;
        Ok(reply_for(topic))
    }

    pub async fn roast_audio(&self, clip: &AudioClip) -> Result<RoastReply, RoastError> {
        let transcript = self.transcription.transcribe(clip.data()).await?;

        tracing::info!(
            bytes = clip.len(),
            mime = clip.mime(),
            chars = transcript.text.len(),
            "Audio transcribed"
        );

        // A non-blank transcript always parses.
        let topic = Topic::parse(transcript.text)?;
        Ok(reply_for(topic))
    }
}

fn reply_for(topic: Topic) -> RoastReply {
    let roast = classify(&topic);
    tracing::debug!(category = %roast.category, "Topic classified");

    RoastReply {
        transcript: topic.into_inner(),
        roast: roast.line,
        category: roast.category,
    }
}
