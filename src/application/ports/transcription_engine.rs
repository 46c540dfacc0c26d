use std::sync::Arc;

use async_trait::async_trait;

/// A loaded speech-recognition model. Implementations must tolerate concurrent calls.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError>;
}

/// Produces a ready-to-use engine. Loading may download weights and take a while.
#[async_trait]
pub trait TranscriptionEngineLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
}
