use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

/// Returns a fixed transcript for any audio. Used when no real model should be loaded.
pub struct MockTranscriptionEngine {
    transcript: String,
}

impl MockTranscriptionEngine {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
        }
    }
}

impl Default for MockTranscriptionEngine {
    fn default() -> Self {
        Self::new("roast my outfit")
    }
}

#[async_trait]
impl TranscriptionEngine for MockTranscriptionEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        tracing::debug!(bytes = audio_data.len(), "Mock transcription");
        Ok(self.transcript.clone())
    }
}
