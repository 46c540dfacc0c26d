use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionEngineLoader, TranscriptionError};
use crate::presentation::config::{TranscriptionProviderSetting, TranscriptionSettings};

use super::candle_whisper_engine::CandleWhisperEngine;
use super::mock_transcription_engine::MockTranscriptionEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TranscriptionProvider {
    Local,
    OpenAi,
    Mock,
}

impl From<TranscriptionProviderSetting> for TranscriptionProvider {
    fn from(setting: TranscriptionProviderSetting) -> Self {
        match setting {
            TranscriptionProviderSetting::Local => Self::Local,
            TranscriptionProviderSetting::OpenAi => Self::OpenAi,
            TranscriptionProviderSetting::Mock => Self::Mock,
        }
    }
}

/// Builds the configured engine on demand; handed to the adapter as its loader.
#[derive(Debug, Clone)]
pub struct TranscriptionEngineFactory {
    provider: TranscriptionProvider,
    model: String,
    language: String,
    api_key: Option<String>,
    base_url: Option<String>,
}

impl TranscriptionEngineFactory {
    pub fn new(
        provider: TranscriptionProvider,
        model: String,
        language: String,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            provider,
            model,
            language,
            api_key,
            base_url,
        }
    }

    pub fn from_settings(settings: &TranscriptionSettings) -> Self {
        Self::new(
            settings.provider.into(),
            settings.model.clone(),
            settings.language.clone(),
            settings.api_key.clone().filter(|key| !key.is_empty()),
            settings.base_url.clone().filter(|url| !url.is_empty()),
        )
    }

    pub fn provider(&self) -> TranscriptionProvider {
        self.provider
    }
}

#[async_trait]
impl TranscriptionEngineLoader for TranscriptionEngineFactory {
    async fn load(&self) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        match self.provider {
            TranscriptionProvider::Local => {
                let model = self.model.clone();
                let language = self.language.clone();
                // hf-hub downloads and safetensors mapping are blocking.
                let engine =
                    tokio::task::spawn_blocking(move || CandleWhisperEngine::new(&model, &language))
                        .await
                        .map_err(|e| {
                            TranscriptionError::ModelLoadFailed(format!("loader task: {}", e))
                        })??;
                Ok(Arc::new(engine))
            }
            TranscriptionProvider::OpenAi => {
                let key = self.api_key.clone().ok_or_else(|| {
                    TranscriptionError::ModelLoadFailed(
                        "API key required for OpenAI Whisper".to_string(),
                    )
                })?;
                let engine = OpenAiWhisperEngine::new(
                    key,
                    self.base_url.clone(),
                    api_model(&self.model),
                    self.language.clone(),
                );
                Ok(Arc::new(engine))
            }
            TranscriptionProvider::Mock => Ok(Arc::new(MockTranscriptionEngine::default())),
        }
    }
}

/// Hub repository ids (`owner/name`) mean nothing to the hosted API; the engine
/// falls back to `whisper-1` for them.
fn api_model(model: &str) -> Option<String> {
    if model.is_empty() || model.contains('/') {
        None
    } else {
        Some(model.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(provider: TranscriptionProvider, api_key: Option<&str>) -> TranscriptionEngineFactory {
        TranscriptionEngineFactory::new(
            provider,
            "whisper-1".to_string(),
            "en".to_string(),
            api_key.map(String::from),
            None,
        )
    }

    #[tokio::test]
    async fn given_openai_without_key_when_loading_then_model_load_failed() {
        let result = factory(TranscriptionProvider::OpenAi, None).load().await;
        assert!(matches!(result, Err(TranscriptionError::ModelLoadFailed(_))));
    }

    #[tokio::test]
    async fn given_openai_with_key_when_loading_then_engine_created() {
        let result = factory(TranscriptionProvider::OpenAi, Some("sk-test")).load().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn given_mock_provider_when_loading_then_engine_returns_fixed_text() {
        let engine = factory(TranscriptionProvider::Mock, None).load().await.unwrap();
        let text = engine.transcribe(b"anything").await.unwrap();
        assert_eq!(text, "roast my outfit");
    }

    #[test]
    fn given_hub_model_id_when_resolving_api_model_then_default_is_used() {
        assert_eq!(api_model("openai/whisper-base"), None);
    }

    #[test]
    fn given_hosted_model_name_when_resolving_api_model_then_it_is_kept() {
        assert_eq!(api_model("whisper-large-v3"), Some("whisper-large-v3".to_string()));
    }
}
