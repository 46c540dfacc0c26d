use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::ports::{TranscriptionEngine, TranscriptionEngineLoader, TranscriptionError};
use crate::domain::{ModelState, Transcript};

#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("speech recognition model is not ready")]
    ModelNotReady,
    #[error("no speech detected")]
    NoSpeechDetected,
    #[error(transparent)]
    Transcription(#[from] TranscriptionError),
}

enum EngineSlot {
    NotLoaded,
    Loading,
    Loaded(Arc<dyn TranscriptionEngine>),
}

impl EngineSlot {
    fn state(&self) -> ModelState {
        match self {
            EngineSlot::NotLoaded => ModelState::NotLoaded,
            EngineSlot::Loading => ModelState::Loading,
            EngineSlot::Loaded(_) => ModelState::Loaded,
        }
    }
}

/// Process-wide owner of the speech-recognition engine and its load state.
pub struct TranscriptionAdapter {
    loader: Arc<dyn TranscriptionEngineLoader>,
    slot: RwLock<EngineSlot>,
}

impl TranscriptionAdapter {
    pub fn new(loader: Arc<dyn TranscriptionEngineLoader>) -> Self {
        Self {
            loader,
            slot: RwLock::new(EngineSlot::NotLoaded),
        }
    }

    pub async fn state(&self) -> ModelState {
        self.slot.read().await.state()
    }

    /// Loads the engine once. A call while a load is running, or after it
    /// succeeded, returns immediately.
    pub async fn initialize(&self) -> Result<(), TranscriptionError> {
        {
            let mut slot = self.slot.write().await;
            if !matches!(*slot, EngineSlot::NotLoaded) {
                tracing::debug!(state = %slot.state(), "Model initialization skipped");
                return Ok(());
            }
            *slot = EngineSlot::Loading;
        }

        tracing::info!("Loading speech recognition model");
        let loaded = self.loader.load().await;

        let mut slot = self.slot.write().await;
        match loaded {
            Ok(engine) => {
                *slot = EngineSlot::Loaded(engine);
                tracing::info!("Speech recognition model loaded");
                Ok(())
            }
            Err(e) => {
                *slot = EngineSlot::NotLoaded;
                tracing::error!(error = %e, "Speech recognition model failed to load");
                Err(e)
            }
        }
    }

    /// Starts [`initialize`](Self::initialize) on a background task.
    pub fn spawn_initialize(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let adapter = Arc::clone(self);
        tokio::spawn(async move {
            // Failures are already logged and leave the adapter retryable.
            let _ = adapter.initialize().await;
        })
    }

    pub async fn transcribe(&self, audio_data: &[u8]) -> Result<Transcript, AdapterError> {
        let engine = match &*self.slot.read().await {
            EngineSlot::Loaded(engine) => Arc::clone(engine),
            EngineSlot::NotLoaded | EngineSlot::Loading => {
                return Err(AdapterError::ModelNotReady);
            }
        };

        let text = engine.transcribe(audio_data).await.map_err(|e| {
            tracing::error!(error = %e, bytes = audio_data.len(), "Transcription failed");
            AdapterError::Transcription(e)
        })?;

        Transcript::from_recognized(&text).ok_or(AdapterError::NoSpeechDetected)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;

    struct FixedEngine {
        text: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TranscriptionEngine for FixedEngine {
        async fn transcribe(&self, _audio_data: &[u8]) -> Result<String, TranscriptionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.to_string())
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl TranscriptionEngine for FailingEngine {
        async fn transcribe(&self, _audio_data: &[u8]) -> Result<String, TranscriptionError> {
            Err(TranscriptionError::DecodingFailed("decode: garbage".to_string()))
        }
    }

    struct StubLoader {
        engine: Arc<dyn TranscriptionEngine>,
        fail_first: bool,
        loads: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl StubLoader {
        fn new(engine: Arc<dyn TranscriptionEngine>) -> Self {
            Self {
                engine,
                fail_first: false,
                loads: AtomicUsize::new(0),
                gate: None,
            }
        }
    }

    #[async_trait]
    impl TranscriptionEngineLoader for StubLoader {
        async fn load(&self) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
            let attempt = self.loads.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail_first && attempt == 0 {
                return Err(TranscriptionError::ModelLoadFailed("offline".to_string()));
            }
            Ok(Arc::clone(&self.engine))
        }
    }

    fn fixed(text: &'static str) -> (Arc<dyn TranscriptionEngine>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine: Arc<dyn TranscriptionEngine> = Arc::new(FixedEngine {
            text,
            calls: Arc::clone(&calls),
        });
        (engine, calls)
    }

    #[tokio::test]
    async fn given_new_adapter_when_transcribing_then_model_not_ready_without_engine_call() {
        let (engine, calls) = fixed("hello");
        let adapter = TranscriptionAdapter::new(Arc::new(StubLoader::new(engine)));

        assert_eq!(adapter.state().await, ModelState::NotLoaded);
        let result = adapter.transcribe(b"audio").await;

        assert!(matches!(result, Err(AdapterError::ModelNotReady)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn given_loaded_adapter_when_transcribing_then_returns_trimmed_text() {
        let (engine, calls) = fixed("  roast my outfit ");
        let adapter = TranscriptionAdapter::new(Arc::new(StubLoader::new(engine)));

        adapter.initialize().await.unwrap();
        let transcript = adapter.transcribe(b"audio").await.unwrap();

        assert_eq!(adapter.state().await, ModelState::Loaded);
        assert_eq!(transcript.text, "roast my outfit");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn given_blank_recognition_when_transcribing_then_no_speech_detected() {
        let (engine, _) = fixed("   ");
        let adapter = TranscriptionAdapter::new(Arc::new(StubLoader::new(engine)));
        adapter.initialize().await.unwrap();

        let result = adapter.transcribe(b"audio").await;

        assert!(matches!(result, Err(AdapterError::NoSpeechDetected)));
    }

    #[tokio::test]
    async fn given_engine_error_when_transcribing_then_underlying_message_is_kept() {
        let adapter = TranscriptionAdapter::new(Arc::new(StubLoader::new(Arc::new(FailingEngine))));
        adapter.initialize().await.unwrap();

        let err = adapter.transcribe(b"audio").await.unwrap_err();

        assert!(matches!(err, AdapterError::Transcription(_)));
        assert!(err.to_string().contains("decode: garbage"));
    }

    #[tokio::test]
    async fn given_failed_load_when_initializing_again_then_retry_succeeds() {
        let (engine, _) = fixed("hi");
        let loader = Arc::new(StubLoader {
            fail_first: true,
            ..StubLoader::new(engine)
        });
        let adapter = TranscriptionAdapter::new(loader.clone());

        assert!(adapter.initialize().await.is_err());
        assert_eq!(adapter.state().await, ModelState::NotLoaded);

        adapter.initialize().await.unwrap();
        assert_eq!(adapter.state().await, ModelState::Loaded);
        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn given_loaded_adapter_when_initializing_again_then_loader_not_called() {
        let (engine, _) = fixed("hi");
        let loader = Arc::new(StubLoader::new(engine));
        let adapter = TranscriptionAdapter::new(loader.clone());

        adapter.initialize().await.unwrap();
        adapter.initialize().await.unwrap();

        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn given_load_in_progress_when_called_then_not_ready_and_loaded_once() {
        let (engine, calls) = fixed("hi");
        let gate = Arc::new(Notify::new());
        let loader = Arc::new(StubLoader {
            gate: Some(Arc::clone(&gate)),
            ..StubLoader::new(engine)
        });
        let adapter = Arc::new(TranscriptionAdapter::new(loader.clone()));

        let handle = adapter.spawn_initialize();
        while adapter.state().await != ModelState::Loading {
            tokio::task::yield_now().await;
        }

        adapter.initialize().await.unwrap();
        assert!(matches!(
            adapter.transcribe(b"audio").await,
            Err(AdapterError::ModelNotReady)
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        gate.notify_one();
        handle.await.unwrap();

        assert_eq!(adapter.state().await, ModelState::Loaded);
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    }
}
