use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::whisper::{self as m, Config};
use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tokenizers::Tokenizer;
use tokio::sync::Mutex;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::audio_decoder::decode_audio_to_pcm;

const MEL_FILTERS_REPO: &str = "FL33TW00D-HF/whisper-base";
const MAX_DECODE_TOKENS: usize = 224;

/// Whisper running in-process on Candle, greedy decoding with a forced language.
pub struct CandleWhisperEngine {
    model: Mutex<m::model::Whisper>,
    tokenizer: Tokenizer,
    config: Config,
    device: Device,
    mel_filters: Vec<f32>,
    language_token: Option<u32>,
}

impl CandleWhisperEngine {
    /// Downloads (or reuses the hub cache for) `model_id` and loads it. Blocking.
    pub fn new(model_id: &str, language: &str) -> Result<Self, TranscriptionError> {
        let device = Device::Cpu;
        let dtype = Self::select_dtype(&device);

        tracing::info!(
            device = ?device,
            model = model_id,
            language,
            "Initializing Candle Whisper transcription engine"
        );

        let api = Api::new().map_err(|e| TranscriptionError::ModelLoadFailed(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("config.json: {}", e)))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer.json: {}", e)))?;
        let weights_path = repo.get("model.safetensors").map_err(|e| {
            TranscriptionError::ModelLoadFailed(format!("model.safetensors: {}", e))
        })?;

        let mel_repo = api.repo(Repo::new(MEL_FILTERS_REPO.to_string(), RepoType::Model));
        let mel_bytes_path = mel_repo
            .get("melfilters.bytes")
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("melfilters.bytes: {}", e)))?;

        let config_contents = std::fs::read_to_string(&config_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("read config: {}", e)))?;
        let config: Config = serde_json::from_str(&config_contents)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("parse config: {}", e)))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("tokenizer: {}", e)))?;

        let mel_bytes = std::fs::read(&mel_bytes_path)
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("mel filters: {}", e)))?;
        let mel_filters = read_mel_filters(&mel_bytes, &config)?;

        // English-only checkpoints have no language tokens and need none.
        let language_token = language_token(&tokenizer, language);
        if language_token.is_none() {
            tracing::debug!(language, "Model has no language token, decoding without it");
        }

        // SAFETY: safetensors files are memory-mapped read-only
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], dtype, &device)
                .map_err(|e| TranscriptionError::ModelLoadFailed(format!("weights: {}", e)))?
        };

        let model = m::model::Whisper::load(&vb, config.clone())
            .map_err(|e| TranscriptionError::ModelLoadFailed(format!("model: {}", e)))?;

        tracing::info!("Candle Whisper engine loaded successfully");

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            config,
            device,
            mel_filters,
            language_token,
        })
    }

    pub fn select_dtype(device: &Device) -> DType {
        if device.is_cpu() { DType::F32 } else { DType::F16 }
    }
}

#[async_trait]
impl TranscriptionEngine for CandleWhisperEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        let pcm = decode_audio_to_pcm(audio_data)?;
        let prompt = prompt_tokens(&self.tokenizer, self.language_token)?;
        let eot_token = token_id(&self.tokenizer, m::EOT_TOKEN)?;

        let chunk_samples = m::N_SAMPLES;
        let mut mel_tensors = Vec::new();

        for chunk in pcm.chunks(chunk_samples) {
            let mut samples = chunk.to_vec();
            samples.resize(chunk_samples, 0.0);

            let mel_data = m::audio::pcm_to_mel(&self.config, &samples, &self.mel_filters);
            let n_mel = self.config.num_mel_bins;
            let n_frames = mel_data.len() / n_mel;

            let mel_tensor = Tensor::from_vec(mel_data, (1, n_mel, n_frames), &self.device)
                .map_err(|e| {
                    TranscriptionError::TranscriptionFailed(format!("mel tensor: {}", e))
                })?;
            mel_tensors.push(mel_tensor);
        }

        // The decoder keeps a KV cache, so segments run one request at a time.
        let mut model = self.model.lock().await;
        let mut segments: Vec<String> = Vec::new();

        for (i, mel_tensor) in mel_tensors.iter().enumerate() {
            tracing::debug!(segment = i, "Transcribing audio segment");
            let text = decode_segment(
                &mut model,
                &self.tokenizer,
                &self.device,
                mel_tensor,
                &prompt,
                eot_token,
            )?;
            if !text.is_empty() {
                segments.push(text);
            }
        }

        let transcript = segments.join(" ");

        tracing::info!(
            segments = segments.len(),
            chars = transcript.len(),
            "Audio transcription completed"
        );

        Ok(transcript)
    }
}

fn failed(e: candle_core::Error) -> TranscriptionError {
    TranscriptionError::TranscriptionFailed(e.to_string())
}

fn decode_segment(
    model: &mut m::model::Whisper,
    tokenizer: &Tokenizer,
    device: &Device,
    mel: &Tensor,
    prompt: &[u32],
    eot_token: u32,
) -> Result<String, TranscriptionError> {
    let audio_features = model
        .encoder
        .forward(mel, true)
        .map_err(|e| TranscriptionError::TranscriptionFailed(format!("encoder: {}", e)))?;

    let mut tokens = prompt.to_vec();

    for _ in 0..MAX_DECODE_TOKENS {
        let token_tensor = Tensor::new(tokens.as_slice(), device)
            .map_err(failed)?
            .unsqueeze(0)
            .map_err(failed)?;

        let decoder_output = model
            .decoder
            .forward(&token_tensor, &audio_features, tokens.len() == prompt.len())
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("decoder: {}", e)))?;

        let logits = model
            .decoder
            .final_linear(&decoder_output.squeeze(0).map_err(failed)?)
            .map_err(|e| TranscriptionError::TranscriptionFailed(format!("linear: {}", e)))?;

        let seq_len = logits.dim(0).map_err(failed)?;
        let next_token = logits
            .get(seq_len - 1)
            .map_err(failed)?
            .argmax(0)
            .map_err(failed)?
            .to_scalar::<u32>()
            .map_err(failed)?;

        if next_token == eot_token {
            break;
        }
        tokens.push(next_token);
    }

    model.reset_kv_cache();

    let generated = &tokens[prompt.len()..];
    let text = tokenizer
        .decode(generated, true)
        .map_err(|e| TranscriptionError::TranscriptionFailed(format!("detokenize: {}", e)))?;

    Ok(text.trim().to_string())
}

/// Multilingual checkpoints carry `<|en|>`-style tokens; English-only ones do not.
fn language_token(tokenizer: &Tokenizer, language: &str) -> Option<u32> {
    tokenizer.token_to_id(&format!("<|{}|>", language))
}

/// Decoder prefix: start, optional language, transcribe task, no timestamps.
fn prompt_tokens(
    tokenizer: &Tokenizer,
    language_token: Option<u32>,
) -> Result<Vec<u32>, TranscriptionError> {
    let mut tokens = vec![token_id(tokenizer, m::SOT_TOKEN)?];
    tokens.extend(language_token);
    tokens.push(token_id(tokenizer, m::TRANSCRIBE_TOKEN)?);
    tokens.push(token_id(tokenizer, m::NO_TIMESTAMPS_TOKEN)?);
    Ok(tokens)
}

fn token_id(tokenizer: &Tokenizer, token: &str) -> Result<u32, TranscriptionError> {
    tokenizer.token_to_id(token).ok_or_else(|| {
        TranscriptionError::TranscriptionFailed(format!("token not found: {}", token))
    })
}

fn read_mel_filters(bytes: &[u8], config: &Config) -> Result<Vec<f32>, TranscriptionError> {
    let expected_len = config.num_mel_bins * (m::N_FFT / 2 + 1);
    if bytes.len() < expected_len * 4 {
        return Err(TranscriptionError::ModelLoadFailed(format!(
            "mel filters file too small: {} bytes, expected at least {}",
            bytes.len(),
            expected_len * 4
        )));
    }

    let filters: Vec<f32> = bytes
        .chunks_exact(4)
        .take(expected_len)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(filters)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tokenizers::models::wordlevel::WordLevel;

    use super::*;

    fn whisper_tokenizer(extra: &[&str]) -> Tokenizer {
        let specials = [
            "[UNK]",
            m::SOT_TOKEN,
            m::TRANSCRIBE_TOKEN,
            m::NO_TIMESTAMPS_TOKEN,
            m::EOT_TOKEN,
        ];
        let vocab: HashMap<String, u32> = specials
            .iter()
            .chain(extra)
            .enumerate()
            .map(|(id, token)| (token.to_string(), id as u32))
            .collect();
        let model = WordLevel::builder()
            .vocab(vocab)
            .unk_token("[UNK]".to_string())
            .build()
            .unwrap();
        Tokenizer::new(model)
    }

    #[test]
    fn given_multilingual_vocab_when_building_prompt_then_english_token_follows_start() {
        let tokenizer = whisper_tokenizer(&["<|en|>", "<|de|>"]);
        let english = language_token(&tokenizer, "en");

        let prompt = prompt_tokens(&tokenizer, english).unwrap();

        assert_eq!(english, Some(5));
        assert_eq!(prompt, vec![1, 5, 2, 3]);
    }

    #[test]
    fn given_english_only_vocab_when_building_prompt_then_language_token_is_skipped() {
        let tokenizer = whisper_tokenizer(&[]);
        let english = language_token(&tokenizer, "en");

        let prompt = prompt_tokens(&tokenizer, english).unwrap();

        assert_eq!(english, None);
        assert_eq!(prompt, vec![1, 2, 3]);
    }

    #[test]
    fn given_vocab_without_task_tokens_when_building_prompt_then_transcription_failed() {
        let vocab = HashMap::from([("[UNK]".to_string(), 0), (m::SOT_TOKEN.to_string(), 1)]);
        let model = WordLevel::builder()
            .vocab(vocab)
            .unk_token("[UNK]".to_string())
            .build()
            .unwrap();
        let tokenizer = Tokenizer::new(model);

        let result = prompt_tokens(&tokenizer, None);

        assert!(matches!(result, Err(TranscriptionError::TranscriptionFailed(_))));
    }

    #[test]
    fn given_cpu_device_when_selecting_dtype_then_f32() {
        assert_eq!(CandleWhisperEngine::select_dtype(&Device::Cpu), DType::F32);
    }
}
