use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};

use crate::domain::DEFAULT_MAX_AUDIO_BYTES;

use super::Environment;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub transcription: TranscriptionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    pub model: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub max_upload_mb: usize,
}

impl TranscriptionSettings {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    Local,
    #[serde(rename = "openai")]
    OpenAi,
    Mock,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            transcription: TranscriptionSettings {
                provider: TranscriptionProviderSetting::Local,
                model: "openai/whisper-base".to_string(),
                language: "en".to_string(),
                api_key: None,
                base_url: None,
                max_upload_mb: DEFAULT_MAX_AUDIO_BYTES / (1024 * 1024),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                enable_json: false,
            },
        }
    }
}

impl Settings {
    /// Layers defaults, `appsettings.<environment>.*` and `APP_*` variables
    /// (`APP_SERVER__PORT=8080`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_computing_upload_limit_then_ten_megabytes() {
        let settings = Settings::default();
        assert_eq!(settings.transcription.max_upload_bytes(), 10 * 1024 * 1024);
        assert_eq!(settings.transcription.language, "en");
    }

    #[test]
    fn given_default_source_when_round_tripped_through_config_then_values_kept() {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default()).unwrap())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(
            settings.transcription.provider,
            TranscriptionProviderSetting::Local
        );
        assert!(settings.transcription.api_key.is_none());
    }

    #[test]
    fn given_provider_names_when_deserializing_then_lowercase_variants() {
        let provider: TranscriptionProviderSetting = serde_json::from_str(r#""openai""#).unwrap();
        assert_eq!(provider, TranscriptionProviderSetting::OpenAi);
        let provider: TranscriptionProviderSetting = serde_json::from_str(r#""mock""#).unwrap();
        assert_eq!(provider, TranscriptionProviderSetting::Mock);
    }
}
