use crate::presentation::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub level: String,
    pub json_format: bool,
}

impl TracingConfig {
    pub fn from_settings(logging: &LoggingSettings, environment: Environment) -> Self {
        Self {
            environment: environment.to_string(),
            level: logging.level.clone(),
            json_format: logging.enable_json,
        }
    }

    /// Filter used when `RUST_LOG` is unset.
    pub fn default_directives(&self) -> String {
        format!("{level},roastline={level},tower_http=debug", level = self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_logging_settings_when_building_config_then_level_drives_directives() {
        let logging = LoggingSettings {
            level: "warn".to_string(),
            enable_json: true,
        };

        let config = TracingConfig::from_settings(&logging, Environment::Prod);

        assert_eq!(config.environment, "prod");
        assert!(config.json_format);
        assert_eq!(
            config.default_directives(),
            "warn,roastline=warn,tower_http=debug"
        );
    }
}
