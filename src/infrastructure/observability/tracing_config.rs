use crate::config::Environment;

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: Environment,
    pub json_format: bool,
    pub default_filter: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENV")
                .ok()
                .and_then(|v| Environment::try_from(v).ok())
                .unwrap_or(Environment::Local),
            json_format: std::env::var("LOG_FORMAT")
                .map(|v| v.to_lowercase() == "json")
                .unwrap_or(false),
            default_filter: "info,revocal=debug".to_string(),
        }
    }
}

impl TracingConfig {
    pub fn from_settings(settings: &crate::config::LoggingSettings) -> Self {
        Self {
            json_format: settings.enable_json,
            default_filter: format!("{level},revocal={level}", level = settings.level),
            ..Self::default()
        }
    }
}
