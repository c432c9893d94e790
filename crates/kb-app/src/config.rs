use config::{Config as ConfigLoader, ConfigError, Environment, File};
use kb_client::GatewayConfig;
use kb_store::{DEFAULT_ERROR_TTL, DEFAULT_POLL_INTERVAL};
use kb_types::{ChatParams, Language, SearchParams, Theme};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: GatewayConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub chat: ChatParams,
    #[serde(default)]
    pub search: SearchParams,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_error_display_secs")]
    pub error_display_secs: u64,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_theme")]
    pub theme: Theme,
    #[serde(default = "default_language")]
    pub language: Language,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            error_display_secs: default_error_display_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            theme: default_theme(),
            language: default_language(),
        }
    }
}

impl UiConfig {
    pub fn error_ttl(&self) -> Duration {
        Duration::from_secs(self.error_display_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

fn default_error_display_secs() -> u64 {
    DEFAULT_ERROR_TTL.as_secs()
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL.as_secs()
}

fn default_theme() -> Theme {
    Theme::Dark
}

fn default_language() -> Language {
    Language::ZhCn
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{KB_ENV}.toml (if KB_ENV is set, `dev` otherwise)
    /// 3. KB_<SECTION>__<KEY> environment variables, e.g. KB_CHAT__BACKEND=hosted
    /// 4. KB_BASE_URL, as a shortcut for KB_API__BASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("KB_ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("KB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        if let Ok(base_url) = std::env::var("KB_BASE_URL") {
            cfg.api.base_url = base_url;
        }

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_types::ChatBackend;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [api]
            base_url = "http://kb.internal:8000"
            timeout_secs = 20

            [ui]
            error_display_secs = 5
            language = "en"

            [chat]
            backend = "hosted"
            use_search = false
            max_tokens = 256

            [search]
            n_results = 8

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "http://kb.internal:8000");
        assert_eq!(config.api.timeout_secs, Some(20));
        assert_eq!(config.ui.error_ttl(), Duration::from_secs(5));
        assert_eq!(config.ui.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.ui.language, Language::En);
        assert_eq!(config.ui.theme, Theme::Dark);
        assert_eq!(config.chat.backend, ChatBackend::Hosted);
        assert!(!config.chat.use_search);
        assert_eq!(config.chat.max_tokens, 256);
        assert_eq!(config.chat.n_results, 3);
        assert_eq!(config.search.n_results, 8);
        assert_eq!(config.search.min_score, 0.3);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.ui.error_display_secs, 10);
        assert_eq!(config.ui.error_ttl(), DEFAULT_ERROR_TTL);
        assert_eq!(config.ui.poll_interval(), DEFAULT_POLL_INTERVAL);
        assert_eq!(config.chat, ChatParams::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_shipped_default_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
        let config = Config::from_file(path).unwrap();
        assert_eq!(config.ui.poll_interval_secs, 30);
        assert_eq!(config.chat.history_window, 10);
    }
}
