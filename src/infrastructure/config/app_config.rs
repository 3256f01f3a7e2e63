//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::domain::entities::ApiToken;
use crate::infrastructure::image_cache::ImageFetchConfig;
use crate::infrastructure::tmdb::{
    CatalogConfig, DEFAULT_API_BASE, DEFAULT_IMAGE_BASE, DEFAULT_LANGUAGE,
};

pub(crate) const APP_NAME: &str = "cinefeed";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "linuxmobile";

/// Environment variable holding the API bearer token.
pub const TOKEN_ENV: &str = "CINEFEED_API_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, loaded from `config.toml` and merged with CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path. Logs go to stderr when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Metadata API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Poster download settings.
    #[serde(default)]
    pub images: ImagesConfig,
}

/// Metadata API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base URL for poster images.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Response language, e.g. `ko-KR`.
    #[serde(default = "default_language")]
    pub language: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token. Prefer the environment variable over storing it here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
        }
    }
}

/// Poster download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Download timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(token) = &args.token {
            self.api.token = Some(token.clone());
        }
        if let Some(language) = &args.language {
            self.api.language = language.clone();
        }
        if let Some(base_url) = &args.base_url {
            self.api.base_url = base_url.clone();
        }
    }

    /// Returns the configured log file, if any.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone()
    }

    /// Returns the API token, if one is configured.
    #[must_use]
    pub fn api_token(&self) -> Option<ApiToken> {
        self.api.token.as_deref().and_then(ApiToken::new)
    }

    /// Settings for the catalogue client.
    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.api.base_url.clone(),
            image_base_url: self.api.image_base_url.clone(),
            language: self.api.language.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs.max(1)),
        }
    }

    /// Settings for the image fetch cache.
    #[must_use]
    pub fn image_fetch_config(&self) -> ImageFetchConfig {
        ImageFetchConfig {
            timeout: Duration::from_secs(self.images.timeout_secs.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_match_client_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.catalog_config(), CatalogConfig::default());
        assert_eq!(config.image_fetch_config(), ImageFetchConfig::default());
        assert!(config.api_token().is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            log_level = "debug"

            [api]
            language = "en-US"
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.api.language, "en-US");
        assert_eq!(config.api.base_url, DEFAULT_API_BASE);
        assert_eq!(config.images.timeout_secs, 10);
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = AppConfig::default();
        config.api.token = Some("from-file".to_string());

        let args = CliArgs::parse_from([
            "cinefeed",
            "--token",
            "from-cli",
            "--log-level",
            "warn",
            "popular",
        ]);
        config.merge_with_args(&args);

        assert_eq!(config.api.token.as_deref(), Some("from-cli"));
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;
        assert_eq!(config.catalog_config().timeout, Duration::from_secs(1));
    }
}
