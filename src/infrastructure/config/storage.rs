use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

/// Errors raised while reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config directory could be determined.
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration could not be serialized.
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Reads and writes `config.toml` in the configuration directory.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Create a new `StorageManager`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a new `StorageManager` with a specific directory (useful for testing).
    #[must_use]
    pub const fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Loads the application configuration, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or the default cannot be written.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            Path::to_path_buf,
        );

        if !config_path.exists() {
            info!(
                "Config file not found at {:?}, creating default.",
                config_path
            );
            let default_config = AppConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::save_to_file(&config_path, &default_config)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                warn!("Failed to parse config file: {}. Using defaults.", e);
                Ok(AppConfig::default())
            }
        }
    }

    /// Saves the application configuration, replacing the file atomically.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be serialized or written.
    pub fn save_config(
        &self,
        config: &AppConfig,
        path_override: Option<&Path>,
    ) -> Result<(), ConfigError> {
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            Path::to_path_buf,
        );
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::save_to_file(&config_path, config)
    }

    fn save_to_file(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("Invalid path"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::LogLevel;

    #[test]
    fn test_missing_file_writes_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let storage = StorageManager::with_dir(dir.path().join("nested"));

        let config = storage.load_config(None)?;
        assert_eq!(config.log_level, LogLevel::Info);

        let written = fs::read_to_string(dir.path().join("nested").join(CONFIG_FILE_NAME))?;
        assert!(written.contains("[api]"));
        assert!(!written.contains("token"));
        Ok(())
    }

    #[test]
    fn test_reads_existing_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("custom.toml");
        fs::write(&path, "log_level = \"trace\"\n[api]\ntimeout_secs = 3\n")?;

        let config = StorageManager::with_dir(dir.path().to_path_buf()).load_config(Some(&path))?;
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.api.timeout_secs, 3);
        Ok(())
    }

    #[test]
    fn test_saved_config_round_trips() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let storage = StorageManager::with_dir(dir.path().to_path_buf());

        let mut config = AppConfig::default();
        config.log_level = LogLevel::Debug;
        config.api.language = "en-US".to_string();
        config.api.token = Some("saved-token".to_string());
        config.images.timeout_secs = 4;
        storage.save_config(&config, None)?;

        let entries: Vec<_> = fs::read_dir(dir.path())?.collect::<Result<_, _>>()?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name(), CONFIG_FILE_NAME);

        let loaded = storage.load_config(None)?;
        assert_eq!(loaded.log_level, LogLevel::Debug);
        assert_eq!(loaded.api.language, "en-US");
        assert_eq!(loaded.api.token.as_deref(), Some("saved-token"));
        assert_eq!(loaded.images.timeout_secs, 4);
        Ok(())
    }

    #[test]
    fn test_save_replaces_existing_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "log_level = \"trace\"\n")?;
        let storage = StorageManager::with_dir(dir.path().to_path_buf());

        storage.save_config(&AppConfig::default(), Some(&path))?;

        let loaded = storage.load_config(Some(&path))?;
        assert_eq!(loaded.log_level, LogLevel::Info);
        Ok(())
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::TempDir::new()?;
        fs::write(dir.path().join(CONFIG_FILE_NAME), "log_level = [[[")?;

        let config = StorageManager::with_dir(dir.path().to_path_buf()).load_config(None)?;
        assert_eq!(config.log_level, LogLevel::Info);
        Ok(())
    }
}
