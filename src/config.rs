//! Localization configuration.
//!
//! Read from `config.toml` in the application data directory:
//!
//! ```toml
//! language = "ru"
//! fallback_locale = "en_US"
//! translations_dir = "/opt/veil/translations"
//! detect_system_locale = true
//! log_misses = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Localization settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Preferred UI language ("en", "ru_RU", "zh-CN", ...). Unset follows
    /// the system locale.
    pub language: Option<String>,
    /// Locale consulted when the active one lacks a translation. Unset means
    /// the base locale, `en_US`.
    pub fallback_locale: Option<String>,
    /// Directory searched for catalogs before the bundled ones
    pub translations_dir: Option<PathBuf>,
    /// Use the system locale when `language` is unset or unsupported
    pub detect_system_locale: bool,
    /// Log every fallback-chain miss at debug level
    pub log_misses: bool,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            language: None,
            fallback_locale: None,
            translations_dir: None,
            detect_system_locale: true,
            log_misses: false,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("net", "veil", "VEIL VPN")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load configuration from the default location.
pub fn load_config() -> Result<I18nConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load configuration from a file, returning defaults if it does not exist.
pub fn load_config_from(path: &Path) -> Result<I18nConfig, ConfigError> {
    if !path.exists() {
        return Ok(I18nConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save configuration to the default location.
pub fn save_config(config: &I18nConfig) -> Result<(), ConfigError> {
    save_config_to(&get_config_path(), config)
}

/// Save configuration to a file.
pub fn save_config_to(path: &Path, config: &I18nConfig) -> Result<(), ConfigError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
