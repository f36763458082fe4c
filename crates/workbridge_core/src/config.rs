//! Runtime configuration loading.
//!
//! # Responsibility
//! - Load document-service and logging settings from a TOML file.
//! - Apply `WORKBRIDGE_*` environment overrides on top of file values.
//!
//! # Invariants
//! - A missing config file yields defaults, not an error.
//! - Returned configs have a non-empty base URL and a positive timeout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_PROTOCOL_VERSION: &str = "2022-06-28";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_BASE_URL: &str = "WORKBRIDGE_API_BASE_URL";
const ENV_LOG_LEVEL: &str = "WORKBRIDGE_LOG_LEVEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbridgeConfig {
    pub document_service: DocumentServiceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentServiceConfig {
    pub base_url: String,
    /// Value of the protocol-version header sent with every call.
    pub protocol_version: String,
    pub timeout_secs: u64,
}

impl Default for DocumentServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            dir: None,
        }
    }
}

impl WorkbridgeConfig {
    /// Parses a TOML document and validates the result.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides file values with entries from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.document_service.base_url = base_url;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.document_service.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "document_service.base_url cannot be empty".to_string(),
            ));
        }
        if self.document_service.protocol_version.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "document_service.protocol_version cannot be empty".to_string(),
            ));
        }
        if self.document_service.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "document_service.timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads configuration from `path` (if it exists) plus process environment.
pub fn load_config(path: Option<&Path>) -> Result<WorkbridgeConfig, ConfigError> {
    let mut config = match path {
        Some(path) if path.exists() => {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            WorkbridgeConfig::from_toml_str(&content)?
        }
        _ => WorkbridgeConfig::default(),
    };
    config.apply_overrides(|key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}
