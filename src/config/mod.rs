//! Configuration management for title-critic
//!
//! Settings come from `config.toml` in the platform config directory, then
//! environment overrides, then command-line flags (applied by the binary).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::EvaluationMode;

/// Environment variable overriding `service.base_url`
pub const ENV_API_URL: &str = "TITLE_CRITIC_API_URL";

/// Environment variable overriding `service.timeout_secs`
pub const ENV_TIMEOUT_SECS: &str = "TITLE_CRITIC_TIMEOUT_SECS";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub service: ServiceConfig,
    pub client: ClientConfig,
}

/// Where and how to reach the evaluation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Mode selected when a session starts
    pub default_mode: EvaluationMode,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("service base URL must not be empty (set service.base_url or TITLE_CRITIC_API_URL)")]
    MissingBaseUrl,

    #[error("TITLE_CRITIC_TIMEOUT_SECS must be a whole number of seconds, got '{0}'")]
    InvalidTimeout(String),

    #[error("service timeout must be at least one second")]
    ZeroTimeout,
}

impl Config {
    /// Load configuration from default location, apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Apply `TITLE_CRITIC_*` overrides using the given variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.service.base_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.service.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        if self.service.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "title-critic") {
            let config_dir = proj_dirs.config_dir();
            Ok(config_dir.join("config.toml"))
        } else {
            Ok(PathBuf::from("config.toml"))
        }
    }

    /// Save configuration to default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
