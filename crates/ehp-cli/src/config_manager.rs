//! Configuration management for persistent storage of user settings

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
    #[error("Configuration key '{key}' not found")]
    KeyNotFound { key: String },
    #[error("Invalid value '{value}' for configuration key '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Settings read from `ehp.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EhpConfig {
    /// Apply the custom pointer-table aliases without `--custom-mode`
    pub custom_mode: bool,
    /// File name used by `repack` when no output is given
    pub output_name: String,
}

impl Default for EhpConfig {
    fn default() -> Self {
        Self {
            custom_mode: false,
            output_name: "repacked.ehp".to_string(),
        }
    }
}

/// Keys accepted by `config get` and `config set`
pub const CONFIG_KEYS: [&str; 2] = ["custom_mode", "output_name"];

#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
    config: EhpConfig,
}

impl ConfigManager {
    /// Load the configuration from its default location
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_path(Self::default_config_path())
    }

    /// Load the configuration from `config_path`, using defaults if it does not exist
    pub fn with_path(config_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = config_path.into();
        let config = Self::load_config(&config_path)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ehp-tools")
            .join("ehp.toml")
    }

    fn load_config(config_path: &Path) -> Result<EhpConfig, ConfigError> {
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let content = fs::read_to_string(config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(EhpConfig::default())
        }
    }

    /// Save the current configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let toml_content = toml::to_string_pretty(&self.config)?;
        fs::write(&self.config_path, toml_content)?;
        Ok(())
    }

    /// Location of the configuration file
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Current settings
    pub fn config(&self) -> &EhpConfig {
        &self.config
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "custom_mode" => Ok(self.config.custom_mode.to_string()),
            "output_name" => Ok(self.config.output_name.clone()),
            _ => Err(ConfigError::KeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// Set a configuration value and save
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "custom_mode" => {
                self.config.custom_mode =
                    value.parse().map_err(|_| ConfigError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    })?;
            }
            "output_name" if !value.trim().is_empty() => {
                self.config.output_name = value.to_string();
            }
            "output_name" => {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
            _ => {
                return Err(ConfigError::KeyNotFound {
                    key: key.to_string(),
                });
            }
        }
        self.save()
    }

    /// Restore defaults and save
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.config = EhpConfig::default();
        self.save()
    }

    /// Get all configuration values
    pub fn get_all(&self) -> BTreeMap<String, String> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (key.to_string(), value)))
            .collect()
    }
}
