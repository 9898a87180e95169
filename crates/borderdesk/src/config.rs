//! Configuration management for borderdesk.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "borderdesk";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "borderdesk.db";

/// Home station used when none is configured.
pub const DEFAULT_HOME_STATION: &str = "LPPS";

/// ICAO airport codes are four uppercase letters.
const STATION_CODE_PATTERN: &str = r"^[A-Z]{4}$";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `BORDERDESK_`)
/// 2. TOML config file at `~/.config/borderdesk/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Station configuration.
    pub station: StationConfig,
    /// Locally remembered agent profile.
    pub agent: AgentConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/borderdesk/borderdesk.db`
    pub database_path: Option<PathBuf>,
}

/// The airport the desk operates at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// ICAO code pinned as the fixed endpoint of arrivals and departures.
    pub home_code: String,
}

/// The agent on duty. Remembered locally, never verified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Name recorded as the author of new records.
    pub name: String,
    /// Category recorded alongside the author.
    pub category: String,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            home_code: DEFAULT_HOME_STATION.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("BORDERDESK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let station_code = regex::Regex::new(STATION_CODE_PATTERN)
            .map_err(|e| Error::internal(format!("bad station pattern: {e}")))?;
        if !station_code.is_match(&self.station.home_code) {
            return Err(Error::ConfigValidation {
                message: format!(
                    "station.home_code must be a four-letter ICAO code, got '{}'",
                    self.station.home_code
                ),
            });
        }

        if self.agent.name.trim().is_empty() && !self.agent.category.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "agent.category is set but agent.name is empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }
}
