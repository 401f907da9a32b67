//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the artificial login delay, the persisted session key names, the admin
//! account and its hashing cost, and the last identifier used to sign in.
//!
//! Configuration is stored at `~/.config/cmsadmin/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "cmsadmin";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// One second, like the login spinner.
const DEFAULT_LOGIN_DELAY_MS: u64 = 1000;

/// Identifier of the single built-in administrator account.
pub const DEFAULT_ADMIN_IDENTIFIER: &str = "admin@cms.com";

/// Secret of the built-in administrator account when no hash is configured.
pub const DEFAULT_ADMIN_SECRET: &str = "admin123";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find {0} directory")]
    NoDirectory(&'static str),

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Names of the two entries in the persisted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    /// Boolean "is signed in" entry
    pub authenticated: String,
    /// Role string entry
    pub role: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            authenticated: "isAuthenticated".to_string(),
            role: "userRole".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub login_delay_ms: u64,
    pub storage_keys: StorageKeys,
    pub admin_identifier: String,
    /// Argon2 PHC string for the admin secret; the demo secret is hashed
    /// at startup when absent.
    pub admin_secret_hash: Option<String>,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub last_identifier: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            login_delay_ms: DEFAULT_LOGIN_DELAY_MS,
            storage_keys: StorageKeys::default(),
            admin_identifier: DEFAULT_ADMIN_IDENTIFIER.to_string(),
            admin_secret_hash: None,
            hash_memory_kib: argon2::Params::DEFAULT_M_COST,
            hash_iterations: argon2::Params::DEFAULT_T_COST,
            last_identifier: None,
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply `CMSADMIN_LOGIN_DELAY_MS` from the environment, if set and valid.
    pub fn apply_env(&mut self) {
        if let Some(ms) = std::env::var("CMSADMIN_LOGIN_DELAY_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            self.login_delay_ms = ms;
        }
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoDirectory("config"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session and the log file.
    pub fn cache_dir(&self) -> Result<PathBuf, ConfigError> {
        let cache_dir = dirs::cache_dir().ok_or(ConfigError::NoDirectory("cache"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
