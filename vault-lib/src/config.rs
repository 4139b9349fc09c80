// vmvault/vault-lib/src/config.rs

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub enum ConfigError {
    NotFound(std::io::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(e) => write!(f, "config file not found: {e}"),
            ConfigError::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound(_))
    }
}

/// Where the vault keeps its two subtrees and how long unused cached images
/// live. A daemon embedding the vault loads this once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub cache_root: PathBuf,
    pub data_root: PathBuf,
    pub days_to_expire: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        VaultConfig {
            cache_root: default_cache_root(),
            data_root: default_data_root(),
            days_to_expire: 14,
        }
    }
}

/// Default cache root: $XDG_CACHE_HOME/vmvault
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .expect("cannot determine XDG_CACHE_HOME")
        .join("vmvault")
}

/// Default data root: $XDG_DATA_HOME/vmvault
pub fn default_data_root() -> PathBuf {
    dirs::data_dir()
        .expect("cannot determine XDG_DATA_HOME")
        .join("vmvault")
}

impl VaultConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(e)
            } else {
                ConfigError::Invalid(e.to_string())
            }
        })?;
        let config: VaultConfig =
            serde_norway::from_str(&content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.days_to_expire * 24 * 60 * 60)
    }
}
