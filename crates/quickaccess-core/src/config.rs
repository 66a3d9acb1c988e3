//! Application configuration management.
//!
//! This module handles loading and saving the host-side configuration
//! for the quickaccess cache: where the file-backed preference store
//! keeps its documents, and which account was last active (used to
//! preselect the account on startup).
//!
//! Configuration is stored at `~/.config/quickaccess/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/data directory paths
const APP_NAME: &str = "quickaccess";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Overrides the platform data directory for the file store.
    pub data_dir: Option<PathBuf>,
    /// Last signed-in account id.
    pub last_user: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory where the file-backed store keeps per-user documents.
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_dir_prefers_override() {
        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/quickaccess-test")),
            last_user: None,
        };
        assert_eq!(
            config.store_dir().unwrap(),
            PathBuf::from("/tmp/quickaccess-test")
        );
    }

    #[test]
    fn test_config_round_trip() {
        let config = Config {
            data_dir: Some(PathBuf::from("/data")),
            last_user: Some("u-7".to_string()),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.last_user.as_deref(), Some("u-7"));
        assert_eq!(back.data_dir, config.data_dir);
    }
}
