//! Save store configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for the save store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveConfig {
    /// Name of the persisted record
    #[serde(default = "default_key")]
    pub key: String,
    /// Language written into fresh settings
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Pretty-print the JSON document
    #[serde(default)]
    pub pretty: bool,
}

fn default_key() -> String {
    "reminiscence_game_data".to_string()
}

fn default_language() -> String {
    "zh_CN".to_string()
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            default_language: default_language(),
            pretty: false,
        }
    }
}

impl SaveConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::Config(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Parse configuration from a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        ron::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = SaveConfig::from_ron_str("(pretty: true)").unwrap();
        assert_eq!(config.key, "reminiscence_game_data");
        assert_eq!(config.default_language, "zh_CN");
        assert!(config.pretty);
    }

    #[test]
    fn test_bad_config_is_reported() {
        assert!(matches!(
            SaveConfig::from_ron_str("(pretty: 3"),
            Err(Error::Config(_))
        ));
    }
}
