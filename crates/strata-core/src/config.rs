//! Configuration system for strata.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Block store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStoreConfig {
    /// Path to the block store database.
    pub blocks_db_path: PathBuf,
}

impl Default for BlockStoreConfig {
    fn default() -> Self {
        let strata_dir = dirs::home_dir()
            .map(|h| h.join(".strata"))
            .unwrap_or_else(|| PathBuf::from(".strata"));

        Self {
            blocks_db_path: strata_dir.join("blocks.db"),
        }
    }
}

impl BlockStoreConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::error::StrataResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| crate::error::StrataError::Configuration(e.to_string())),
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| crate::error::StrataError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| crate::error::StrataError::Configuration(e.to_string())),
            _ => Err(crate::error::StrataError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("STRATA_BLOCKS_DB_PATH") {
            config.blocks_db_path = PathBuf::from(path);
        }

        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> BlockStoreConfigBuilder {
        BlockStoreConfigBuilder::default()
    }
}

/// Builder for BlockStoreConfig.
#[derive(Default)]
pub struct BlockStoreConfigBuilder {
    config: BlockStoreConfig,
}

impl BlockStoreConfigBuilder {
    /// Set the block store database path.
    pub fn blocks_db_path(mut self, path: PathBuf) -> Self {
        self.config.blocks_db_path = path;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> BlockStoreConfig {
        self.config
    }
}
