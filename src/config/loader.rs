//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

/// Storage location configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding the upload folders.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// Metadata index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Where the index snapshot is kept between runs.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    /// Category given to files found by a disk rescan or added without one.
    #[serde(default = "default_category")]
    pub default_category: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            default_category: default_category(),
        }
    }
}

fn default_category() -> String {
    "general".to_string()
}

/// File name of the snapshot inside the storage root when none is configured.
pub const DEFAULT_SNAPSHOT_NAME: &str = ".asset-index.json";

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration if the file exists; a missing file yields `None`.
    pub fn load_if_present(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective storage root.
    pub fn uploads_root(&self) -> PathBuf {
        self.storage.root.clone().unwrap_or_else(|| {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join("uploads")
        })
    }

    /// Get the effective snapshot path.
    pub fn snapshot_path(&self) -> PathBuf {
        self.index
            .snapshot_path
            .clone()
            .unwrap_or_else(|| self.uploads_root().join(DEFAULT_SNAPSHOT_NAME))
    }
}
