//! Configuration management for turftap

use crate::error::{Result, TurftapError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage settings
    pub storage: StorageConfig,
    /// Listing settings
    pub listings: ListingConfig,
    /// Comment settings
    pub comments: CommentConfig,
    /// Contributor ranking settings
    pub contributors: ContributorConfig,
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| e.with_context(format!("{}", path.display())))
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TurftapError::Toml(e.to_string()))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.listings.page_size == 0 {
            return Err(TurftapError::Config(
                "listings.page_size must be at least 1".to_string(),
            ));
        }
        if self.comments.max_length == 0 {
            return Err(TurftapError::Config(
                "comments.max_length must be at least 1".to_string(),
            ));
        }
        if self.storage.lock_stale_after_secs == 0 {
            return Err(TurftapError::Config(
                "storage.lock_stale_after_secs must be at least 1".to_string(),
            ));
        }
        if self.contributors.max_page_size == 0 {
            return Err(TurftapError::Config(
                "contributors.max_page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory; the platform data dir is used when unset
    pub data_dir: Option<PathBuf>,
    /// Attempts to take the store lock before giving up
    pub lock_retries: u32,
    /// Delay between lock attempts in milliseconds
    pub lock_retry_delay_ms: u64,
    /// A lock file untouched for this many seconds is left over from a
    /// crashed process and gets broken
    pub lock_stale_after_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            lock_retries: 50,
            lock_retry_delay_ms: 20,
            lock_stale_after_secs: 30,
        }
    }
}

/// Listing-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Listings per browse page
    pub page_size: usize,
    /// Points awarded to the submitter when a listing is approved
    pub approval_points: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: 24,
            approval_points: 3,
        }
    }
}

/// Comment-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    /// Maximum comment content length in characters
    pub max_length: usize,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self { max_length: 2000 }
    }
}

/// Top-contributor ranking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorConfig {
    /// Largest page size a caller may request
    pub max_page_size: usize,
    /// Page size used when none is requested
    pub default_page_size: usize,
}

impl Default for ContributorConfig {
    fn default() -> Self {
        Self {
            max_page_size: 50,
            default_page_size: 10,
        }
    }
}
