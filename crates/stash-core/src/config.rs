//! Store configuration
//!
//! The base directory is an explicit value handed to [`crate::Stash::open`];
//! nothing in the store derives paths from process-wide state.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stash_fs::{ConfigStore, NormalizedPath, RobustnessConfig, io::DEFAULT_READ_LENGTH};

use crate::{Error, Result};

/// Directory name used under the platform data directory when no base is configured.
pub const DEFAULT_DIR_NAME: &str = "stash";

/// Write robustness as it appears in config files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RobustnessSettings {
    /// Milliseconds to retry the advisory lock on a write's temp file
    pub lock_timeout_ms: u64,
    /// fsync each write before renaming it into place
    pub enable_fsync: bool,
}

impl Default for RobustnessSettings {
    fn default() -> Self {
        let defaults = RobustnessConfig::default();
        Self {
            lock_timeout_ms: defaults.lock_timeout.as_millis() as u64,
            enable_fsync: defaults.enable_fsync,
        }
    }
}

impl From<&RobustnessSettings> for RobustnessConfig {
    fn from(settings: &RobustnessSettings) -> Self {
        Self {
            lock_timeout: Duration::from_millis(settings.lock_timeout_ms),
            enable_fsync: settings.enable_fsync,
        }
    }
}

/// Everything needed to open a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    /// Base directory; `None` means the platform data directory
    pub base_dir: Option<PathBuf>,

    pub robustness: RobustnessSettings,

    /// Bytes returned by a range read when the caller gives no length
    pub read_length: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            robustness: RobustnessSettings::default(),
            read_length: DEFAULT_READ_LENGTH,
        }
    }
}

impl StoreConfig {
    /// Configuration rooted at `base_dir` with default settings.
    pub fn at(base_dir: impl Into<PathBuf>) -> Self {
        Self::default().with_base_dir(base_dir)
    }

    /// Load from a TOML, JSON or YAML file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        tracing::debug!(%path, "Loading store config");
        Ok(ConfigStore::new().load(path)?)
    }

    /// Write this configuration to a TOML, JSON or YAML file.
    pub fn save(&self, path: &NormalizedPath) -> Result<()> {
        ConfigStore::with_robustness(self.robustness()).save(path, self)?;
        tracing::debug!(%path, "Saved store config");
        Ok(())
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn robustness(&self) -> RobustnessConfig {
        RobustnessConfig::from(&self.robustness)
    }

    /// The configured base directory, or `<data dir>/stash`.
    pub fn resolve_base_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.base_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(DEFAULT_DIR_NAME))
            .ok_or_else(|| Error::Config {
                message: "no base directory configured and no platform data directory".into(),
            })
    }
}
