//! Project configuration read from `.tasklist/config.toml`.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tasklist_store::{FileBackend, KvTaskStore, STORAGE_KEY};

use crate::async_store::{DEFAULT_LATENCY, DelayedTaskStore};

const CONFIG_DIR: &str = ".tasklist";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_STORAGE_FILE: &str = "storage.json";

/// Top-level configuration loaded from `.tasklist/config.toml`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Where and how the task list is stored.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl ProjectConfig {
    /// Load configuration from the data directory `dir`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let config_path = dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()
    }
}

/// `[storage]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage file, relative to the data directory.
    pub file: String,
    /// Key the task list is stored under.
    pub key: String,
    /// Artificial latency of every store call.
    pub latency_ms: u64,
    /// Optional byte quota for the storage file.
    pub quota_bytes: Option<usize>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_STORAGE_FILE.into(),
            key: STORAGE_KEY.into(),
            latency_ms: u64::try_from(DEFAULT_LATENCY.as_millis()).unwrap_or(100),
            quota_bytes: None,
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            bail!("storage.key must not be empty");
        }
        if self.file.trim().is_empty() {
            bail!("storage.file must not be empty");
        }
        Ok(())
    }

    /// Resolved path of the storage file.
    pub fn path(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(&self.file)
    }

    /// Latency as a [`Duration`].
    pub const fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Open the async store described by this block.
    pub fn open(&self, dir: impl AsRef<Path>) -> DelayedTaskStore<FileBackend> {
        let backend = FileBackend::new(self.path(dir)).with_quota(self.quota_bytes);
        DelayedTaskStore::new(KvTaskStore::with_key(backend, self.key.clone()), self.latency())
    }
}
