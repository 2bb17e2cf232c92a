//! TOML configuration for engine limits and the startup denylist.
//!
//! The file lives in the OS config directory:
//! - Windows: %APPDATA%\playwise\config.toml
//! - macOS: ~/Library/Application Support/playwise/config.toml
//! - Linux: ~/.config/playwise/config.toml
//!
//! The file only tunes engine limits and seeds the denylist. The catalog
//! itself is never written to disk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::catalog::history::DEFAULT_MAX_SIZE;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Play history settings
    pub history: HistoryConfig,

    /// Snapshot settings
    pub snapshot: SnapshotConfig,

    /// Artists blocked when an engine is created
    pub denylist: DenylistConfig,
}

/// Play history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum plays kept before the oldest is evicted
    pub max_size: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

/// Snapshot settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Number of recent plays included in a snapshot
    pub history_limit: usize,

    /// Number of longest tracks reported in snapshot analytics
    pub longest_tracks: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            history_limit: 10,
            longest_tracks: 5,
        }
    }
}

/// Initial denylist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenylistConfig {
    pub artists: Vec<String>,
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("playwise"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load the config file from its default location, or defaults if there is
/// no config directory.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::warn!("No config directory on this platform, using defaults");
            Config::default()
        }
    }
}

/// Load `path`, falling back to defaults when it is absent or unreadable.
///
/// A broken file is logged rather than returned so the engine always starts.
pub fn load_from(path: &Path) -> Config {
    match try_load(path) {
        Ok(Some(config)) => {
            tracing::info!("Config loaded from {:?}", path);
            config
        }
        Ok(None) => {
            tracing::debug!("No config at {:?}, using defaults", path);
            Config::default()
        }
        Err(e) => {
            tracing::error!("{}; using defaults", e);
            Config::default()
        }
    }
}

/// Read and parse `path`. `Ok(None)` means the file does not exist.
pub fn try_load(path: &Path) -> Result<Option<Config>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::Read(path.to_path_buf(), e)),
    };
    toml::from_str(&contents)
        .map(Some)
        .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

/// Write the config to its default location, returning the path written.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Write the config to `path`, creating parent directories.
///
/// The file is replaced by rename, so readers never see a partial write.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let staging = path.with_extension("toml.tmp");
    if let Err(e) = std::fs::write(&staging, contents) {
        return Err(ConfigError::Write(staging, e));
    }
    if let Err(e) = std::fs::rename(&staging, path) {
        return Err(ConfigError::Rename(staging, path.to_path_buf(), e));
    }

    tracing::info!("Config written to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Config file failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No config directory available")]
    NoConfigDir,

    #[error("Cannot read config {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Invalid config {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Cannot create directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Cannot serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Cannot write {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Cannot move {0} into place at {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        crate::error::Error::config(e.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
