use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use super::app_config::AppConfig;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Failure to locate, read or write the console's `config.toml`.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ConfigError {
    #[error("no per-user config directory on this platform")]
    ConfigDirNotFound,
    #[error("config file i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode config: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("cannot decode config: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Owns the busdesk config directory and the `config.toml` inside it.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Points at the platform config directory for busdesk.
    ///
    /// # Errors
    ///
    /// `ConfigError::ConfigDirNotFound` when the platform has no home directory.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = AppConfig::default_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
        Ok(Self { config_dir })
    }

    /// Points at `path` instead of the platform directory.
    #[must_use]
    pub const fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Directory holding `config.toml`.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Creates the config directory on first use.
    ///
    /// # Errors
    ///
    /// I/O failure while creating it.
    pub fn ensure_config_dir(&self) -> Result<(), ConfigError> {
        if !self.config_dir.exists() {
            info!(path = ?self.config_dir, "Creating config directory");
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Reads `config.toml`, or the file given with `--config`.
    ///
    /// First run writes the defaults out so operators have a file to edit.
    /// A file that does not parse is kept as is and the defaults apply for
    /// this run.
    ///
    /// # Errors
    ///
    /// I/O failure while reading the file or writing the defaults.
    pub fn load_config(&self, path_override: Option<&Path>) -> Result<AppConfig, ConfigError> {
        self.ensure_config_dir()?;
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            Path::to_path_buf,
        );

        if !config_path.exists() {
            info!(path = ?config_path, "No config file yet, writing defaults");
            let defaults = AppConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            write_toml(&config_path, &defaults)?;
            return Ok(defaults);
        }

        let content = fs::read_to_string(&config_path)?;
        Ok(toml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = ?config_path, error = %e, "Ignoring unreadable config file");
            AppConfig::default()
        }))
    }

    /// Writes `config` to `config.toml` in the config directory.
    ///
    /// # Errors
    ///
    /// Encoding or I/O failure.
    pub fn save_config(&self, config: &AppConfig) -> Result<(), ConfigError> {
        self.ensure_config_dir()?;
        write_toml(&self.config_dir.join(CONFIG_FILE_NAME), config)
    }
}

fn write_toml<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
    write_atomic(path, toml::to_string_pretty(data)?.as_bytes())?;
    Ok(())
}

/// Writes `content` to a sibling temp file, then renames it over `path`.
///
/// Readers never see a half-written session or config file.
///
/// # Errors
///
/// I/O failure on the temp file or the rename.
pub fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other("path has no parent directory"))?;
    let mut staged = tempfile::NamedTempFile::new_in(parent)?;
    staged.write_all(content)?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}
