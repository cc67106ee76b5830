//! Application configuration.

/// Configuration structure.
pub mod app_config;
/// Command-line arguments.
pub mod args;
/// Configuration file storage.
pub mod storage;

pub use app_config::{ApiConfig, AppConfig, LogLevel, SessionStoreKind, UiConfig};
pub use args::CliArgs;
pub use storage::{ConfigError, StorageManager, write_atomic};
