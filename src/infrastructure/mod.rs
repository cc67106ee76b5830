//! Infrastructure layer with external service adapters.

/// Backend HTTP access.
pub mod api;
/// Application configuration.
pub mod config;
/// CSV export.
pub mod export;
/// Session store adapters.
pub mod storage;

pub use api::{ApiClient, SessionEvent};
pub use config::{AppConfig, CliArgs, LogLevel, SessionStoreKind, StorageManager};
pub use storage::FileSessionStore;
#[cfg(feature = "keyring")]
pub use storage::KeyringSessionStore;
