//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::domain::namespace::Namespace;

const APP_NAME: &str = "busdesk";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "busdesk";

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Where sessions are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SessionStoreKind {
    /// System keyring.
    Keyring,
    /// TOML file in the data directory.
    File,
}

impl Default for SessionStoreKind {
    fn default() -> Self {
        if cfg!(feature = "keyring") {
            Self::Keyring
        } else {
            Self::File
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every route is appended to.
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Terminal UI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Delay between a successful login and entering the console.
    #[serde(default = "default_redirect_delay_ms")]
    pub login_redirect_delay_ms: u64,

    /// Namespace preselected on the login screen.
    #[serde(default)]
    pub default_namespace: Namespace,
}

impl UiConfig {
    /// Login redirect delay.
    #[must_use]
    pub const fn login_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.login_redirect_delay_ms)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            login_redirect_delay_ms: default_redirect_delay_ms(),
            default_namespace: Namespace::default(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Session persistence backend.
    #[serde(default)]
    pub session_store: SessionStoreKind,

    /// Directory CSV exports are written to.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// Namespace requested on the command line.
    #[serde(skip)]
    pub namespace: Option<Namespace>,

    /// Backend settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// UI settings.
    #[serde(default)]
    pub ui: UiConfig,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_redirect_delay_ms() -> u64 {
    1500
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(url) = args.api_url {
            self.api.url = url;
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_secs = timeout;
        }
        if let Some(kind) = args.session_store {
            self.session_store = kind;
        }
        if let Some(dir) = args.export_dir {
            self.export_dir = Some(dir);
        }
        if let Some(namespace) = args.namespace {
            self.namespace = Some(namespace);
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default data directory.
    #[must_use]
    pub fn default_data_dir() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        Self::default_data_dir().map(|dir| dir.join("busdesk.log"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }

    /// Returns the session file used by the file store.
    #[must_use]
    pub fn session_file_path() -> Option<PathBuf> {
        Self::default_data_dir().map(|dir| dir.join("session.toml"))
    }

    /// Returns effective export directory: configured, else the data directory.
    #[must_use]
    pub fn effective_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(|| Self::default_data_dir().map(|dir| dir.join("exports")))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
            log_level = "debug"
            session_store = "file"

            [api]
            url = "https://api.example.sn/api"

            [ui]
            default_namespace = "platform"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.session_store, SessionStoreKind::File);
        assert_eq!(config.api.url, "https://api.example.sn/api");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.ui.default_namespace, Namespace::Platform);
        assert_eq!(config.ui.login_redirect_delay_ms, 1500);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.ui.login_redirect_delay(), Duration::from_millis(1500));
        assert_eq!(config.namespace, None);
    }

    #[test]
    fn test_args_override_file_values() {
        let mut config = AppConfig::default();
        let args = CliArgs::parse_from([
            "busdesk",
            "--api-url",
            "http://10.0.0.5:3000/api",
            "--timeout",
            "5",
            "--namespace",
            "platform",
            "--session-store",
            "file",
        ]);

        config.merge_with_args(args);

        assert_eq!(config.api.url, "http://10.0.0.5:3000/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.namespace, Some(Namespace::Platform));
        assert_eq!(config.session_store, SessionStoreKind::File);
    }
}
