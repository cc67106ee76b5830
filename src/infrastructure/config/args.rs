use std::path::PathBuf;

use clap::Parser;

use super::app_config::{LogLevel, SessionStoreKind};
use crate::domain::namespace::Namespace;

/// Command-line arguments; every value overrides the config file.
#[derive(Debug, Parser)]
#[command(
    name = "busdesk",
    version,
    about = "Terminal administration console for a bus-ticketing platform",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL.
    #[arg(long, env = "BUSDESK_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Console to open: company or platform.
    #[arg(short, long, value_enum)]
    pub namespace: Option<Namespace>,

    /// Session persistence backend.
    #[arg(long, value_enum)]
    pub session_store: Option<SessionStoreKind>,

    /// Directory CSV exports are written to.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}
