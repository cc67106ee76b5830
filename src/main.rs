use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use busdesk::domain::SessionStorePort;
use busdesk::infrastructure::{
    ApiClient, AppConfig, CliArgs, FileSessionStore, SessionStoreKind, StorageManager,
};
use busdesk::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn file_store() -> Result<Arc<dyn SessionStorePort>> {
    let path = AppConfig::session_file_path()
        .ok_or_else(|| eyre!("failed to determine data directory"))?;
    Ok(Arc::new(FileSessionStore::new(path)))
}

fn session_store(config: &AppConfig) -> Result<Arc<dyn SessionStorePort>> {
    match config.session_store {
        #[cfg(feature = "keyring")]
        SessionStoreKind::Keyring => Ok(Arc::new(
            busdesk::infrastructure::KeyringSessionStore::new(),
        )),
        #[cfg(not(feature = "keyring"))]
        SessionStoreKind::Keyring => {
            tracing::warn!("Built without keyring support, using the session file");
            file_store()
        }
        SessionStoreKind::File => file_store(),
    }
}

fn create_app() -> Result<App> {
    let config = load_config()?;

    init_logging(&config)?;

    info!(
        version = busdesk::VERSION,
        api = %config.api.url,
        "Starting busdesk"
    );

    let store = session_store(&config)?;
    let (session_tx, session_rx) = mpsc::unbounded_channel();
    let api = ApiClient::new(
        config.api.url.clone(),
        config.api.timeout(),
        Arc::clone(&store),
        session_tx,
    )?;

    Ok(App::new(config, Arc::new(api), store, session_rx))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let app = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
