//! File-based session store.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::SessionToken;
use crate::domain::errors::SessionError;
use crate::domain::namespace::Namespace;
use crate::domain::ports::SessionStorePort;
use crate::infrastructure::config::write_atomic;

const COMPANY_ID_KEY: &str = "company-id";

/// Session store persisted as a flat TOML table of string values.
///
/// Every operation re-reads the file so several consoles share one session.
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                warn!(path = ?self.path, error = %e, "Session file is corrupt, treating it as empty");
                SessionError::Corrupt(e.to_string())
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(SessionError::RetrievalFailed(e.to_string())),
        }
    }

    /// Loads the table, treating a corrupt file as empty.
    async fn load_or_empty(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match self.load().await {
            Err(SessionError::Corrupt(_)) => Ok(BTreeMap::new()),
            other => other,
        }
    }

    async fn save(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let content =
            toml::to_string(values).map_err(|e| SessionError::StorageFailed(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SessionError::StorageFailed(e.to_string()))?;
        }
        write_atomic(&self.path, content.as_bytes())
            .map_err(|e| SessionError::StorageFailed(e.to_string()))
    }

    async fn read(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().await;
        Ok(self.load_or_empty().await?.remove(key))
    }

    async fn write(&self, key: &str, value: Option<&str>) -> Result<(), SessionError> {
        let _guard = self.lock.lock().await;
        let mut values = self.load_or_empty().await?;

        match value {
            Some(value) => {
                values.insert(key.to_string(), value.to_string());
            }
            None => {
                if values.remove(key).is_none() {
                    return Ok(());
                }
            }
        }

        debug!(key, path = ?self.path, "Writing session file");
        self.save(&values).await
    }
}

#[async_trait]
impl SessionStorePort for FileSessionStore {
    async fn get_token(&self, namespace: Namespace) -> Result<Option<SessionToken>, SessionError> {
        Ok(self
            .read(namespace.token_key())
            .await?
            .and_then(|value| SessionToken::new(value, namespace)))
    }

    async fn store_token(&self, token: &SessionToken) -> Result<(), SessionError> {
        self.write(token.namespace().token_key(), Some(token.as_str()))
            .await
    }

    async fn clear_token(&self, namespace: Namespace) -> Result<(), SessionError> {
        self.write(namespace.token_key(), None).await
    }

    async fn get_company_id(&self) -> Result<Option<String>, SessionError> {
        self.read(COMPANY_ID_KEY).await
    }

    async fn store_company_id(&self, company_id: &str) -> Result<(), SessionError> {
        self.write(COMPANY_ID_KEY, Some(company_id)).await
    }

    async fn clear_company_id(&self) -> Result<(), SessionError> {
        self.write(COMPANY_ID_KEY, None).await
    }
}
