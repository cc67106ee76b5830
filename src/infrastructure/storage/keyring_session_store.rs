//! Keyring-based session store.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::SessionToken;
use crate::domain::errors::SessionError;
use crate::domain::namespace::Namespace;
use crate::domain::ports::SessionStorePort;

const KEYRING_SERVICE: &str = "busdesk";
const COMPANY_ID_KEY: &str = "company-id";

/// System keyring session store: one entry per key under one service.
pub struct KeyringSessionStore {
    service: String,
}

impl KeyringSessionStore {
    /// Creates new store with the default service name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE)
    }

    /// Creates store with a custom service name.
    #[must_use]
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, SessionError> {
        Entry::new(&self.service, key)
            .map_err(|e| SessionError::NotAvailable(format!("failed to access keyring: {e}")))
    }

    fn read(&self, key: &str) -> Result<Option<String>, SessionError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => {
                debug!(key, "No keyring entry");
                Ok(None)
            }
            Err(e) => {
                warn!(key, error = %e, "Failed to read keyring entry");
                Err(SessionError::RetrievalFailed(e.to_string()))
            }
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entry(key)?.set_password(value).map_err(|e| {
            warn!(key, error = %e, "Failed to write keyring entry");
            SessionError::StorageFailed(e.to_string())
        })
    }

    fn delete(&self, key: &str) -> Result<(), SessionError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(key, error = %e, "Failed to delete keyring entry");
                Err(SessionError::DeletionFailed(e.to_string()))
            }
        }
    }
}

impl Default for KeyringSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStorePort for KeyringSessionStore {
    async fn get_token(&self, namespace: Namespace) -> Result<Option<SessionToken>, SessionError> {
        Ok(self
            .read(namespace.token_key())?
            .and_then(|value| SessionToken::new(value, namespace)))
    }

    async fn store_token(&self, token: &SessionToken) -> Result<(), SessionError> {
        debug!(namespace = %token.namespace(), "Storing token in keyring");
        self.write(token.namespace().token_key(), token.as_str())
    }

    async fn clear_token(&self, namespace: Namespace) -> Result<(), SessionError> {
        debug!(%namespace, "Deleting token from keyring");
        self.delete(namespace.token_key())
    }

    async fn get_company_id(&self) -> Result<Option<String>, SessionError> {
        self.read(COMPANY_ID_KEY)
    }

    async fn store_company_id(&self, company_id: &str) -> Result<(), SessionError> {
        self.write(COMPANY_ID_KEY, company_id)
    }

    async fn clear_company_id(&self) -> Result<(), SessionError> {
        self.delete(COMPANY_ID_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_store_and_clear_per_namespace() {
        let store = KeyringSessionStore::with_service("busdesk-test");
        let token = SessionToken::new("tok-root", Namespace::Platform).unwrap();

        store.store_token(&token).await.unwrap();
        let retrieved = store.get_token(Namespace::Platform).await.unwrap();
        assert_eq!(retrieved.unwrap().as_str(), "tok-root");

        store.clear_token(Namespace::Platform).await.unwrap();
        assert!(store.get_token(Namespace::Platform).await.unwrap().is_none());
        store.clear_token(Namespace::Platform).await.unwrap();
    }
}
