//! Session store port definition.

use async_trait::async_trait;

use crate::domain::entities::SessionToken;
use crate::domain::errors::SessionError;
use crate::domain::namespace::Namespace;

/// Port for session persistence: one token per namespace plus the active
/// company identifier.
#[async_trait]
pub trait SessionStorePort: Send + Sync {
    /// Retrieves the stored token of a namespace.
    async fn get_token(&self, namespace: Namespace) -> Result<Option<SessionToken>, SessionError>;

    /// Stores a token under its namespace key.
    async fn store_token(&self, token: &SessionToken) -> Result<(), SessionError>;

    /// Deletes the token of a namespace. Deleting a missing token succeeds.
    async fn clear_token(&self, namespace: Namespace) -> Result<(), SessionError>;

    /// Retrieves the active company identifier.
    async fn get_company_id(&self) -> Result<Option<String>, SessionError>;

    /// Stores the active company identifier.
    async fn store_company_id(&self, company_id: &str) -> Result<(), SessionError>;

    /// Deletes the active company identifier.
    async fn clear_company_id(&self) -> Result<(), SessionError>;

    /// Token attached to outgoing requests: platform first, then company.
    async fn active_token(&self) -> Result<Option<SessionToken>, SessionError> {
        if let Some(token) = self.get_token(Namespace::Platform).await? {
            return Ok(Some(token));
        }
        self.get_token(Namespace::Company).await
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory session store for testing.
    #[derive(Clone, Default)]
    pub struct MockSessionStore {
        tokens: Arc<RwLock<HashMap<Namespace, SessionToken>>>,
        company_id: Arc<RwLock<Option<String>>>,
    }

    impl MockSessionStore {
        /// Creates empty mock storage.
        pub fn new() -> Self {
            Self::default()
        }

        /// Creates mock storage holding the given tokens.
        pub fn with_tokens(tokens: impl IntoIterator<Item = SessionToken>) -> Self {
            let map = tokens.into_iter().map(|t| (t.namespace(), t)).collect();
            Self {
                tokens: Arc::new(RwLock::new(map)),
                company_id: Arc::default(),
            }
        }

        /// Sets the stored company identifier.
        pub fn with_company_id(self, company_id: &str) -> Self {
            Self {
                company_id: Arc::new(RwLock::new(Some(company_id.to_string()))),
                ..self
            }
        }
    }

    #[async_trait]
    impl SessionStorePort for MockSessionStore {
        async fn get_token(
            &self,
            namespace: Namespace,
        ) -> Result<Option<SessionToken>, SessionError> {
            Ok(self.tokens.read().await.get(&namespace).cloned())
        }

        async fn store_token(&self, token: &SessionToken) -> Result<(), SessionError> {
            self.tokens
                .write()
                .await
                .insert(token.namespace(), token.clone());
            Ok(())
        }

        async fn clear_token(&self, namespace: Namespace) -> Result<(), SessionError> {
            self.tokens.write().await.remove(&namespace);
            Ok(())
        }

        async fn get_company_id(&self) -> Result<Option<String>, SessionError> {
            Ok(self.company_id.read().await.clone())
        }

        async fn store_company_id(&self, company_id: &str) -> Result<(), SessionError> {
            *self.company_id.write().await = Some(company_id.to_string());
            Ok(())
        }

        async fn clear_company_id(&self) -> Result<(), SessionError> {
            *self.company_id.write().await = None;
            Ok(())
        }
    }
}
