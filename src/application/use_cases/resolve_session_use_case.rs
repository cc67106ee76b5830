//! Session resolution use case.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::domain::entities::SessionToken;
use crate::domain::errors::{ApiError, SessionError};
use crate::domain::namespace::{ListScope, Namespace};
use crate::domain::ports::SessionStorePort;

/// Resolves persisted sessions and the scope of list requests.
pub struct ResolveSessionUseCase {
    session_store: Arc<dyn SessionStorePort>,
}

impl ResolveSessionUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(session_store: Arc<dyn SessionStorePort>) -> Self {
        Self { session_store }
    }

    /// Finds a usable persisted token.
    ///
    /// With no requested namespace the platform session wins over the
    /// company one. Expired tokens are cleared and skipped.
    ///
    /// # Errors
    /// Returns error if storage access fails.
    pub async fn execute(
        &self,
        requested: Option<Namespace>,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionToken>, SessionError> {
        let candidates: &[Namespace] = match requested {
            Some(Namespace::Company) => &[Namespace::Company],
            Some(Namespace::Platform) => &[Namespace::Platform],
            None => &[Namespace::Platform, Namespace::Company],
        };

        for &namespace in candidates {
            match self.session_store.get_token(namespace).await? {
                Some(token) if token.is_expired_at(now) => {
                    info!(%namespace, "Stored session expired");
                    self.session_store.clear_token(namespace).await?;
                }
                Some(token) => {
                    info!(%namespace, token = %token, "Resuming stored session");
                    return Ok(Some(token));
                }
                None => debug!(%namespace, "No stored session"),
            }
        }

        Ok(None)
    }

    /// Scope of list requests issued from a namespace's console.
    ///
    /// Company consoles list the active company's records: the stored
    /// company id, or else the company token's claims.
    ///
    /// # Errors
    /// Returns [`ApiError::MissingCompany`] if no company id is known.
    pub async fn list_scope(&self, namespace: Namespace) -> Result<ListScope, ApiError> {
        if namespace == Namespace::Platform {
            return Ok(ListScope::All);
        }

        if let Some(id) = self.session_store.get_company_id().await? {
            return Ok(ListScope::Company(id));
        }

        let from_claims = self
            .session_store
            .get_token(Namespace::Company)
            .await?
            .and_then(|token| token.claims())
            .and_then(|claims| claims.company_id);

        match from_claims {
            Some(id) => {
                debug!(company_id = %id, "Company id read from token claims");
                Ok(ListScope::Company(id))
            }
            None => {
                warn!("No company id in store or token");
                Err(ApiError::MissingCompany)
            }
        }
    }
}
