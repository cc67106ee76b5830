//! Authentication port definition.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::{Map, Value};

use crate::domain::errors::ApiError;
use crate::domain::namespace::Namespace;

/// What the backend returns from a login or registration call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthGrant {
    /// Bearer token, when the backend issued one.
    pub token: Option<String>,
    /// Company the account belongs to, when the backend reported it.
    pub company_id: Option<String>,
    /// Informational message from the backend.
    pub message: Option<String>,
}

/// Port for the login and registration endpoints of each namespace.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Exchanges credentials for a token.
    async fn login(
        &self,
        namespace: Namespace,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, ApiError>;

    /// Creates an account from a form payload.
    async fn register(
        &self,
        namespace: Namespace,
        payload: Map<String, Value>,
    ) -> Result<AuthGrant, ApiError>;
}
