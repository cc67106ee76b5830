//! Login and registration use cases.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::domain::entities::SessionToken;
use crate::domain::errors::ApiError;
use crate::domain::namespace::Namespace;
use crate::domain::ports::{AuthGrant, AuthPort, SessionStorePort};

/// Handles the login workflow of either namespace.
#[derive(Clone)]
pub struct LoginUseCase {
    auth_port: Arc<dyn AuthPort>,
    session_store: Arc<dyn SessionStorePort>,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub const fn new(
        auth_port: Arc<dyn AuthPort>,
        session_store: Arc<dyn SessionStorePort>,
    ) -> Self {
        Self {
            auth_port,
            session_store,
        }
    }

    /// Posts the credentials and opens the session.
    ///
    /// # Errors
    /// Returns the backend rejection, a transport error, or a storage error.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        debug!(namespace = %request.namespace, email = %request.email, "Attempting login");

        let grant = self
            .auth_port
            .login(request.namespace, &request.email, &request.password)
            .await
            .inspect_err(|e| warn!(error = %e, "Login rejected"))?;

        let token = grant
            .token
            .as_deref()
            .and_then(|value| SessionToken::new(value, request.namespace))
            .ok_or_else(|| ApiError::decode("login response carried no token"))?;

        open_session(self.session_store.as_ref(), &token, &grant).await
    }
}

/// Handles account registration for either namespace.
#[derive(Clone)]
pub struct RegisterUseCase {
    auth_port: Arc<dyn AuthPort>,
    session_store: Arc<dyn SessionStorePort>,
}

impl RegisterUseCase {
    /// Creates new registration use case.
    #[must_use]
    pub const fn new(
        auth_port: Arc<dyn AuthPort>,
        session_store: Arc<dyn SessionStorePort>,
    ) -> Self {
        Self {
            auth_port,
            session_store,
        }
    }

    /// Creates the account; opens a session when the backend returns a token.
    ///
    /// # Errors
    /// Returns the backend rejection, a transport error, or a storage error.
    pub async fn execute(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        debug!(namespace = %request.namespace, "Attempting registration");

        let grant = self
            .auth_port
            .register(request.namespace, request.payload())
            .await
            .inspect_err(|e| warn!(error = %e, "Registration rejected"))?;

        match grant
            .token
            .as_deref()
            .and_then(|value| SessionToken::new(value, request.namespace))
        {
            Some(token) => {
                let response = open_session(self.session_store.as_ref(), &token, &grant).await?;
                Ok(RegisterResponse::SignedIn(response))
            }
            None => {
                info!(namespace = %request.namespace, "Account created without a session");
                Ok(RegisterResponse::Created {
                    message: grant.message,
                })
            }
        }
    }
}

/// Clears the session of one namespace.
#[derive(Clone)]
pub struct LogoutUseCase {
    session_store: Arc<dyn SessionStorePort>,
}

impl LogoutUseCase {
    /// Creates new logout use case.
    #[must_use]
    pub const fn new(session_store: Arc<dyn SessionStorePort>) -> Self {
        Self { session_store }
    }

    /// Deletes the namespace token and, for company sessions, the company id.
    ///
    /// # Errors
    /// Returns error if deletion fails.
    pub async fn execute(&self, namespace: Namespace) -> Result<(), ApiError> {
        self.session_store.clear_token(namespace).await?;
        if namespace == Namespace::Company {
            self.session_store.clear_company_id().await?;
        }
        info!(%namespace, "Session closed");
        Ok(())
    }
}

async fn open_session(
    store: &dyn SessionStorePort,
    token: &SessionToken,
    grant: &AuthGrant,
) -> Result<LoginResponse, ApiError> {
    let namespace = token.namespace();
    store.store_token(token).await?;

    let company_id = match namespace {
        Namespace::Company => {
            let company_id = grant
                .company_id
                .clone()
                .or_else(|| token.claims().and_then(|c| c.company_id));
            match &company_id {
                Some(id) => store.store_company_id(id).await?,
                None => warn!("Company session opened without a company id"),
            }
            company_id
        }
        Namespace::Platform => None,
    };

    info!(%namespace, token = %token, "Session opened");
    Ok(LoginResponse::new(namespace, company_id))
}
