//! Authenticated HTTP client for the ticketing backend.
//!
//! Every request passes through one interceptor: the active session token is
//! attached on the way out, and a `401` on the way back clears the session of
//! the current console and publishes [`SessionEvent::Expired`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use super::dto::ErrorBody;
use crate::domain::errors::ApiError;
use crate::domain::namespace::Namespace;
use crate::domain::ports::SessionStorePort;

/// Session notifications published by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend rejected the session of this namespace.
    Expired(Namespace),
}

/// Shared backend client.
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_store: Arc<dyn SessionStorePort>,
    namespace: RwLock<Namespace>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        session_store: Arc<dyn SessionStorePort>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", crate::NAME, crate::VERSION))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_store,
            namespace: RwLock::new(Namespace::default()),
            events,
        })
    }

    /// Sets the namespace of the console currently shown.
    pub fn set_namespace(&self, namespace: Namespace) {
        debug!(%namespace, "Route namespace changed");
        *self.namespace.write() = namespace;
    }

    /// Namespace of the console currently shown.
    #[must_use]
    pub fn namespace(&self) -> Namespace {
        *self.namespace.read()
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends an authenticated request and decodes the JSON response.
    ///
    /// # Errors
    /// Returns the mapped transport, status or decode error.
    pub async fn request_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let response = self.request(method, path, body).await?;
        decode(response).await
    }

    /// Sends an authenticated request, discarding the response body.
    ///
    /// # Errors
    /// Returns the mapped transport or status error.
    pub async fn request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut builder = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let builder = self.authorize(builder).await?;

        debug!(%method, path, "Sending request");
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(self.expire_session().await);
        }
        if !status.is_success() {
            return Err(rejection(status, response).await);
        }
        Ok(response)
    }

    /// Sends an unauthenticated request, as used by login and registration.
    ///
    /// A `401` here means bad credentials, not an expired session, so it is
    /// returned as a rejection and no session is touched.
    ///
    /// # Errors
    /// Returns the mapped transport, status or decode error.
    pub async fn public_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        debug!(path, "Sending public request");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(rejection(status, response).await);
        }
        decode(response).await
    }

    async fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.session_store.active_token().await? {
            Some(token) => Ok(builder.header(header::AUTHORIZATION, token.bearer())),
            None => {
                debug!("No session token, sending unauthenticated request");
                Ok(builder)
            }
        }
    }

    async fn expire_session(&self) -> ApiError {
        let namespace = self.namespace();
        warn!(%namespace, "Backend rejected the session");

        if let Err(e) = self.session_store.clear_token(namespace).await {
            error!(%namespace, error = %e, "Failed to clear rejected session token");
        }
        if self.events.send(SessionEvent::Expired(namespace)).is_err() {
            debug!("No listener for session events");
        }

        ApiError::Unauthorized { namespace }
    }
}

fn transport_error(e: reqwest::Error) -> ApiError {
    warn!(error = %e, "Failed to reach backend");
    if e.is_timeout() {
        ApiError::network("request timed out")
    } else if e.is_connect() {
        ApiError::network("failed to connect to the backend")
    } else {
        ApiError::network(e.to_string())
    }
}

async fn rejection(status: StatusCode, response: Response) -> ApiError {
    let message = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(ErrorBody::into_message),
        Err(e) => {
            debug!(error = %e, "Failed to read error body");
            None
        }
    };

    warn!(status = status.as_u16(), message = ?message, "Request rejected");
    match message {
        Some(message) => ApiError::rejected(status, message),
        None => ApiError::status_only(status),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(error = %e, "Failed to decode response");
        ApiError::decode(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    use super::*;
    use crate::domain::entities::SessionToken;
    use crate::domain::ports::mocks::MockSessionStore;

    struct NoAuthorization;

    impl Match for NoAuthorization {
        fn matches(&self, request: &Request) -> bool {
            !request.headers.contains_key("authorization")
        }
    }

    fn token(value: &str, namespace: Namespace) -> SessionToken {
        SessionToken::new(value, namespace).unwrap()
    }

    fn client(
        server: &MockServer,
        store: Arc<MockSessionStore>,
    ) -> (ApiClient, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = ApiClient::new(
            format!("{}/api/", server.uri()),
            Duration::from_secs(5),
            store,
            tx,
        )
        .unwrap();
        (client, rx)
    }

    #[tokio::test]
    async fn test_platform_token_takes_precedence() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(header("Authorization", "Bearer tok-root"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let store = Arc::new(MockSessionStore::with_tokens([
            token("tok-company", Namespace::Company),
            token("tok-root", Namespace::Platform),
        ]));
        let (client, _rx) = client(&server, store);

        let body: Value = client
            .request_json(Method::GET, "/users", None::<&Value>)
            .await
            .unwrap();
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/compagnies"))
            .and(NoAuthorization)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let (client, _rx) = client(&server, Arc::new(MockSessionStore::new()));

        let result: Result<Value, _> = client
            .request_json(Method::GET, "/compagnies", None::<&Value>)
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unauthorized_clears_only_platform_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/avis"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = Arc::new(MockSessionStore::with_tokens([
            token("tok-company", Namespace::Company),
            token("tok-root", Namespace::Platform),
        ]));
        let (client, mut rx) = client(&server, store.clone());
        client.set_namespace(Namespace::Platform);

        let err = client
            .request(Method::GET, "/avis", None::<&Value>)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Unauthorized {
                namespace: Namespace::Platform
            }
        ));
        assert!(store.get_token(Namespace::Platform).await.unwrap().is_none());
        assert!(store.get_token(Namespace::Company).await.unwrap().is_some());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Expired(Namespace::Platform));
    }

    #[tokio::test]
    async fn test_unauthorized_clears_only_company_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/buses/compagnie/c1"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = Arc::new(MockSessionStore::with_tokens([
            token("tok-company", Namespace::Company),
            token("tok-root", Namespace::Platform),
        ]));
        let (client, mut rx) = client(&server, store.clone());
        client.set_namespace(Namespace::Company);

        let result = client
            .request(Method::GET, "/buses/compagnie/c1", None::<&Value>)
            .await;

        assert!(result.is_err());
        assert!(store.get_token(Namespace::Company).await.unwrap().is_none());
        assert!(store.get_token(Namespace::Platform).await.unwrap().is_some());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Expired(Namespace::Company));
    }

    #[tokio::test]
    async fn test_backend_message_surfaces_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/buses"))
            .and(body_json(json!({"numero": "12"})))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"message": "Ce numéro de bus existe déjà"})),
            )
            .mount(&server)
            .await;

        let (client, _rx) = client(&server, Arc::new(MockSessionStore::new()));

        let err = client
            .request(Method::POST, "/buses", Some(&json!({"numero": "12"})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Ce numéro de bus existe déjà");
    }

    #[tokio::test]
    async fn test_status_without_message() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/avis/r1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let (client, _rx) = client(&server, Arc::new(MockSessionStore::new()));

        let err = client
            .request(Method::DELETE, "/avis/r1", None::<&Value>)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500");
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_public_unauthorized_keeps_sessions() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(NoAuthorization)
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Identifiants invalides"})),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MockSessionStore::with_tokens([token(
            "tok-root",
            Namespace::Platform,
        )]));
        let (client, mut rx) = client(&server, store.clone());

        let err = client
            .public_json::<Value, _>("/auth/login", &json!({"email": "a@b.c"}))
            .await
            .unwrap_err();

        assert_eq!(err.backend_message(), Some("Identifiants invalides"));
        assert!(store.get_token(Namespace::Platform).await.unwrap().is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_connection_failure_is_network_error() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let client = ApiClient::new(
            "http://127.0.0.1:9",
            Duration::from_secs(2),
            Arc::new(MockSessionStore::new()),
            tx,
        )
        .unwrap();

        let err = client
            .request(Method::GET, "/buses", None::<&Value>)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network { .. }));
    }
}
