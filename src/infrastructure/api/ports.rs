//! Port implementations backed by [`ApiClient`].

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use super::client::ApiClient;
use super::dto::{AuthBody, DashboardBody};
use super::endpoints;
use crate::domain::entities::CompanyDashboard;
use crate::domain::errors::ApiError;
use crate::domain::namespace::{ListScope, Namespace};
use crate::domain::ports::{AuthGrant, AuthPort, DashboardPort, ResourcePort};
use crate::domain::resource::Resource;
use crate::domain::serde_utils::ListEnvelope;

#[async_trait]
impl<R: Resource> ResourcePort<R> for ApiClient {
    async fn list(&self, scope: &ListScope) -> Result<Vec<R>, ApiError> {
        let path = endpoints::list(R::KIND, scope);
        let envelope: ListEnvelope<R> = self
            .request_json(Method::GET, &path, None::<&Value>)
            .await?;
        let items = envelope.into_vec();
        debug!(%path, count = items.len(), "Fetched collection");
        Ok(items)
    }

    async fn create(&self, payload: Map<String, Value>) -> Result<(), ApiError> {
        let path = endpoints::create(R::KIND);
        self.request(Method::POST, &path, Some(&payload)).await?;
        info!(collection = R::KIND.collection(), "Record created");
        Ok(())
    }

    async fn update(&self, id: &str, payload: Map<String, Value>) -> Result<(), ApiError> {
        let path = endpoints::record(R::KIND, id);
        self.request(Method::PUT, &path, Some(&payload)).await?;
        info!(collection = R::KIND.collection(), id, "Record updated");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = endpoints::record(R::KIND, id);
        self.request(Method::DELETE, &path, None::<&Value>).await?;
        info!(collection = R::KIND.collection(), id, "Record deleted");
        Ok(())
    }
}

#[async_trait]
impl DashboardPort for ApiClient {
    async fn fetch_dashboard(&self, company_id: &str) -> Result<CompanyDashboard, ApiError> {
        let body: DashboardBody = self
            .request_json(Method::GET, &endpoints::dashboard(company_id), None::<&Value>)
            .await?;
        Ok(body.into())
    }
}

#[async_trait]
impl AuthPort for ApiClient {
    async fn login(
        &self,
        namespace: Namespace,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, ApiError> {
        let body = json!({ "email": email, "password": password });
        let response: AuthBody = self
            .public_json(endpoints::login(namespace), &body)
            .await?;
        Ok(response.into())
    }

    async fn register(
        &self,
        namespace: Namespace,
        payload: Map<String, Value>,
    ) -> Result<AuthGrant, ApiError> {
        let response: AuthBody = self
            .public_json(endpoints::register(namespace), &payload)
            .await?;
        Ok(response.into())
    }
}
