//! Resource access port definitions.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::entities::CompanyDashboard;
use crate::domain::errors::ApiError;
use crate::domain::namespace::ListScope;
use crate::domain::resource::Resource;

/// Port for listing and mutating one backend collection.
#[async_trait]
pub trait ResourcePort<R: Resource>: Send + Sync {
    /// Fetches the whole collection within a scope.
    async fn list(&self, scope: &ListScope) -> Result<Vec<R>, ApiError>;

    /// Creates a record.
    async fn create(&self, payload: Map<String, Value>) -> Result<(), ApiError>;

    /// Updates a record.
    async fn update(&self, id: &str, payload: Map<String, Value>) -> Result<(), ApiError>;

    /// Deletes a record.
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// Port for the backend-computed company dashboard.
#[async_trait]
pub trait DashboardPort: Send + Sync {
    /// Fetches the dashboard figures of a company.
    async fn fetch_dashboard(&self, company_id: &str) -> Result<CompanyDashboard, ApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use reqwest::StatusCode;

    /// Calls received by [`MockResourcePort`].
    #[allow(missing_docs)]
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        List(ListScope),
        Create(Map<String, Value>),
        Update(String, Map<String, Value>),
        Delete(String),
    }

    /// In-memory resource port recording every call.
    pub struct MockResourcePort<R> {
        items: Mutex<Vec<R>>,
        calls: Mutex<Vec<Call>>,
        fail_with: Mutex<Option<String>>,
        lists: AtomicUsize,
    }

    impl<R: Resource> MockResourcePort<R> {
        /// Creates a port serving the given records.
        pub fn new(items: Vec<R>) -> Arc<Self> {
            Arc::new(Self {
                items: Mutex::new(items),
                calls: Mutex::new(Vec::new()),
                fail_with: Mutex::new(None),
                lists: AtomicUsize::new(0),
            })
        }

        /// Makes every following call fail with a backend rejection.
        pub fn fail_with(&self, message: &str) {
            *self.fail_with.lock() = Some(message.to_string());
        }

        /// Makes following calls succeed again.
        pub fn recover(&self) {
            *self.fail_with.lock() = None;
        }

        /// Recorded calls.
        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().clone()
        }

        /// Number of list calls.
        pub fn list_count(&self) -> usize {
            self.lists.load(Ordering::SeqCst)
        }

        /// Number of mutating calls.
        pub fn mutation_count(&self) -> usize {
            self.calls
                .lock()
                .iter()
                .filter(|c| !matches!(c, Call::List(_)))
                .count()
        }

        fn record(&self, call: Call) -> Result<(), ApiError> {
            self.calls.lock().push(call);
            match self.fail_with.lock().as_deref() {
                Some(message) => Err(ApiError::rejected(StatusCode::BAD_REQUEST, message)),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl<R: Resource> ResourcePort<R> for MockResourcePort<R> {
        async fn list(&self, scope: &ListScope) -> Result<Vec<R>, ApiError> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            self.record(Call::List(scope.clone()))?;
            Ok(self.items.lock().clone())
        }

        async fn create(&self, payload: Map<String, Value>) -> Result<(), ApiError> {
            self.record(Call::Create(payload))
        }

        async fn update(&self, id: &str, payload: Map<String, Value>) -> Result<(), ApiError> {
            self.record(Call::Update(id.to_string(), payload))
        }

        async fn delete(&self, id: &str) -> Result<(), ApiError> {
            self.record(Call::Delete(id.to_string()))
        }
    }

    /// Dashboard port returning fixed figures.
    #[allow(missing_docs)]
    pub struct MockDashboardPort {
        pub dashboard: CompanyDashboard,
    }

    #[async_trait]
    impl DashboardPort for MockDashboardPort {
        async fn fetch_dashboard(&self, _company_id: &str) -> Result<CompanyDashboard, ApiError> {
            Ok(self.dashboard.clone())
        }
    }
}
