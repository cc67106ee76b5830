//! Company dashboard figures.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::warn;

use super::list_controller::LoadState;
use crate::domain::entities::CompanyDashboard;
use crate::domain::errors::ApiError;
use crate::domain::ports::DashboardPort;

/// Completion of a dashboard fetch.
pub type DashboardEvent = Result<CompanyDashboard, ApiError>;

/// Controller behind the dashboard tab.
pub struct DashboardController {
    port: Arc<dyn DashboardPort>,
    company_id: String,
    dashboard: Option<CompanyDashboard>,
    state: LoadState,
}

impl DashboardController {
    /// Creates a controller for one company.
    #[must_use]
    pub fn new(port: Arc<dyn DashboardPort>, company_id: impl Into<String>) -> Self {
        Self {
            port,
            company_id: company_id.into(),
            dashboard: None,
            state: LoadState::Idle,
        }
    }

    /// Starts a fetch.
    pub fn load(&mut self) -> BoxFuture<'static, DashboardEvent> {
        self.state = LoadState::Loading;
        let port = Arc::clone(&self.port);
        let company_id = self.company_id.clone();
        Box::pin(async move { port.fetch_dashboard(&company_id).await })
    }

    /// Folds a finished fetch into the state.
    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            Ok(dashboard) => {
                self.dashboard = Some(dashboard);
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                warn!(company_id = %self.company_id, error = %e, "Dashboard fetch failed");
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Label/value rows; empty until loaded.
    #[must_use]
    pub fn figures(&self) -> Vec<(String, String)> {
        self.dashboard
            .as_ref()
            .map(CompanyDashboard::figures)
            .unwrap_or_default()
    }

    /// Fetch state.
    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }
}
