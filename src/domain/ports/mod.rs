mod auth_port;
mod resource_port;
mod session_store_port;

pub use auth_port::{AuthGrant, AuthPort};
pub use resource_port::{DashboardPort, ResourcePort};
pub use session_store_port::SessionStorePort;
