//! Domain layer with backend records, list semantics and port definitions.

/// Summary statistic helpers.
pub mod aggregation;
/// Create/edit/delete modal state machine.
pub mod crud;
/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// List filtering.
pub mod filter;
/// Form buffers and payload conversion.
pub mod forms;
/// Session namespaces and list scopes.
pub mod namespace;
/// Port definitions.
pub mod ports;
/// Generic list contract.
pub mod resource;
/// Serde utilities.
pub mod serde_utils;

pub use entities::SessionToken;
pub use errors::{ApiError, SessionError};
pub use namespace::{ListScope, Namespace};
pub use ports::{AuthPort, DashboardPort, ResourcePort, SessionStorePort};
pub use resource::Resource;
