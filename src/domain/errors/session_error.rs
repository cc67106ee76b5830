//! Session store error types.

use thiserror::Error;

/// Session store error variants.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum SessionError {
    #[error("secure storage not available: {0}")]
    NotAvailable(String),

    #[error("failed to read session value: {0}")]
    RetrievalFailed(String),

    #[error("failed to store session value: {0}")]
    StorageFailed(String),

    #[error("failed to delete session value: {0}")]
    DeletionFailed(String),

    #[error("stored session value is corrupt: {0}")]
    Corrupt(String),
}
