//! Backend access error types.

use reqwest::StatusCode;
use thiserror::Error;

use super::SessionError;
use crate::domain::forms::FormError;
use crate::domain::namespace::Namespace;

/// Errors surfaced by backend operations.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ApiError {
    #[error("session expired, please sign in again ({namespace})")]
    Unauthorized { namespace: Namespace },

    #[error("{}", rejection_text(.status, .message))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("unexpected response: {message}")]
    Decode { message: String },

    #[error("no company is associated with this session")]
    MissingCompany,

    #[error(transparent)]
    InvalidForm(#[from] FormError),

    #[error("session storage error: {0}")]
    Session(#[from] SessionError),
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
fn rejection_text(status: &u16, message: &Option<String>) -> String {
    message.clone().unwrap_or_else(|| format!("HTTP {status}"))
}

impl ApiError {
    /// Creates a rejection carrying the backend message.
    #[must_use]
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            status: status.as_u16(),
            message: Some(message.into()),
        }
    }

    /// Creates a rejection whose body carried no message.
    #[must_use]
    pub const fn status_only(status: StatusCode) -> Self {
        Self::Rejected {
            status: status.as_u16(),
            message: None,
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Message the backend attached to a rejection, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Returns whether the session was rejected by the backend.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_backend_message() {
        let err = ApiError::rejected(StatusCode::CONFLICT, "Numéro de bus déjà utilisé");
        assert_eq!(err.to_string(), "Numéro de bus déjà utilisé");
        assert_eq!(err.backend_message(), Some("Numéro de bus déjà utilisé"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_rejection_without_message() {
        let err = ApiError::status_only(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP 404");
        assert_eq!(err.backend_message(), None);
    }

    #[test]
    fn test_classification() {
        let expired = ApiError::Unauthorized {
            namespace: Namespace::Platform,
        };
        assert!(expired.is_auth_failure());
        assert!(!expired.is_recoverable());
        assert!(ApiError::network("timed out").is_recoverable());
        assert!(ApiError::status_only(StatusCode::BAD_GATEWAY).is_recoverable());
    }

    #[test]
    fn test_form_error_is_transparent() {
        let err: ApiError = FormError::Missing { field: "Number" }.into();
        assert_eq!(err.to_string(), FormError::Missing { field: "Number" }.to_string());
    }
}
